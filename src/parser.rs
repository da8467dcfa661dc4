use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast;
use crate::ast::{ElseBranch, Expression, Statement};
use crate::lexer::Lexer;
use crate::parser_tracing;
use crate::token::{Token, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,      // == or !=
    LessGreater, // < <= > >=
    Sum,         // + or -
    Product,     // * or /
    Prefix,      // -x or !x
    Call,        // f(x)
    Index,       // xs[i]
}

lazy_static! {
    static ref PRECEDENCES: HashMap<TokenType, Precedence> = {
        let mut m = HashMap::new();
        m.insert(TokenType::Eq, Precedence::Equals);
        m.insert(TokenType::NotEq, Precedence::Equals);
        m.insert(TokenType::Lt, Precedence::LessGreater);
        m.insert(TokenType::Gt, Precedence::LessGreater);
        m.insert(TokenType::Lte, Precedence::LessGreater);
        m.insert(TokenType::Gte, Precedence::LessGreater);
        m.insert(TokenType::Plus, Precedence::Sum);
        m.insert(TokenType::Minus, Precedence::Sum);
        m.insert(TokenType::Slash, Precedence::Product);
        m.insert(TokenType::Asterisk, Precedence::Product);
        m.insert(TokenType::LParen, Precedence::Call);
        m.insert(TokenType::LBracket, Precedence::Index);
        m
    };
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Option<Expression>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> Option<Expression>;

pub struct Parser<'a> {
    l: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
    prefix_parse_fns: HashMap<TokenType, PrefixParseFn<'a>>,
    infix_parse_fns: HashMap<TokenType, InfixParseFn<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(l: Lexer<'a>) -> Parser<'a> {
        let mut p = Parser {
            l,
            cur_token: Token::default(),
            peek_token: Token::default(),
            errors: Vec::new(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        p.register_prefix(TokenType::Ident, Parser::parse_identifier);
        p.register_prefix(TokenType::Int, Parser::parse_integer_literal);
        p.register_prefix(TokenType::String, Parser::parse_string_literal);
        p.register_prefix(TokenType::True, Parser::parse_boolean);
        p.register_prefix(TokenType::False, Parser::parse_boolean);
        p.register_prefix(TokenType::Bang, Parser::parse_prefix_expression);
        p.register_prefix(TokenType::Minus, Parser::parse_prefix_expression);
        p.register_prefix(TokenType::LParen, Parser::parse_grouped_expression);
        p.register_prefix(TokenType::If, Parser::parse_if_expression);
        p.register_prefix(TokenType::Function, Parser::parse_function_literal);
        p.register_prefix(TokenType::LBracket, Parser::parse_array_literal);

        p.register_infix(TokenType::Plus, Parser::parse_infix_expression);
        p.register_infix(TokenType::Minus, Parser::parse_infix_expression);
        p.register_infix(TokenType::Slash, Parser::parse_infix_expression);
        p.register_infix(TokenType::Asterisk, Parser::parse_infix_expression);
        p.register_infix(TokenType::Eq, Parser::parse_infix_expression);
        p.register_infix(TokenType::NotEq, Parser::parse_infix_expression);
        p.register_infix(TokenType::Lt, Parser::parse_infix_expression);
        p.register_infix(TokenType::Gt, Parser::parse_infix_expression);
        p.register_infix(TokenType::Lte, Parser::parse_infix_expression);
        p.register_infix(TokenType::Gte, Parser::parse_infix_expression);
        p.register_infix(TokenType::LParen, Parser::parse_call_expression);
        p.register_infix(TokenType::LBracket, Parser::parse_index_expression);

        // Load cur_token and peek_token
        p.next_token();
        p.next_token();
        p
    }

    fn register_prefix(&mut self, token_type: TokenType, func: PrefixParseFn<'a>) {
        self.prefix_parse_fns.insert(token_type, func);
    }

    fn register_infix(&mut self, token_type: TokenType, func: InfixParseFn<'a>) {
        self.infix_parse_fns.insert(token_type, func);
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::take(&mut self.peek_token);
        self.peek_token = self.l.next_token();
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> ast::Program {
        let mut program = ast::Program::default();

        while !self.cur_token_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.token_type {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }

        let name = ast::Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        };

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let(ast::LetStatement { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return(ast::ReturnStatement { token, value }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let _span = parser_tracing::span("parse_expression_statement");
        let token = self.cur_token.clone();

        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression(ast::ExpressionStatement { token, expression }))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let _span = parser_tracing::span("parse_expression");

        let prefix = self.prefix_parse_fns.get(&self.cur_token.token_type).copied();
        let prefix = match prefix {
            Some(f) => f,
            None => {
                self.no_prefix_parse_fn_error(self.cur_token.token_type);
                return None;
            }
        };
        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek_token.token_type).copied() {
                Some(f) => f,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(ast::Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Int(ast::IntLiteral {
                token: self.cur_token.clone(),
                value,
            })),
            Err(_) => {
                let msg = format!("could not parse {:?} as integer", self.cur_token.literal);
                self.errors.push(msg);
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::Str(ast::StringLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Bool(ast::BoolLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenType::True),
        }))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = self.cur_token.literal.clone();

        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);

        Some(Expression::Prefix(ast::PrefixExpression { token, operator, right }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::Lowest);

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        exp
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.parse_if().map(Expression::If)
    }

    fn parse_if(&mut self) -> Option<ast::IfExpression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        let mut alternative = None;
        if self.peek_token_is(TokenType::Else) {
            self.next_token();

            if self.peek_token_is(TokenType::If) {
                // `else if` chains re-enter the if-parse
                self.next_token();
                alternative = Some(ElseBranch::If(Box::new(self.parse_if()?)));
            } else if self.expect_peek(TokenType::LBrace) {
                alternative = Some(ElseBranch::Block(self.parse_block_statement()));
            } else {
                return None;
            }
        }

        Some(ast::IfExpression { token, condition, body, alternative })
    }

    fn parse_block_statement(&mut self) -> ast::BlockStatement {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.cur_token_is(TokenType::RBrace) && !self.cur_token_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        ast::BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        let params = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expression::Function(ast::FunctionLiteral { token, params, body }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        self.next_token();
        identifiers.push(ast::Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        });

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            identifiers.push(ast::Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let args = self.parse_expression_list(TokenType::RParen)?;

        Some(Expression::Call(ast::CallExpression {
            token,
            function: Box::new(function),
            args,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();

        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenType::RBracket) {
            return None;
        }

        Some(Expression::Index(ast::IndexExpression {
            token,
            left: Box::new(left),
            index,
        }))
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenType::RBracket)?;

        Some(Expression::Array(ast::ArrayLiteral { token, elements }))
    }

    // Comma-separated expressions up to `end`; a trailing comma before the
    // closing delimiter is allowed.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            if self.peek_token_is(end) {
                break;
            }
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn peek_precedence(&self) -> Precedence {
        PRECEDENCES
            .get(&self.peek_token.token_type)
            .copied()
            .unwrap_or(Precedence::Lowest)
    }

    fn cur_precedence(&self) -> Precedence {
        PRECEDENCES
            .get(&self.cur_token.token_type)
            .copied()
            .unwrap_or(Precedence::Lowest)
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = self.cur_token.literal.clone();

        // Recursing at the operator's own precedence keeps it left-associative
        let precedence = self.cur_precedence();
        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);

        Some(Expression::Infix(ast::InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right,
        }))
    }

    fn cur_token_is(&self, t: TokenType) -> bool {
        self.cur_token.token_type == t
    }

    fn peek_token_is(&self, t: TokenType) -> bool {
        self.peek_token.token_type == t
    }

    fn expect_peek(&mut self, t: TokenType) -> bool {
        if self.peek_token_is(t) {
            self.next_token();
            true
        } else {
            self.peek_error(t);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenType) {
        let msg = format!(
            "expected next token to be {}, got {} instead",
            expected, self.peek_token.token_type
        );
        self.errors.push(msg);
    }

    fn no_prefix_parse_fn_error(&mut self, t: TokenType) {
        let msg = format!("no prefix parse function found for {}", t);
        self.errors.push(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Lit {
        Int(i64),
        Ident(&'static str),
        Bool(bool),
    }

    fn parse(input: &str) -> ast::Program {
        let l = Lexer::new(input);
        let mut p = Parser::new(l);
        let program = p.parse_program();
        check_parser_errors(&p);
        program
    }

    fn check_parser_errors(p: &Parser) {
        let errors = p.errors();
        if errors.is_empty() {
            return;
        }

        eprintln!("parser has {} errors", errors.len());
        for msg in errors {
            eprintln!("parser error: {:?}", msg);
        }
        panic!("parser has {} errors", errors.len());
    }

    fn unwrap_expression(stmt: &Statement) -> &Expression {
        match stmt {
            Statement::Expression(s) => &s.expression,
            other => panic!("statement is not an expression statement. got={:?}", other),
        }
    }

    fn check_literal(expr: &Expression, expected: &Lit) {
        match expected {
            Lit::Int(v) => check_integer_literal(expr, *v),
            Lit::Ident(name) => match expr {
                Expression::Identifier(ident) => {
                    assert_eq!(ident.value, *name);
                    assert_eq!(ident.token.literal, *name);
                }
                other => panic!("expression is not an identifier. got={:?}", other),
            },
            Lit::Bool(v) => match expr {
                Expression::Bool(b) => assert_eq!(b.value, *v),
                other => panic!("expression is not a boolean. got={:?}", other),
            },
        }
    }

    fn check_integer_literal(expr: &Expression, expected: i64) {
        match expr {
            Expression::Int(lit) => {
                assert_eq!(lit.value, expected);
                assert_eq!(lit.token.literal, expected.to_string());
            }
            other => panic!("expression is not an integer literal. got={:?}", other),
        }
    }

    fn check_infix(expr: &Expression, left: &Lit, operator: &str, right: &Lit) {
        match expr {
            Expression::Infix(infix) => {
                check_literal(&infix.left, left);
                assert_eq!(infix.operator, operator);
                check_literal(&infix.right, right);
            }
            other => panic!("expression is not an infix expression. got={:?}", other),
        }
    }

    #[test]
    fn test_let_statements() {
        let tests = vec![
            ("let x = 5;", "x", Lit::Int(5)),
            ("let y = true;", "y", Lit::Bool(true)),
            ("let foobar = y;", "foobar", Lit::Ident("y")),
        ];

        for (input, name, value) in tests {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Let(stmt) => {
                    assert_eq!(stmt.token.literal, "let");
                    assert_eq!(stmt.name.value, name);
                    check_literal(&stmt.value, &value);
                }
                other => panic!("statement is not a let statement. got={:?}", other),
            }
        }
    }

    #[test]
    fn test_let_without_trailing_semicolon() {
        let program = parse("let x = 5");
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.to_string(), "let x = 5;");
    }

    #[test]
    fn test_return_statements() {
        let tests = vec![
            ("return 5;", Lit::Int(5)),
            ("return true;", Lit::Bool(true)),
            ("return foobar;", Lit::Ident("foobar")),
        ];

        for (input, value) in tests {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Return(stmt) => {
                    assert_eq!(stmt.token.literal, "return");
                    check_literal(&stmt.value, &value);
                }
                other => panic!("statement is not a return statement. got={:?}", other),
            }
        }
    }

    #[test]
    fn test_identifier_expression() {
        let program = parse("foobar;");
        assert_eq!(program.statements.len(), 1);

        let expr = unwrap_expression(&program.statements[0]);
        check_literal(expr, &Lit::Ident("foobar"));
    }

    #[test]
    fn test_integer_literal_expression() {
        let program = parse("5;");
        assert_eq!(program.statements.len(), 1);

        let expr = unwrap_expression(&program.statements[0]);
        check_integer_literal(expr, 5);
    }

    #[test]
    fn test_string_literal_expression() {
        let program = parse(r#""hello world""#);
        let expr = unwrap_expression(&program.statements[0]);

        match expr {
            Expression::Str(lit) => assert_eq!(lit.value, "hello world"),
            other => panic!("expression is not a string literal. got={:?}", other),
        }
    }

    #[test]
    fn test_boolean_expression_parsing() {
        let tests = vec![
            ("true", "true"),
            ("false", "false"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
        ];

        for (input, expected) in tests {
            let program = parse(input);
            assert_eq!(program.to_string(), expected);
        }
    }

    #[test]
    fn test_parsing_prefix_expressions() {
        let tests = vec![
            ("!5;", "!", Lit::Int(5)),
            ("-15;", "-", Lit::Int(15)),
            ("!true;", "!", Lit::Bool(true)),
        ];

        for (input, operator, value) in tests {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            match unwrap_expression(&program.statements[0]) {
                Expression::Prefix(prefix) => {
                    assert_eq!(prefix.operator, operator);
                    check_literal(&prefix.right, &value);
                }
                other => panic!("expression is not a prefix expression. got={:?}", other),
            }
        }
    }

    #[test]
    fn test_parsing_infix_expressions() {
        let tests = vec![
            ("5 + 5;", "+"),
            ("5 - 5;", "-"),
            ("5 * 5;", "*"),
            ("5 / 5;", "/"),
            ("5 > 5;", ">"),
            ("5 < 5;", "<"),
            ("5 >= 5;", ">="),
            ("5 <= 5;", "<="),
            ("5 == 5;", "=="),
            ("5 != 5;", "!="),
        ];

        for (input, operator) in tests {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            let expr = unwrap_expression(&program.statements[0]);
            check_infix(expr, &Lit::Int(5), operator, &Lit::Int(5));
        }
    }

    #[test]
    fn test_operator_precedence_parsing() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("5 >= 4 == 3 <= 4", "((5 >= 4) == (3 <= 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("true", "true"),
            ("false", "false"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (input, expected) in tests {
            let program = parse(input);
            assert_eq!(program.to_string(), expected, "for input {:?}", input);
        }
    }

    #[test]
    fn test_if_expression() {
        let program = parse("if (x < y) { x }");
        assert_eq!(program.statements.len(), 1);

        match unwrap_expression(&program.statements[0]) {
            Expression::If(if_expr) => {
                check_infix(&if_expr.condition, &Lit::Ident("x"), "<", &Lit::Ident("y"));
                assert_eq!(if_expr.body.statements.len(), 1);
                check_literal(unwrap_expression(&if_expr.body.statements[0]), &Lit::Ident("x"));
                assert!(if_expr.alternative.is_none());
            }
            other => panic!("expression is not an if expression. got={:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let program = parse("if (x < y) { x } else { y }");

        match unwrap_expression(&program.statements[0]) {
            Expression::If(if_expr) => {
                check_infix(&if_expr.condition, &Lit::Ident("x"), "<", &Lit::Ident("y"));
                match &if_expr.alternative {
                    Some(ElseBranch::Block(block)) => {
                        assert_eq!(block.statements.len(), 1);
                        check_literal(unwrap_expression(&block.statements[0]), &Lit::Ident("y"));
                    }
                    other => panic!("alternative is not a block. got={:?}", other),
                }
            }
            other => panic!("expression is not an if expression. got={:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain() {
        let program = parse("if (x < y) { x } else if (x > y) { y } else { 0 }");

        match unwrap_expression(&program.statements[0]) {
            Expression::If(if_expr) => match &if_expr.alternative {
                Some(ElseBranch::If(nested)) => {
                    check_infix(&nested.condition, &Lit::Ident("x"), ">", &Lit::Ident("y"));
                    match &nested.alternative {
                        Some(ElseBranch::Block(block)) => {
                            check_literal(unwrap_expression(&block.statements[0]), &Lit::Int(0));
                        }
                        other => panic!("nested alternative is not a block. got={:?}", other),
                    }
                }
                other => panic!("alternative is not a chained if. got={:?}", other),
            },
            other => panic!("expression is not an if expression. got={:?}", other),
        }
    }

    #[test]
    fn test_else_requires_block_or_if() {
        let l = Lexer::new("if (x) { x } else y");
        let mut p = Parser::new(l);
        p.parse_program();

        assert!(
            p.errors()
                .iter()
                .any(|e| e == "expected next token to be {, got IDENT instead"),
            "errors: {:?}",
            p.errors()
        );
    }

    #[test]
    fn test_function_literal_parsing() {
        let program = parse("fn(x, y) { x + y; }");
        assert_eq!(program.statements.len(), 1);

        match unwrap_expression(&program.statements[0]) {
            Expression::Function(func) => {
                assert_eq!(func.params.len(), 2);
                assert_eq!(func.params[0].value, "x");
                assert_eq!(func.params[1].value, "y");
                assert_eq!(func.body.statements.len(), 1);
                check_infix(
                    unwrap_expression(&func.body.statements[0]),
                    &Lit::Ident("x"),
                    "+",
                    &Lit::Ident("y"),
                );
            }
            other => panic!("expression is not a function literal. got={:?}", other),
        }
    }

    #[test]
    fn test_function_parameter_parsing() {
        let tests = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (input, expected) in tests {
            let program = parse(input);
            match unwrap_expression(&program.statements[0]) {
                Expression::Function(func) => {
                    let params: Vec<&str> = func.params.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(params, expected);
                }
                other => panic!("expression is not a function literal. got={:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression_parsing() {
        let program = parse("add(1, 2 * 3, 4 + 5);");
        assert_eq!(program.statements.len(), 1);

        match unwrap_expression(&program.statements[0]) {
            Expression::Call(call) => {
                check_literal(&call.function, &Lit::Ident("add"));
                assert_eq!(call.args.len(), 3);
                check_literal(&call.args[0], &Lit::Int(1));
                check_infix(&call.args[1], &Lit::Int(2), "*", &Lit::Int(3));
                check_infix(&call.args[2], &Lit::Int(4), "+", &Lit::Int(5));
            }
            other => panic!("expression is not a call expression. got={:?}", other),
        }
    }

    #[test]
    fn test_parsing_array_literals() {
        let program = parse("[1, 2 * 2, 3 + 3]");

        match unwrap_expression(&program.statements[0]) {
            Expression::Array(array) => {
                assert_eq!(array.elements.len(), 3);
                check_integer_literal(&array.elements[0], 1);
                check_infix(&array.elements[1], &Lit::Int(2), "*", &Lit::Int(2));
                check_infix(&array.elements[2], &Lit::Int(3), "+", &Lit::Int(3));
            }
            other => panic!("expression is not an array literal. got={:?}", other),
        }
    }

    #[test]
    fn test_parsing_index_expressions() {
        let program = parse("myArray[1 + 1]");

        match unwrap_expression(&program.statements[0]) {
            Expression::Index(index) => {
                check_literal(&index.left, &Lit::Ident("myArray"));
                check_infix(&index.index, &Lit::Int(1), "+", &Lit::Int(1));
            }
            other => panic!("expression is not an index expression. got={:?}", other),
        }
    }

    #[test]
    fn test_trailing_commas() {
        let tests = vec![
            ("[1, 2,]", "[1, 2]"),
            ("add(1, 2,)", "add(1, 2)"),
            ("[]", "[]"),
            ("add()", "add()"),
        ];

        for (input, expected) in tests {
            let program = parse(input);
            assert_eq!(program.to_string(), expected, "for input {:?}", input);
        }
    }

    #[test]
    fn test_peek_errors() {
        let tests = vec![
            ("let x 5;", "expected next token to be =, got INT instead"),
            ("let = 5;", "expected next token to be IDENT, got = instead"),
            ("fn(x, y { x }", "expected next token to be ), got { instead"),
        ];

        for (input, expected) in tests {
            let l = Lexer::new(input);
            let mut p = Parser::new(l);
            p.parse_program();

            assert!(
                p.errors().iter().any(|e| e == expected),
                "for input {:?}, errors: {:?}",
                input,
                p.errors()
            );
        }
    }

    #[test]
    fn test_no_prefix_parse_fn_error() {
        let l = Lexer::new("+5;");
        let mut p = Parser::new(l);
        p.parse_program();

        assert!(
            p.errors()
                .iter()
                .any(|e| e == "no prefix parse function found for +"),
            "errors: {:?}",
            p.errors()
        );
    }

    #[test]
    fn test_errors_do_not_abort_parsing() {
        let l = Lexer::new("let x 5; let y = 10;");
        let mut p = Parser::new(l);
        let program = p.parse_program();

        assert!(!p.errors().is_empty());
        // The second statement still parses
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Statement::Let(stmt) if stmt.name.value == "y")));
    }
}
