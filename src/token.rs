use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
    Lte,
    Gte,

    // Delimiters
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("fn", TokenType::Function);
        m.insert("let", TokenType::Let);
        m.insert("true", TokenType::True);
        m.insert("false", TokenType::False);
        m.insert("if", TokenType::If);
        m.insert("else", TokenType::Else);
        m.insert("return", TokenType::Return);
        m
    };
}

impl TokenType {
    pub fn lookup_ident(ident: &str) -> Self {
        KEYWORDS.get(ident).copied().unwrap_or(TokenType::Ident)
    }
}

// These display forms appear verbatim in parser error messages: punctuation
// kinds print as their source characters, the rest as their names.
impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Ident => "IDENT",
            TokenType::Int => "INT",
            TokenType::String => "STRING",
            TokenType::Assign => "=",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Bang => "!",
            TokenType::Asterisk => "*",
            TokenType::Slash => "/",
            TokenType::Lt => "<",
            TokenType::Gt => ">",
            TokenType::Eq => "==",
            TokenType::NotEq => "!=",
            TokenType::Lte => "<=",
            TokenType::Gte => ">=",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::Function => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::Return => "RETURN",
        };
        f.write_str(s)
    }
}

impl Default for TokenType {
    fn default() -> Self {
        TokenType::Illegal
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
}

impl Token {
    pub fn new(token_type: TokenType, literal: impl Into<String>) -> Self {
        Token {
            token_type,
            literal: literal.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TokenType;

    #[test]
    fn test_lookup_ident() {
        let tests = vec![
            ("fn", TokenType::Function),
            ("let", TokenType::Let),
            ("true", TokenType::True),
            ("false", TokenType::False),
            ("if", TokenType::If),
            ("else", TokenType::Else),
            ("return", TokenType::Return),
            ("muller", TokenType::Ident),
            ("letter", TokenType::Ident),
            ("_", TokenType::Ident),
        ];

        for (input, expected) in tests {
            assert_eq!(TokenType::lookup_ident(input), expected, "lookup for {:?}", input);
        }
    }

    #[test]
    fn test_token_type_display() {
        assert_eq!(TokenType::Assign.to_string(), "=");
        assert_eq!(TokenType::Eq.to_string(), "==");
        assert_eq!(TokenType::Lte.to_string(), "<=");
        assert_eq!(TokenType::LBrace.to_string(), "{");
        assert_eq!(TokenType::Function.to_string(), "FUNCTION");
        assert_eq!(TokenType::Ident.to_string(), "IDENT");
    }
}
