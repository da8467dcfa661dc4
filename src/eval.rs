use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    BlockStatement, ElseBranch, Expression, Identifier, IfExpression, Program, Statement,
};
use crate::env::Environment;
use crate::object::{Function, Object, ObjectType, BUILTINS};

pub fn eval(program: &Program, env: &Rc<RefCell<Environment>>) -> Object {
    eval_program(&program.statements, env)
}

fn eval_program(stmts: &[Statement], env: &Rc<RefCell<Environment>>) -> Object {
    let mut result = Object::Null;
    for stmt in stmts {
        match eval_statement(stmt, env) {
            // At the top level a return value is unwrapped
            Object::ReturnValue(value) => return *value,
            err @ Object::Error(_) => return err,
            other => result = other,
        }
    }
    result
}

// Unlike eval_program, a return value passes through still wrapped so that
// every enclosing block keeps unwinding; the function call (or the program
// itself) unwraps it.
fn eval_block_statement(block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> Object {
    let mut result = Object::Null;
    for stmt in &block.statements {
        match eval_statement(stmt, env) {
            rv @ Object::ReturnValue(_) => return rv,
            err @ Object::Error(_) => return err,
            other => result = other,
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<RefCell<Environment>>) -> Object {
    match stmt {
        Statement::Let(stmt) => {
            let val = eval_expression(&stmt.value, env);
            if is_error(&val) {
                return val;
            }
            env.borrow_mut().set(stmt.name.value.clone(), val);
            Object::Null
        }
        Statement::Return(stmt) => {
            let val = eval_expression(&stmt.value, env);
            if is_error(&val) {
                return val;
            }
            Object::ReturnValue(Box::new(val))
        }
        Statement::Expression(stmt) => eval_expression(&stmt.expression, env),
        Statement::Block(block) => eval_block_statement(block, env),
    }
}

fn eval_expression(expr: &Expression, env: &Rc<RefCell<Environment>>) -> Object {
    match expr {
        Expression::Int(lit) => Object::Integer(lit.value),
        Expression::Bool(lit) => native_bool_to_object(lit.value),
        Expression::Str(lit) => Object::Str(lit.value.clone()),
        Expression::Identifier(ident) => eval_identifier(ident, env),
        Expression::Array(array) => match eval_expressions(&array.elements, env) {
            Ok(elements) => Object::Array(elements),
            Err(err) => err,
        },
        Expression::Prefix(prefix) => {
            let right = eval_expression(&prefix.right, env);
            if is_error(&right) {
                return right;
            }
            eval_prefix_expression(&prefix.operator, right)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env);
            if is_error(&left) {
                return left;
            }
            let right = eval_expression(&infix.right, env);
            if is_error(&right) {
                return right;
            }
            eval_infix_expression(&infix.operator, left, right)
        }
        Expression::If(if_expr) => eval_if_expression(if_expr, env),
        Expression::Function(lit) => Object::Function(Function {
            params: lit.params.clone(),
            body: lit.body.clone(),
            env: Rc::clone(env),
        }),
        Expression::Call(call) => {
            let func = eval_expression(&call.function, env);
            if is_error(&func) {
                return func;
            }
            match eval_expressions(&call.args, env) {
                Ok(args) => apply_function(func, args),
                Err(err) => err,
            }
        }
        Expression::Index(index) => {
            let left = eval_expression(&index.left, env);
            if is_error(&left) {
                return left;
            }
            let idx = eval_expression(&index.index, env);
            if is_error(&idx) {
                return idx;
            }
            eval_index_expression(left, idx)
        }
    }
}

fn eval_expressions(
    exprs: &[Expression],
    env: &Rc<RefCell<Environment>>,
) -> Result<Vec<Object>, Object> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let evaluated = eval_expression(expr, env);
        if is_error(&evaluated) {
            return Err(evaluated);
        }
        result.push(evaluated);
    }
    Ok(result)
}

fn eval_identifier(ident: &Identifier, env: &Rc<RefCell<Environment>>) -> Object {
    if let Some(val) = env.borrow().get(&ident.value) {
        return val;
    }
    if let Some(builtin) = BUILTINS.get(ident.value.as_str()) {
        return Object::Builtin(*builtin);
    }
    Object::Error(format!("identifier not found: {}", ident.value))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => eval_bang_operator_expression(right),
        "-" => eval_minus_prefix_operator_expression(right),
        _ => Object::Error(format!(
            "unsupported operator: {}{}",
            operator,
            right.object_type()
        )),
    }
}

fn eval_bang_operator_expression(right: Object) -> Object {
    match right {
        Object::Boolean(value) => native_bool_to_object(!value),
        // Zero is the one falsy integer under bang
        Object::Integer(0) => native_bool_to_object(true),
        Object::Integer(_) => native_bool_to_object(false),
        Object::Null => native_bool_to_object(true),
        _ => native_bool_to_object(false),
    }
}

fn eval_minus_prefix_operator_expression(right: Object) -> Object {
    match right {
        Object::Integer(value) => Object::Integer(value.wrapping_neg()),
        other => Object::Error(format!("unsupported operator: -{}", other.object_type())),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => {
            eval_integer_infix_expression(operator, l, r)
        }
        (Object::Str(l), Object::Str(r)) => eval_string_infix_expression(operator, &l, &r),
        (left, right) => match operator {
            "==" => native_bool_to_object(objects_identical(&left, &right)),
            "!=" => native_bool_to_object(!objects_identical(&left, &right)),
            _ if left.object_type() != right.object_type() => Object::Error(format!(
                "type mismatch: {} {} {}",
                left.object_type(),
                operator,
                right.object_type()
            )),
            _ => Object::Error(format!(
                "unsupported operator: {} {} {}",
                left.object_type(),
                operator,
                right.object_type()
            )),
        },
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Object::Error(format!("division by zero: {} / {}", left, right))
            } else {
                Object::Integer(left.wrapping_div(right))
            }
        }
        "<" => native_bool_to_object(left < right),
        "<=" => native_bool_to_object(left <= right),
        ">" => native_bool_to_object(left > right),
        ">=" => native_bool_to_object(left >= right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => Object::Error(format!(
            "unsupported operator: {} {} {}",
            ObjectType::Integer,
            operator,
            ObjectType::Integer
        )),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    if operator != "+" {
        return Object::Error(format!(
            "unsupported operator: {} {} {}",
            ObjectType::String,
            operator,
            ObjectType::String
        ));
    }
    Object::Str(format!("{}{}", left, right))
}

// Equality on the fallthrough path mirrors singleton interning: only the
// boolean and null values compare equal to themselves, everything else is
// a distinct object.
fn objects_identical(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Boolean(l), Object::Boolean(r)) => l == r,
        (Object::Null, Object::Null) => true,
        _ => false,
    }
}

fn eval_if_expression(if_expr: &IfExpression, env: &Rc<RefCell<Environment>>) -> Object {
    let condition = eval_expression(&if_expr.condition, env);
    if is_error(&condition) {
        return condition;
    }

    if is_truthy(&condition) {
        eval_block_statement(&if_expr.body, env)
    } else {
        match &if_expr.alternative {
            Some(ElseBranch::Block(block)) => eval_block_statement(block, env),
            Some(ElseBranch::If(nested)) => eval_if_expression(nested, env),
            None => Object::Null,
        }
    }
}

// Null and false are the only falsy condition values; zero is truthy.
fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Boolean(false))
}

fn is_error(obj: &Object) -> bool {
    matches!(obj, Object::Error(_))
}

fn apply_function(func: Object, args: Vec<Object>) -> Object {
    match func {
        Object::Function(func) => {
            if func.params.len() != args.len() {
                return Object::Error(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    func.params.len()
                ));
            }
            let extended_env = extend_function_env(&func, args);
            let evaluated = eval_block_statement(&func.body, &extended_env);
            unwrap_return_value(evaluated)
        }
        Object::Builtin(builtin) => (builtin.func)(args),
        other => Object::Error(format!("not a function: {}", other.object_type())),
    }
}

// The new scope's outer link is the function's captured environment, not
// the caller's.
fn extend_function_env(func: &Function, args: Vec<Object>) -> Rc<RefCell<Environment>> {
    let mut env = Environment::new_enclosed(Rc::clone(&func.env));
    for (param, arg) in func.params.iter().zip(args) {
        env.set(param.value.clone(), arg);
    }
    Rc::new(RefCell::new(env))
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (left, index) {
        (Object::Array(elements), Object::Integer(idx)) => {
            eval_array_index_expression(elements, idx)
        }
        (Object::Array(_), index) => Object::Error(format!(
            "invalid argument: index {} ({}) is not an integer",
            index.inspect(),
            index.object_type()
        )),
        (left, _) => Object::Error(format!(
            "unsupported operator: index not supported on {} ({})",
            left.inspect(),
            left.object_type()
        )),
    }
}

fn eval_array_index_expression(elements: Vec<Object>, index: i64) -> Object {
    let len = elements.len() as i64;
    // A negative index counts back from the end
    let idx = if index < 0 { len + index } else { index };
    if idx < 0 || idx >= len {
        return Object::Null;
    }
    elements[idx as usize].clone()
}

fn native_bool_to_object(value: bool) -> Object {
    Object::Boolean(value)
}
