use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use lazy_static::lazy_static;

use crate::ast;
use crate::env::Environment;

const ERR_WRONG_NUMBER_OF_ARGS: &str = "wrong number of arguments";
const ERR_NOT_ENOUGH_ARGS_APPEND: &str =
    "invalid argument: not enough arguments for append, expected>=1, got=0";

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let mut m = HashMap::new();
        m.insert(
            "len",
            Builtin {
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 1 {
                        return Object::Error(format!(
                            "{}. got={}, want=1",
                            ERR_WRONG_NUMBER_OF_ARGS,
                            args.len()
                        ));
                    }
                    match &args[0] {
                        Object::Str(s) => Object::Integer(s.len() as i64),
                        Object::Array(elems) => Object::Integer(elems.len() as i64),
                        other => Object::Error(format!(
                            "invalid argument: {} ({}) not supported for len",
                            other.inspect(),
                            other.object_type()
                        )),
                    }
                },
            },
        );
        m.insert(
            "append",
            Builtin {
                func: |mut args: Vec<Object>| -> Object {
                    if args.is_empty() {
                        return Object::Error(ERR_NOT_ENOUGH_ARGS_APPEND.to_string());
                    }
                    match args.remove(0) {
                        Object::Array(mut elems) => {
                            // The source array is cloned up in the call
                            // machinery, so extending here never mutates it.
                            elems.extend(args);
                            Object::Array(elems)
                        }
                        other => Object::Error(format!(
                            "invalid argument: first argument for append must be an array. got={} ({})",
                            other.inspect(),
                            other.object_type()
                        )),
                    }
                },
            },
        );
        m
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Function,
    Builtin,
    Error,
    ReturnValue,
}

// These tags appear verbatim in error messages.
impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Error => "ERROR",
            ObjectType::ReturnValue => "RETURN_VALUE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Array(Vec<Object>),
    Null,
    Function(Function),
    Builtin(Builtin),
    ReturnValue(Box<Object>),
    Error(String),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Str(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Null => ObjectType::Null,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(v) => v.to_string(),
            Object::Boolean(v) => v.to_string(),
            Object::Str(v) => v.clone(),
            Object::Array(elems) => {
                let elems: Vec<String> = elems.iter().map(|e| e.inspect()).collect();
                format!("[{}]", elems.join(", "))
            }
            Object::Null => "null".to_string(),
            Object::Function(f) => f.inspect(),
            Object::Builtin(_) => "builtin function".to_string(),
            Object::ReturnValue(v) => v.inspect(),
            Object::Error(msg) => format!("ERROR: {}", msg),
        }
    }
}

/// A user function closed over the environment that was active when its
/// literal was evaluated, not the caller's.
#[derive(Clone)]
pub struct Function {
    pub params: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

impl Function {
    fn inspect(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        format!("fn({}) {{\n{}\n}}", params.join(", "), self.body)
    }
}

// The captured environment can hold the function itself, so the derived
// Debug would recurse forever on recursive bindings.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub func: fn(Vec<Object>) -> Object,
}
