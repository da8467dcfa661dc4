use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::env::Environment;
use crate::eval::eval;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

const PROMPT: &str = ">> ";

/// Reads lines until end of input (or `exit`/`quit`), evaluating each one
/// against an environment that persists for the whole session.
pub fn start<R: BufRead, W: Write>(mut input: R, output: &mut W) {
    let env = Rc::new(RefCell::new(Environment::new()));

    loop {
        write!(output, "{}", PROMPT).unwrap();
        output.flush().unwrap();

        let mut line = String::new();
        if input.read_line(&mut line).unwrap() == 0 {
            return;
        }

        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            return;
        }

        let lexer = Lexer::new(&line);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            print_parser_errors(output, parser.errors());
            continue;
        }

        let evaluated = eval(&program, &env);
        if !matches!(evaluated, Object::Null) {
            writeln!(output, "{}", evaluated.inspect()).unwrap();
        }
    }
}

/// Runs a whole source text against a fresh environment. Returns false when
/// parsing failed or the program produced an error value, so callers can
/// map the outcome to an exit code.
pub fn run<W: Write>(source: &str, output: &mut W) -> bool {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        print_parser_errors(output, parser.errors());
        return false;
    }

    let env = Rc::new(RefCell::new(Environment::new()));
    match eval(&program, &env) {
        err @ Object::Error(_) => {
            writeln!(output, "{}", err.inspect()).unwrap();
            false
        }
        Object::Null => true,
        other => {
            writeln!(output, "{}", other.inspect()).unwrap();
            true
        }
    }
}

fn print_parser_errors<W: Write>(output: &mut W, errors: &[String]) {
    writeln!(output, " parser errors:").unwrap();
    for msg in errors {
        writeln!(output, "\t{}", msg).unwrap();
    }
}
