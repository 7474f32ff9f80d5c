//! CurryLisp - a small Lisp interpreter with automatic partial application
//!
//! This crate implements a tree-walking interpreter for a Lisp-family
//! language with s-expression syntax, first-class functions and
//! non-hygienic macros. Calling a function with fewer arguments than it
//! has parameters does not fail; it produces a partial application that
//! can be applied to the remaining arguments later:
//!
//! ```lisp
//! (defun add (x y) (+ x y))
//! (setq add1 (add 1))   ; partial application, no body runs
//! (add1 41)             ; => 42
//! ```
//!
//! The pipeline is the classic reader/evaluator pair:
//!
//! - `lexer`: source text to a token sequence
//! - `parser`: tokens to s-expression [`ast::Value`] trees
//! - `evaluator`: values reduced in a chain of [`evaluator::Env`] frames
//! - `builtinops`: the primitive operations installed in the root
//!   environment
//! - `repl`: the interactive line-oriented front end
//!
//! Truth is represented by the atom `T`, falsity and the empty list by
//! `NIL`. Numbers are either 64-bit integers or IEEE-754 doubles;
//! mixing the two in arithmetic promotes the result to a double.

use std::fmt;
use std::rc::Rc;

use crate::ast::Value;
use crate::evaluator::Env;

pub mod ast;
pub mod builtinops;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;

/// Maximum reader recursion depth.
/// Bounds nesting of lists and quote prefixes so that hostile input
/// cannot overflow the parser's stack.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Error type for the interpreter.
///
/// Every failure carries its kind plus a human-readable message. An
/// error aborts evaluation of the current top-level form only; the REPL
/// reports it on stderr and keeps going, while script mode stops at the
/// first error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Unexpected character or unterminated string literal
    Lex(String),
    /// Premature end of input, unexpected token, unbalanced parens
    Parse(String),
    /// Symbol lookup failed in every enclosing environment frame
    UnboundSymbol(String),
    /// Head of a combination did not evaluate to a callable
    NotCallable(String),
    /// A function received more arguments than it has parameters
    ArityExcess { expected: usize, got: usize },
    /// Wrong argument count for a macro or a fixed-arity builtin
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    /// Too few arguments for a variadic builtin
    ArityShort {
        name: String,
        least: usize,
        got: usize,
    },
    /// Operand variant incompatible with a primitive
    Type(String),
    /// Integer division by zero or integer overflow
    Arith(String),
    /// A `read-*` builtin could not produce the requested value
    Io(String),
    /// Comma form evaluated outside of a backquote context
    IllegalComma,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(msg) => write!(f, "LexError: {msg}"),
            Error::Parse(msg) => write!(f, "ParseError: {msg}"),
            Error::UnboundSymbol(name) => {
                write!(f, "UnboundSymbol: no binding for symbol '{name}'")
            }
            Error::NotCallable(msg) => write!(f, "NotCallable: {msg}"),
            Error::ArityExcess { expected, got } => write!(
                f,
                "ArityError: function expected {expected} arguments, but got {got}"
            ),
            Error::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "ArityError: {name} expected {expected} arguments, but got {got}"
            ),
            Error::ArityShort { name, least, got } => write!(
                f,
                "ArityError: {name} expected at least {least} arguments, but got {got}"
            ),
            Error::Type(msg) => write!(f, "TypeError: {msg}"),
            Error::Arith(msg) => write!(f, "ArithError: {msg}"),
            Error::Io(msg) => write!(f, "IOError: {msg}"),
            Error::IllegalComma => write!(f, "IllegalComma: comma is illegal outside of backquote"),
        }
    }
}

impl std::error::Error for Error {}

/// Lex, parse and evaluate a complete program in the given environment.
///
/// Each top-level form is evaluated in order; the value of the last one
/// is returned. An empty program yields `NIL`. The first error aborts
/// the remaining forms.
pub fn run(source: &str, env: &Rc<Env>) -> Result<Value, Error> {
    let tokens = lexer::lex(source)?;
    let exprs = parser::parse(&tokens)?;
    let mut result = Value::Nil;
    for expr in &exprs {
        result = evaluator::eval(expr, env)?;
    }
    Ok(result)
}
