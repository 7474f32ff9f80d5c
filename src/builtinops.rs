//! Built-in operations registry.
//!
//! Every primitive of the language is a [`BuiltinOp`]: a name, an
//! [`Arity`] and a function pointer with the canonical builtin
//! signature. Builtins receive the raw, unevaluated argument list plus
//! the current environment; each one decides for itself whether to
//! evaluate its arguments. That is what lets `quote`, `if`, `lambda`
//! and `setq` live in the same table as `+` and `car` instead of being
//! special-cased in the evaluator.
//!
//! The evaluator validates the declared arity before invoking an op,
//! so the argument-count checks inside the individual functions only
//! serve as the terminal match arms of their destructuring.
//!
//! ## Argument conventions
//!
//! - *eval-strict(n)*: evaluate each argument, require exactly `n`
//! - *eval(>= n)*: evaluate each argument, require at least `n`
//! - *raw-strict(n)*: do not evaluate, require exactly `n`

use std::collections::HashMap;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::LazyLock;

use crate::Error;
use crate::ast::{Cons, Lambda, MacroDef, Value, args_iter};
use crate::evaluator::{Env, eval, eval_args, expand_macro};

/// Canonical builtin signature: raw argument list plus current env.
pub type BuiltinFn = fn(Option<&Rc<Cons>>, &Rc<Env>) -> Result<Value, Error>;

/// Expected number of arguments for a builtin operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    /// Exactly n arguments
    Exact(usize),
    /// At least n arguments
    AtLeast(usize),
    /// Any number of arguments
    Any,
}

impl Arity {
    /// Check an argument count against this arity.
    pub fn validate(&self, name: &str, got: usize) -> Result<(), Error> {
        match *self {
            Arity::Exact(expected) if got != expected => Err(Error::ArityMismatch {
                name: name.to_owned(),
                expected,
                got,
            }),
            Arity::AtLeast(least) if got < least => Err(Error::ArityShort {
                name: name.to_owned(),
                least,
                got,
            }),
            _ => Ok(()),
        }
    }
}

/// Definition of a built-in operation.
#[derive(Debug)]
pub struct BuiltinOp {
    /// The identifier the operation is bound to in the root env
    pub name: &'static str,
    /// Expected number of arguments
    pub arity: Arity,
    /// The implementation
    pub func: BuiltinFn,
}

impl PartialEq for BuiltinOp {
    fn eq(&self, other: &Self) -> bool {
        // Ops are identified by name, not by function pointer
        self.name == other.name
    }
}

//
// Argument helpers
//

/// Clone the raw argument list into a vector.
fn collect_raw(args: Option<&Rc<Cons>>) -> Vec<Value> {
    args_iter(args).cloned().collect()
}

/// Evaluate every argument into a vector, left to right.
fn collect_eval(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Vec<Value>, Error> {
    eval_args(args, env)
}

fn arity_mismatch(name: &str, expected: usize, got: usize) -> Error {
    Error::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    }
}

fn arity_short(name: &str, least: usize, got: usize) -> Error {
    Error::ArityShort {
        name: name.to_owned(),
        least,
        got,
    }
}

//
// Core list and data primitives
//

fn builtin_quote(args: Option<&Rc<Cons>>, _env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_raw(args);
    match args.as_slice() {
        [expr] => Ok(expr.clone()),
        _ => Err(arity_mismatch("quote", 1, args.len())),
    }
}

fn builtin_list(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    Ok(Value::list(collect_eval(args, env)?))
}

fn builtin_car(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::List(cell)] => Ok(cell.head.clone()),
        [Value::Nil] => Ok(Value::Nil),
        [other] => Err(Error::Type(format!("{other} is not a list"))),
        _ => Err(arity_mismatch("car", 1, args.len())),
    }
}

fn builtin_cdr(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::List(cell)] => Ok(match &cell.tail {
            Some(tail) => Value::List(tail.clone()),
            None => Value::Nil,
        }),
        [Value::Nil] => Ok(Value::Nil),
        [other] => Err(Error::Type(format!("{other} is not a list"))),
        _ => Err(arity_mismatch("cdr", 1, args.len())),
    }
}

fn builtin_cons(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [first, Value::List(tail)] => Ok(Value::List(Rc::new(Cons {
            head: first.clone(),
            tail: Some(tail.clone()),
        }))),
        [first, Value::Nil] => Ok(Value::list(vec![first.clone()])),
        // Improper pairs do not exist; a non-list second argument
        // makes a two-element list
        [first, second] => Ok(Value::list(vec![first.clone(), second.clone()])),
        _ => Err(arity_mismatch("cons", 2, args.len())),
    }
}

fn builtin_atom(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [value] => Ok(if value.is_atom() { Value::T } else { Value::Nil }),
        _ => Err(arity_mismatch("atom", 1, args.len())),
    }
}

fn builtin_if(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_raw(args);
    match args.as_slice() {
        [condition, then_branch, else_branch] => {
            // Everything but NIL counts as true
            if matches!(eval(condition, env)?, Value::Nil) {
                eval(else_branch, env)
            } else {
                eval(then_branch, env)
            }
        }
        _ => Err(arity_mismatch("if", 3, args.len())),
    }
}

//
// Numeric comparisons
//

macro_rules! numeric_comparison {
    ($fn_name:ident, $name:literal, $op:tt) => {
        fn $fn_name(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
            let args = collect_eval(args, env)?;
            match args.as_slice() {
                [lhs, rhs] => {
                    let truth = match (lhs, rhs) {
                        (Value::Integer(l), Value::Integer(r)) => l $op r,
                        (Value::Integer(l), Value::Number(r)) => (*l as f64) $op *r,
                        (Value::Number(l), Value::Integer(r)) => *l $op (*r as f64),
                        (Value::Number(l), Value::Number(r)) => l $op r,
                        _ => {
                            return Err(Error::Type(format!(
                                concat!(
                                    $name,
                                    " cannot be applied to non-numeric operands: lhs is {} and rhs is {}"
                                ),
                                lhs, rhs
                            )));
                        }
                    };
                    Ok(if truth { Value::T } else { Value::Nil })
                }
                _ => Err(arity_mismatch($name, 2, args.len())),
            }
        }
    };
}

numeric_comparison!(builtin_num_eq, "=", ==);
numeric_comparison!(builtin_num_ne, "/=", !=);
numeric_comparison!(builtin_num_lt, "<", <);
numeric_comparison!(builtin_num_gt, ">", >);
numeric_comparison!(builtin_num_le, "<=", <=);
numeric_comparison!(builtin_num_ge, ">=", >=);

//
// Arithmetic
//

/// Left-fold evaluated operands pairwise. An all-integer fold stays in
/// `Integer`; the first `Number` operand promotes the rest of the fold
/// to doubles.
fn fold_numeric(
    name: &'static str,
    args: Vec<Value>,
    int_op: impl Fn(i64, i64) -> Result<i64, Error>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    if args.len() < 2 {
        return Err(arity_short(name, 2, args.len()));
    }
    let mut acc = args[0].clone();
    for operand in &args[1..] {
        acc = match (&acc, operand) {
            (Value::Integer(l), Value::Integer(r)) => Value::Integer(int_op(*l, *r)?),
            (Value::Integer(l), Value::Number(r)) => Value::Number(float_op(*l as f64, *r)),
            (Value::Number(l), Value::Integer(r)) => Value::Number(float_op(*l, *r as f64)),
            (Value::Number(l), Value::Number(r)) => Value::Number(float_op(*l, *r)),
            (l, r) => {
                return Err(Error::Type(format!(
                    "{name} cannot be applied to non-numeric operands: lhs is {l} and rhs is {r}"
                )));
            }
        };
    }
    Ok(acc)
}

fn builtin_add(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    fold_numeric(
        "+",
        collect_eval(args, env)?,
        |l, r| {
            l.checked_add(r)
                .ok_or_else(|| Error::Arith("integer overflow in +".to_owned()))
        },
        |l, r| l + r,
    )
}

fn builtin_sub(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    fold_numeric(
        "-",
        collect_eval(args, env)?,
        |l, r| {
            l.checked_sub(r)
                .ok_or_else(|| Error::Arith("integer overflow in -".to_owned()))
        },
        |l, r| l - r,
    )
}

fn builtin_mul(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    fold_numeric(
        "*",
        collect_eval(args, env)?,
        |l, r| {
            l.checked_mul(r)
                .ok_or_else(|| Error::Arith("integer overflow in *".to_owned()))
        },
        |l, r| l * r,
    )
}

fn builtin_div(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    fold_numeric(
        "/",
        collect_eval(args, env)?,
        |l, r| {
            // All-integer division truncates; dividing by 0.0 instead
            // follows IEEE-754 in the float arm below.
            if r == 0 {
                return Err(Error::Arith("integer division by zero".to_owned()));
            }
            l.checked_div(r)
                .ok_or_else(|| Error::Arith("integer overflow in /".to_owned()))
        },
        |l, r| l / r,
    )
}

//
// String comparisons
//

macro_rules! string_comparison {
    ($fn_name:ident, $name:literal, $op:tt) => {
        fn $fn_name(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
            let args = collect_eval(args, env)?;
            match args.as_slice() {
                [Value::String(lhs), Value::String(rhs)] => {
                    Ok(if lhs $op rhs { Value::T } else { Value::Nil })
                }
                [_, _] => Err(Error::Type(
                    concat!("operands of ", $name, " must be string").to_owned(),
                )),
                _ => Err(arity_mismatch($name, 2, args.len())),
            }
        }
    };
}

string_comparison!(builtin_string_eq, "string=", ==);
string_comparison!(builtin_string_ne, "string/=", !=);
string_comparison!(builtin_string_lt, "string<", <);
string_comparison!(builtin_string_gt, "string>", >);
string_comparison!(builtin_string_le, "string<=", <=);
string_comparison!(builtin_string_ge, "string>=", >=);

fn builtin_string_equal(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::String(lhs), Value::String(rhs)] => {
            Ok(if lhs.eq_ignore_ascii_case(rhs) {
                Value::T
            } else {
                Value::Nil
            })
        }
        [_, _] => Err(Error::Type(
            "operands of string-equal must be string".to_owned(),
        )),
        _ => Err(arity_mismatch("string-equal", 2, args.len())),
    }
}

//
// Printing
//

/// Render a printable value. Only strings and numbers may be printed;
/// `quoted` controls whether strings keep their surrounding quotes.
fn printable(name: &str, value: &Value, quoted: bool) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(if quoted {
            format!("\"{s}\"")
        } else {
            s.clone()
        }),
        Value::Integer(_) | Value::Number(_) => Ok(value.to_string()),
        other => Err(Error::Type(format!(
            "{name} can only accept string, integer or number, got {other}"
        ))),
    }
}

fn print_one(
    name: &str,
    args: Option<&Rc<Cons>>,
    env: &Rc<Env>,
    quoted: bool,
    leading_newline: bool,
) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [value] => {
            let text = printable(name, value, quoted)?;
            if leading_newline {
                print!("\n{text}");
            } else {
                print!("{text}");
            }
            Ok(value.clone())
        }
        _ => Err(arity_mismatch(name, 1, args.len())),
    }
}

fn builtin_write(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    print_one("write", args, env, true, false)
}

fn builtin_prin1(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    print_one("prin1", args, env, true, false)
}

fn builtin_princ(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    print_one("princ", args, env, false, false)
}

fn builtin_print(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    print_one("print", args, env, true, true)
}

fn builtin_write_line(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::String(s)] => {
            println!("{s}");
            Ok(Value::String(s.clone()))
        }
        [other] => Err(Error::Type(format!(
            "write-line can only accept string, got {other}"
        ))),
        _ => Err(arity_mismatch("write-line", 1, args.len())),
    }
}

//
// Reading from standard input
//

/// Read one whitespace-delimited token from stdin. EOF before any
/// non-whitespace byte is an error.
fn read_stdin_token(wanted: &str) -> Result<String, Error> {
    let stdin = io::stdin();
    let mut token = String::new();
    for byte in stdin.lock().bytes() {
        let byte =
            byte.map_err(|e| Error::Io(format!("failed to read from standard input: {e}")))?;
        let ch = byte as char;
        if ch.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(ch);
    }
    if token.is_empty() {
        Err(Error::Io(format!("failed to read {wanted}")))
    } else {
        Ok(token)
    }
}

fn builtin_read_str(_args: Option<&Rc<Cons>>, _env: &Rc<Env>) -> Result<Value, Error> {
    read_stdin_token("a string").map(Value::String)
}

fn builtin_read_int(_args: Option<&Rc<Cons>>, _env: &Rc<Env>) -> Result<Value, Error> {
    let token = read_stdin_token("an integer")?;
    token
        .parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| Error::Io(format!("failed to read an integer, got '{token}'")))
}

fn builtin_read_num(_args: Option<&Rc<Cons>>, _env: &Rc<Env>) -> Result<Value, Error> {
    let token = read_stdin_token("a number")?;
    token
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| Error::Io(format!("failed to read a number, got '{token}'")))
}

//
// Functions, macros and definitions
//

/// Interpret a parameter form: `NIL` for a nullary callable, or a list
/// whose every element is a symbol.
fn parse_params(name: &str, form: &Value) -> Result<Vec<String>, Error> {
    match form {
        Value::Nil => Ok(Vec::new()),
        Value::List(cell) => cell
            .iter()
            .map(|param| match param {
                Value::Symbol(p) => Ok(p.clone()),
                other => Err(Error::Type(format!(
                    "parameters of {name} must be symbols, got {other}"
                ))),
            })
            .collect(),
        other => Err(Error::Type(format!(
            "first argument of {name} must be a parameter list, got {other}"
        ))),
    }
}

fn make_function(name: &str, forms: &[Value], env: &Rc<Env>) -> Result<Value, Error> {
    match forms.split_first() {
        Some((params, body)) => Ok(Value::Function(Rc::new(Lambda {
            params: parse_params(name, params)?,
            body: body.to_vec(),
            env: env.clone(),
        }))),
        None => Err(arity_short(name, 1, 0)),
    }
}

fn make_macro(name: &str, forms: &[Value]) -> Result<Value, Error> {
    match forms.split_first() {
        Some((params, body)) => Ok(Value::Macro(Rc::new(MacroDef {
            params: parse_params(name, params)?,
            body: body.to_vec(),
        }))),
        None => Err(arity_short(name, 1, 0)),
    }
}

fn builtin_lambda(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    make_function("lambda", &collect_raw(args), env)
}

fn builtin_macro(args: Option<&Rc<Cons>>, _env: &Rc<Env>) -> Result<Value, Error> {
    make_macro("macro", &collect_raw(args))
}

fn builtin_defun(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_raw(args);
    match args.as_slice() {
        [Value::Symbol(name), rest @ ..] => {
            let function = make_function("defun", rest, env)?;
            env.define(name.clone(), function.clone());
            Ok(function)
        }
        [other, ..] => Err(Error::Type(format!(
            "first argument of defun must be a symbol, got {other}"
        ))),
        [] => Err(arity_short("defun", 2, 0)),
    }
}

fn builtin_defmacro(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_raw(args);
    match args.as_slice() {
        [Value::Symbol(name), rest @ ..] => {
            let mac = make_macro("defmacro", rest)?;
            env.define(name.clone(), mac.clone());
            Ok(mac)
        }
        [other, ..] => Err(Error::Type(format!(
            "first argument of defmacro must be a symbol, got {other}"
        ))),
        [] => Err(arity_short("defmacro", 2, 0)),
    }
}

fn builtin_set(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::Symbol(name), value] => {
            env.define(name.clone(), value.clone());
            Ok(value.clone())
        }
        [other, _] => Err(Error::Type(format!(
            "first argument of set must evaluate to a symbol, got {other}"
        ))),
        _ => Err(arity_mismatch("set", 2, args.len())),
    }
}

fn builtin_setq(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_raw(args);
    match args.as_slice() {
        [Value::Symbol(name), expr] => {
            let value = eval(expr, env)?;
            env.define(name.clone(), value.clone());
            Ok(value)
        }
        [other, _] => Err(Error::Type(format!(
            "first argument of setq must be a symbol, got {other}"
        ))),
        _ => Err(arity_mismatch("setq", 2, args.len())),
    }
}

//
// Conversions and reflection
//

fn builtin_int_to_string(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::Integer(n)] => Ok(Value::String(n.to_string())),
        [other] => Err(Error::Type(format!("{other} is not an integer"))),
        _ => Err(arity_mismatch("int-to-string", 1, args.len())),
    }
}

fn builtin_num_to_string(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [value @ Value::Number(_)] => Ok(Value::String(value.to_string())),
        [other] => Err(Error::Type(format!("{other} is not a number"))),
        _ => Err(arity_mismatch("num-to-string", 1, args.len())),
    }
}

fn builtin_type_of(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [value] => Ok(Value::String(value.type_name().to_owned())),
        _ => Err(arity_mismatch("type-of", 1, args.len())),
    }
}

fn builtin_debug(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [value] => Ok(Value::String(value.to_string())),
        _ => Err(arity_mismatch("debug", 1, args.len())),
    }
}

fn builtin_concat(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    if args.len() < 2 {
        return Err(arity_short("concat", 2, args.len()));
    }
    let mut result = String::new();
    for value in &args {
        match value {
            Value::String(s) => result.push_str(s),
            other => {
                return Err(Error::Type(format!(
                    "operands of concat must be string, got {other}"
                )));
            }
        }
    }
    Ok(Value::String(result))
}

fn builtin_macroexpand(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Value, Error> {
    let args = collect_eval(args, env)?;
    match args.as_slice() {
        [Value::List(cell)] => {
            let head = eval(&cell.head, env)?;
            match head {
                Value::Macro(mac) => expand_macro(&mac, cell.tail.as_ref(), env),
                other => Err(Error::Type(format!(
                    "head of the list must resolve to a macro, got {other}"
                ))),
            }
        }
        [other] => Err(Error::Type(format!(
            "first argument of macroexpand must evaluate to a list, got {other}"
        ))),
        _ => Err(arity_mismatch("macroexpand", 1, args.len())),
    }
}

/// Global registry of all built-in operations, in the order they are
/// installed into the root environment.
static BUILTIN_OPS: LazyLock<Vec<BuiltinOp>> = LazyLock::new(|| {
    vec![
        // Quoting and list primitives
        BuiltinOp {
            name: "quote",
            arity: Arity::Exact(1),
            func: builtin_quote,
        },
        BuiltinOp {
            name: "list",
            arity: Arity::Any,
            func: builtin_list,
        },
        BuiltinOp {
            name: "car",
            arity: Arity::Exact(1),
            func: builtin_car,
        },
        BuiltinOp {
            name: "cdr",
            arity: Arity::Exact(1),
            func: builtin_cdr,
        },
        BuiltinOp {
            name: "cons",
            arity: Arity::Exact(2),
            func: builtin_cons,
        },
        BuiltinOp {
            name: "atom",
            arity: Arity::Exact(1),
            func: builtin_atom,
        },
        // Control flow
        BuiltinOp {
            name: "if",
            arity: Arity::Exact(3),
            func: builtin_if,
        },
        // Numeric comparisons
        BuiltinOp {
            name: "=",
            arity: Arity::Exact(2),
            func: builtin_num_eq,
        },
        BuiltinOp {
            name: "/=",
            arity: Arity::Exact(2),
            func: builtin_num_ne,
        },
        BuiltinOp {
            name: "<",
            arity: Arity::Exact(2),
            func: builtin_num_lt,
        },
        BuiltinOp {
            name: ">",
            arity: Arity::Exact(2),
            func: builtin_num_gt,
        },
        BuiltinOp {
            name: "<=",
            arity: Arity::Exact(2),
            func: builtin_num_le,
        },
        BuiltinOp {
            name: ">=",
            arity: Arity::Exact(2),
            func: builtin_num_ge,
        },
        // Arithmetic
        BuiltinOp {
            name: "+",
            arity: Arity::AtLeast(2),
            func: builtin_add,
        },
        BuiltinOp {
            name: "-",
            arity: Arity::AtLeast(2),
            func: builtin_sub,
        },
        BuiltinOp {
            name: "*",
            arity: Arity::AtLeast(2),
            func: builtin_mul,
        },
        BuiltinOp {
            name: "/",
            arity: Arity::AtLeast(2),
            func: builtin_div,
        },
        // String comparisons
        BuiltinOp {
            name: "string=",
            arity: Arity::Exact(2),
            func: builtin_string_eq,
        },
        BuiltinOp {
            name: "string/=",
            arity: Arity::Exact(2),
            func: builtin_string_ne,
        },
        BuiltinOp {
            name: "string<",
            arity: Arity::Exact(2),
            func: builtin_string_lt,
        },
        BuiltinOp {
            name: "string>",
            arity: Arity::Exact(2),
            func: builtin_string_gt,
        },
        BuiltinOp {
            name: "string<=",
            arity: Arity::Exact(2),
            func: builtin_string_le,
        },
        BuiltinOp {
            name: "string>=",
            arity: Arity::Exact(2),
            func: builtin_string_ge,
        },
        BuiltinOp {
            name: "string-equal",
            arity: Arity::Exact(2),
            func: builtin_string_equal,
        },
        // Printing
        BuiltinOp {
            name: "write",
            arity: Arity::Exact(1),
            func: builtin_write,
        },
        BuiltinOp {
            name: "prin1",
            arity: Arity::Exact(1),
            func: builtin_prin1,
        },
        BuiltinOp {
            name: "princ",
            arity: Arity::Exact(1),
            func: builtin_princ,
        },
        BuiltinOp {
            name: "print",
            arity: Arity::Exact(1),
            func: builtin_print,
        },
        BuiltinOp {
            name: "write-line",
            arity: Arity::Exact(1),
            func: builtin_write_line,
        },
        // Reading
        BuiltinOp {
            name: "read-str",
            arity: Arity::Exact(0),
            func: builtin_read_str,
        },
        BuiltinOp {
            name: "read-int",
            arity: Arity::Exact(0),
            func: builtin_read_int,
        },
        BuiltinOp {
            name: "read-num",
            arity: Arity::Exact(0),
            func: builtin_read_num,
        },
        // Functions, macros, definitions
        BuiltinOp {
            name: "lambda",
            arity: Arity::AtLeast(1),
            func: builtin_lambda,
        },
        BuiltinOp {
            name: "macro",
            arity: Arity::AtLeast(1),
            func: builtin_macro,
        },
        BuiltinOp {
            name: "defun",
            arity: Arity::AtLeast(2),
            func: builtin_defun,
        },
        BuiltinOp {
            name: "defmacro",
            arity: Arity::AtLeast(2),
            func: builtin_defmacro,
        },
        BuiltinOp {
            name: "set",
            arity: Arity::Exact(2),
            func: builtin_set,
        },
        BuiltinOp {
            name: "setq",
            arity: Arity::Exact(2),
            func: builtin_setq,
        },
        // Conversions and reflection
        BuiltinOp {
            name: "int-to-string",
            arity: Arity::Exact(1),
            func: builtin_int_to_string,
        },
        BuiltinOp {
            name: "num-to-string",
            arity: Arity::Exact(1),
            func: builtin_num_to_string,
        },
        BuiltinOp {
            name: "type-of",
            arity: Arity::Exact(1),
            func: builtin_type_of,
        },
        BuiltinOp {
            name: "debug",
            arity: Arity::Exact(1),
            func: builtin_debug,
        },
        BuiltinOp {
            name: "concat",
            arity: Arity::AtLeast(2),
            func: builtin_concat,
        },
        BuiltinOp {
            name: "macroexpand",
            arity: Arity::Exact(1),
            func: builtin_macroexpand,
        },
    ]
});

/// Lazy index from name to operation.
static BUILTIN_INDEX: LazyLock<HashMap<&'static str, &'static BuiltinOp>> = LazyLock::new(|| {
    let ops: &'static [BuiltinOp] = BUILTIN_OPS.as_slice();
    ops.iter().map(|op| (op.name, op)).collect()
});

/// All builtin operations, in installation order.
pub fn get_builtin_ops() -> &'static [BuiltinOp] {
    BUILTIN_OPS.as_slice()
}

/// Find a builtin operation by name.
pub fn find_op(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_INDEX.get(name).copied()
}
