//! Expression evaluation.
//!
//! [`eval`] reduces a [`Value`] in a chain of [`Env`] frames. Data
//! atoms and callables evaluate to themselves, symbols are looked up
//! parent-ward through the environment chain, quoted forms yield their
//! payload, and non-empty lists are combinations: the head is
//! evaluated to a callable which is then applied to the argument tail.
//!
//! Functions apply to evaluated arguments and support automatic
//! partial application: fewer arguments than parameters produce a
//! [`Value::PartiallyApplied`] that stores the evaluated prefix and
//! waits for the rest. Macros apply to unevaluated arguments; the last
//! body value is the expansion, which is evaluated once more in the
//! caller's environment.
//!
//! Backquoted values currently evaluate to their payload unchanged,
//! exactly like quoted ones; no splicing is performed. Comma forms are
//! therefore only ever legal as data and fail when evaluated directly.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::Error;
use crate::ast::{Cons, Lambda, MacroDef, Value, args_iter, args_len};
use crate::builtinops::get_builtin_ops;

/// One lexical scope frame: a mutable binding table plus an optional
/// parent handle. Frames are shared via `Rc` so that closures can keep
/// their defining scope alive.
#[derive(Default)]
pub struct Env {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Env>) -> Self {
        Env {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    /// Bind a name in this frame, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Look a name up, walking parent-ward through the chain.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            None
        }
    }

    /// All visible bindings, innermost frame winning, sorted by name.
    pub fn all_bindings(&self) -> Vec<(String, Value)> {
        let mut merged = HashMap::new();
        if let Some(parent) = &self.parent {
            for (name, value) in parent.all_bindings() {
                merged.insert(name, value);
            }
        }
        for (name, value) in self.bindings.borrow().iter() {
            merged.insert(name.clone(), value.clone());
        }
        let mut result: Vec<_> = merged.into_iter().collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

/// Create the root environment with every builtin operation installed,
/// plus the self-referential bindings for the `T` and `NIL` atoms.
pub fn create_global_env() -> Rc<Env> {
    let env = Rc::new(Env::new());
    for op in get_builtin_ops() {
        env.define(op.name, Value::Builtin(op));
    }
    env.define("T", Value::T);
    env.define("NIL", Value::Nil);
    env
}

/// Evaluate an expression in the given environment.
pub fn eval(expr: &Value, env: &Rc<Env>) -> Result<Value, Error> {
    match expr {
        Value::T
        | Value::Nil
        | Value::Integer(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Function(_)
        | Value::PartiallyApplied { .. }
        | Value::Macro(_)
        | Value::Builtin(_)
        | Value::PartiallyAppliedBuiltin { .. } => Ok(expr.clone()),

        Value::Symbol(name) => env
            .lookup(name)
            .ok_or_else(|| Error::UnboundSymbol(name.clone())),

        Value::Quoted(inner) | Value::BackQuoted(inner) => Ok((**inner).clone()),

        Value::Comma(_) | Value::CommaAt(_) => Err(Error::IllegalComma),

        Value::List(cell) => eval_combination(cell, env),
    }
}

/// Evaluate a non-empty list as a combination: reduce the head to a
/// callable and apply it to the argument tail.
fn eval_combination(list: &Rc<Cons>, env: &Rc<Env>) -> Result<Value, Error> {
    let callee = eval(&list.head, env)?;
    let rest = list.tail.as_ref();
    match callee {
        Value::Builtin(op) => {
            op.arity.validate(op.name, args_len(rest))?;
            (op.func)(rest, env)
        }
        Value::PartiallyAppliedBuiltin { op, pending } => {
            let combined = Cons::concat(pending.as_ref(), rest);
            op.arity.validate(op.name, args_len(combined.as_ref()))?;
            (op.func)(combined.as_ref(), env)
        }
        Value::Function(func) => {
            let args = eval_args(rest, env)?;
            apply_function(&func, args)
        }
        Value::PartiallyApplied { func, pending } => {
            // Stored arguments are already evaluated; only the new
            // ones are evaluated here.
            let mut args = pending;
            args.extend(eval_args(rest, env)?);
            apply_function(&func, args)
        }
        Value::Macro(mac) => {
            let expansion = expand_macro(&mac, rest, env)?;
            eval(&expansion, env)
        }
        other => Err(Error::NotCallable(format!(
            "head of a combination must evaluate to a callable, got {other}"
        ))),
    }
}

/// Evaluate every element of an argument list in order.
pub(crate) fn eval_args(args: Option<&Rc<Cons>>, env: &Rc<Env>) -> Result<Vec<Value>, Error> {
    args_iter(args).map(|arg| eval(arg, env)).collect()
}

/// Evaluate body expressions left to right; the last value wins and an
/// empty body yields `NIL`.
pub(crate) fn eval_body(body: &[Value], env: &Rc<Env>) -> Result<Value, Error> {
    let mut result = Value::Nil;
    for expr in body {
        result = eval(expr, env)?;
    }
    Ok(result)
}

/// Apply a function to fully evaluated arguments.
///
/// Too many arguments fail; too few return a partial application
/// without running the body; an exact match binds the parameters in a
/// fresh child of the captured environment and runs the body there.
pub(crate) fn apply_function(func: &Rc<Lambda>, args: Vec<Value>) -> Result<Value, Error> {
    match args.len().cmp(&func.params.len()) {
        Ordering::Greater => Err(Error::ArityExcess {
            expected: func.params.len(),
            got: args.len(),
        }),
        Ordering::Less => Ok(Value::PartiallyApplied {
            func: func.clone(),
            pending: args,
        }),
        Ordering::Equal => {
            let frame = Rc::new(Env::with_parent(func.env.clone()));
            for (param, arg) in func.params.iter().zip(args) {
                frame.define(param.clone(), arg);
            }
            eval_body(&func.body, &frame)
        }
    }
}

/// Expand a macro one step: bind the unevaluated arguments in a child
/// of the caller's environment and evaluate the body there. The final
/// body value is the expansion; it is not evaluated here.
pub(crate) fn expand_macro(
    mac: &Rc<MacroDef>,
    args: Option<&Rc<Cons>>,
    env: &Rc<Env>,
) -> Result<Value, Error> {
    let args: Vec<Value> = args_iter(args).cloned().collect();
    if args.len() != mac.params.len() {
        return Err(Error::ArityMismatch {
            name: "macro".to_owned(),
            expected: mac.params.len(),
            got: args.len(),
        });
    }
    let frame = Rc::new(Env::with_parent(env.clone()));
    for (param, arg) in mac.params.iter().zip(args) {
        frame.define(param.clone(), arg);
    }
    eval_body(&mac.body, &frame)
}
