//! End-to-end tests driving the full lex -> parse -> eval pipeline
//! through the public crate API.

use std::rc::Rc;

use currylisp::ast::Value;
use currylisp::evaluator::{Env, create_global_env};
use currylisp::{Error, run};

/// Expected outcome of running a program from scratch.
enum TestResult {
    /// Program succeeds; the last value prints as this
    Printed(&'static str),
    /// Program fails with an error whose display contains this
    SpecificError(&'static str),
}
use TestResult::*;

fn run_fresh(source: &str) -> Result<Value, Error> {
    run(source, &create_global_env())
}

fn run_program_tests(cases: Vec<(&str, TestResult)>) {
    for (i, (source, expected)) in cases.iter().enumerate() {
        let test_id = format!("Program test #{}", i + 1);
        match (run_fresh(source), expected) {
            (Ok(value), Printed(display)) => {
                assert_eq!(
                    &format!("{value}"),
                    display,
                    "{test_id}: value mismatch for program:\n{source}"
                );
            }
            (Err(err), SpecificError(text)) => {
                let msg = format!("{err}");
                assert!(
                    msg.contains(text),
                    "{test_id}: error '{msg}' should contain '{text}' for program:\n{source}"
                );
            }
            (Ok(value), SpecificError(text)) => {
                panic!("{test_id}: expected error containing '{text}', got {value}")
            }
            (Err(err), Printed(_)) => {
                panic!("{test_id}: expected success, got {err} for program:\n{source}")
            }
        }
    }
}

#[test]
fn test_arithmetic_programs() {
    run_program_tests(vec![
        ("(+ 1 2 3)", Printed("6")),
        ("(+ 1 2.0)", Printed("3.0")),
        ("(* (+ 1 2) (- 10 6))", Printed("12")),
        ("(/ 7 2)", Printed("3")),
        ("(/ 9.0 2)", Printed("4.5")),
        ("(/ 1 0)", SpecificError("ArithError")),
    ]);
}

#[test]
fn test_definition_programs() {
    run_program_tests(vec![
        ("(defun sq (x) (* x x)) (sq 5)", Printed("25")),
        ("(setq x 3) (setq y 4) (+ (* x x) (* y y))", Printed("25")),
        ("(set 'greeting \"hi\") greeting", Printed("\"hi\"")),
        (
            "(defun compose2 (f g x) (f (g x)))
             (defun inc (n) (+ n 1))
             (defun double (n) (* n 2))
             (compose2 inc double 10)",
            Printed("21"),
        ),
        (
            "(defun fib (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2)))))
             (fib 15)",
            Printed("610"),
        ),
    ]);
}

#[test]
fn test_partial_application_programs() {
    run_program_tests(vec![
        // Applying too few arguments produces a callable...
        (
            "(defun add3 (a b c) (+ a (+ b c)))
             (type-of (add3 1))",
            Printed("\"PartiallyAppliedFunction\""),
        ),
        // ...that can be resumed in one or several steps
        (
            "(defun add3 (a b c) (+ a (+ b c)))
             ((add3 1) 2 3)",
            Printed("6"),
        ),
        (
            "(defun add3 (a b c) (+ a (+ b c)))
             (((add3 1) 2) 3)",
            Printed("6"),
        ),
        (
            "(defun add3 (a b c) (+ a (+ b c)))
             (setq add1-2 ((add3 1) 2))
             (add1-2 40)",
            Printed("43"),
        ),
        // Partial applications are values with the documented repr
        (
            "((lambda (x y) (+ x y)) 3)",
            Printed("FUNCTION (x y) (+ x y) 3"),
        ),
        // Exceeding the parameter count is an error at any stage
        (
            "(defun add2 (a b) (+ a b)) ((add2 1) 2 3)",
            SpecificError("ArityError"),
        ),
    ]);
}

#[test]
fn test_macro_programs() {
    run_program_tests(vec![
        (
            "(defmacro when1 (c b) (list 'if c b 'NIL)) (when1 T 42)",
            Printed("42"),
        ),
        (
            "(defmacro when1 (c b) (list 'if c b 'NIL)) (when1 NIL 42)",
            Printed("NIL"),
        ),
        (
            "(defmacro swap-args (f a b) (list f b a))
             (swap-args - 1 10)",
            Printed("9"),
        ),
        (
            "(defmacro when1 (c b) (list 'if c b 'NIL))
             (macroexpand '(when1 (= 1 1) 99))",
            Printed("(if (= 1 1) 99 NIL)"),
        ),
        (
            "((macro (x) (list 'quote x)) (a b))",
            Printed("(a b)"),
        ),
    ]);
}

#[test]
fn test_quote_programs() {
    run_program_tests(vec![
        ("'(1 2 3)", Printed("(1 2 3)")),
        ("(car '(a b c))", Printed("a")),
        ("'()", Printed("NIL")),
        // Backquote without commas behaves like quote
        ("`(1 2)", Printed("(1 2)")),
        // A comma form evaluated on its own is illegal
        (",x", SpecificError("IllegalComma")),
        // Inside backquoted data it survives as data
        ("(car (cdr `(a ,b)))", Printed(",b")),
    ]);
}

#[test]
fn test_error_programs() {
    run_program_tests(vec![
        ("(", SpecificError("ParseError")),
        ("\"open", SpecificError("LexError")),
        ("#t", SpecificError("LexError")),
        ("undefined-symbol", SpecificError("UnboundSymbol")),
        ("(1 2)", SpecificError("NotCallable")),
        ("(car \"not-a-list\")", SpecificError("TypeError")),
        ("(+ 1 'x)", SpecificError("TypeError")),
        // The first failing form aborts the rest of the program
        ("(car 1) (setq x 5)", SpecificError("TypeError")),
    ]);
}

#[test]
fn test_repl_style_round_trip() {
    // Printed data re-parses to a structurally equal value.
    let sources = [
        "'(1 (2 3) \"s\" sym 2.5)",
        "'(a (b (c (d))))",
        "''double",
        "'NIL",
        "'(-5 -5x)",
    ];
    for source in sources {
        let first = run_fresh(source).expect("first evaluation");
        let reread = run_fresh(&format!("'{first}")).expect("second evaluation");
        assert_eq!(first, reread, "round-trip failed for {source}");
    }
}

#[test]
fn test_environment_is_preserved_across_runs() {
    let env: Rc<Env> = create_global_env();
    run("(defun inc (n) (+ n 1))", &env).expect("define");
    run("(setq total 0)", &env).expect("init");
    run("(setq total (inc total))", &env).expect("step");
    run("(setq total (inc total))", &env).expect("step");
    let total = run("total", &env).expect("read");
    assert_eq!(format!("{total}"), "2");
}

#[test]
fn test_partial_equals_full_application() {
    // Applying n arguments one at a time gives the same result as
    // applying them all at once.
    let full = run_fresh("((lambda (a b c) (* a (+ b c))) 2 3 4)").expect("full");
    let curried = run_fresh("(((((lambda (a b c) (* a (+ b c))) 2) 3)) 4)").expect("curried");
    assert_eq!(full, curried);
    assert_eq!(format!("{full}"), "14");
}
