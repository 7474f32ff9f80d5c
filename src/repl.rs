//! Interactive Read-Eval-Print Loop built on rustyline.

use std::rc::Rc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ast::Value;
use crate::evaluator::{self, Env};
use crate::{lexer, parser};

/// Run the interactive prompt until EOF.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("CurryLisp interpreter");
    println!("Enter s-expressions like: (+ 1 2)");
    println!("Type :help for commands; press Ctrl+D to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;
    let env = evaluator::create_global_env();

    loop {
        match rl.readline("currylisp> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":env" => {
                        print_environment(&env);
                        continue;
                    }
                    ":quit" | ":exit" => break,
                    _ => {}
                }

                eval_line(line, &env);
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }
    Ok(())
}

/// Evaluate every top-level form of one input line, printing each
/// result on its own line. The first error stops the line and is
/// reported on stderr; the surrounding loop keeps running.
fn eval_line(line: &str, env: &Rc<Env>) {
    let exprs = match lexer::lex(line).and_then(|tokens| parser::parse(&tokens)) {
        Ok(exprs) => exprs,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    for expr in &exprs {
        match evaluator::eval(expr, env) {
            Ok(value) => println!("{value}"),
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :help  - show this message");
    println!("  :env   - list the current environment bindings");
    println!("  :quit  - exit the interpreter (also :exit or Ctrl+D)");
    println!();
    println!("Examples:");
    println!("  (+ 1 2 3)");
    println!("  (defun sq (x) (* x x)) (sq 5)");
    println!("  ((lambda (x y) (+ x y)) 1)   ; partial application");
    println!();
}

fn print_environment(env: &Rc<Env>) {
    let bindings = env.all_bindings();

    let mut builtins = Vec::new();
    let mut user_defined = Vec::new();
    for (name, value) in bindings {
        match value {
            Value::Builtin(_) => builtins.push(name),
            _ => user_defined.push((name, value)),
        }
    }

    if !builtins.is_empty() {
        println!("Built-in operations ({}):", builtins.len());
        let mut col = 0;
        for name in builtins {
            print!("  {name:<14}");
            col += 1;
            if col % 4 == 0 {
                println!();
            }
        }
        if col % 4 != 0 {
            println!();
        }
        println!();
    }

    if !user_defined.is_empty() {
        println!("Other bindings ({}):", user_defined.len());
        for (name, value) in user_defined {
            println!("  {name} = {value}");
        }
    }
}
