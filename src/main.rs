use std::env;
use std::fs;
use std::process;

use currylisp::{evaluator, repl};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{HELP_MSG}");
        return;
    }

    match args.as_slice() {
        [] => {
            if let Err(err) = repl::run() {
                eprintln!("{err}");
                process::exit(1);
            }
        }
        [path] => {
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    eprintln!("failed to open file {path}: {err}");
                    process::exit(1);
                }
            };
            run_script(&source);
        }
        _ => {
            eprintln!("{HELP_MSG}");
            process::exit(1);
        }
    }
}

/// Run a whole source file. The first error aborts the remaining
/// forms; the error itself is reported, not a failure exit code.
fn run_script(source: &str) {
    let env = evaluator::create_global_env();
    if let Err(err) = currylisp::run(source, &env) {
        eprintln!("{err}");
    }
}

const HELP_MSG: &str = "Usage: currylisp [FILE]

  FILE  CurryLisp source file to run; without it an interactive
        prompt is started

Options:
  -h, --help  Print this message";
