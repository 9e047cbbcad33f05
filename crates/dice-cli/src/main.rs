//! Dice expression probability calculator.
//!
//! Evaluates its arguments as a script, a file with `-f`, or runs an
//! interactive loop when no input is given. Evaluation errors are reported
//! on stderr and do not affect the exit code; only command-line problems
//! (an unreadable file, bad usage) exit non-zero.

mod format;

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dicelab::lang::Calculator;

use crate::format::print_values;

#[derive(Parser)]
#[command(
    name = "dicelab",
    version,
    about = "Dice expression probability calculator",
    long_about = None
)]
struct Options {
    /// Evaluate the script in this file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Expression to evaluate (all arguments are joined by spaces)
    #[arg(value_name = "EXPR")]
    expr: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match Options::try_parse() {
        Ok(options) => options,
        Err(error) => {
            eprint!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let mut calc = Calculator::new();

    if let Some(path) = options.file {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("File not found: {} ({error})", path.display());
                return ExitCode::FAILURE;
            }
        };
        print_values(&calc.evaluate(&source));
    } else if !options.expr.is_empty() {
        let source = options.expr.join(" ");
        print_values(&calc.evaluate(&source));
    } else {
        interactive(&mut calc);
    }
    ExitCode::SUCCESS
}

fn interactive(calc: &mut Calculator) {
    calc.enable_interactive_mode();

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        println!("Dice expression probability calculator (interactive mode)");
        println!();
        println!("Type 'exit' to exit the application.");
        println!("Type an expression to evaluate it.");
        println!();

        loop {
            let line: String = match dialoguer::Input::new().with_prompt(">").interact_text() {
                Ok(line) => line,
                Err(_) => break, // end of input
            };
            if !evaluate_line(calc, &line) {
                break;
            }
        }
    } else {
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if !evaluate_line(calc, &line) {
                break;
            }
        }
    }
}

/// Evaluate one interactive line. Returns `false` when the loop should end.
fn evaluate_line(calc: &mut Calculator, line: &str) -> bool {
    let line = line.trim();
    if line == "exit" || line == "end" {
        return false;
    }
    print_values(&calc.evaluate(line));
    calc.clear_log();
    true
}
