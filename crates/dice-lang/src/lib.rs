//! # dice-lang
//!
//! The dice expression language: values and their visitor, the conversion
//! table and overloaded dispatch, the built-in environment, lexer, parser,
//! the direct interpreter, and the [`Calculator`] facade tying them
//! together.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calculator;
pub mod conversions;
pub mod diagnostics;
pub mod environment;
pub mod functions;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

pub use calculator::Calculator;
pub use conversions::Conversions;
pub use diagnostics::{Diagnostic, DiagnosticLog};
pub use environment::Environment;
pub use functions::{ExecutionContext, FunctionDefinition};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Location, Token, TokenKind};
pub use value::{TypeId, Value, ValueVisitor};
