//! Facade for script evaluation.

use crate::diagnostics::DiagnosticLog;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::value::Value;

/// A calculator session: environment, interpreter state, and diagnostic
/// log. Statements evaluate left to right; a failing statement yields
/// `None` without discarding earlier results or stopping later statements.
#[derive(Default)]
pub struct Calculator {
    interpreter: Interpreter,
    log: DiagnosticLog,
}

impl Calculator {
    /// A calculator with the built-in environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a script.
    ///
    /// Returns one entry per statement: the computed value, or `None` for
    /// assignments and failed statements. Errors are recorded in
    /// [`log`](Self::log).
    pub fn evaluate(&mut self, input: &str) -> Vec<Option<Value>> {
        Parser::new(input, &mut self.log, &mut self.interpreter).parse()
    }

    /// Enable interactive mode: variables may be redefined.
    pub fn enable_interactive_mode(&mut self) {
        self.interpreter.set_variable_redefinition(true);
    }

    /// Bind a variable programmatically.
    pub fn set_var(&mut self, name: &str, value: Value) {
        self.interpreter.environment_mut().set_var(name, value);
    }

    /// Read a variable programmatically.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.interpreter.environment().get_var(name)
    }

    /// The diagnostic log of this session.
    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Drop all recorded diagnostics.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}
