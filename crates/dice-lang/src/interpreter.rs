//! The direct interpreter.
//!
//! Evaluation happens as soon as the parser reduces a production; there is
//! no intermediate representation. The interpreter's main responsibility
//! beyond delegating to the environment is the *promotion rule*: while a
//! `var X = ...` definition is being evaluated, any random-variable operand
//! that meets a dependent operand is promoted (decomposed) first, so that
//! later uses of `X` stay dependent on the same promoted variables.

use dice_core::{CheckedInt, Error, Integer, Real, Result};

use crate::environment::Environment;
use crate::value::Value;

/// Evaluates parser callbacks against an [`Environment`].
pub struct Interpreter {
    env: Environment,
    is_definition: bool,
    variable_redefinition: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Environment::new())
    }
}

impl Interpreter {
    /// Create an interpreter over `env`. Variable redefinition starts
    /// disabled (script mode).
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            is_definition: false,
            variable_redefinition: false,
        }
    }

    /// The underlying environment.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Mutable access to the underlying environment.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Enter a `var X = ...` definition.
    pub fn enter_assign(&mut self) {
        self.is_definition = true;
    }

    /// Leave a definition without completing it (used on errors).
    pub fn leave_assign(&mut self) {
        self.is_definition = false;
    }

    /// Enable/disable variable redefinition.
    pub fn set_variable_redefinition(&mut self, value: bool) {
        self.variable_redefinition = value;
    }

    /// `true` iff redefinition is allowed.
    pub fn variable_redefinition(&self) -> bool {
        self.variable_redefinition
    }

    /// Default value used by the parser to recover from a syntax error.
    pub fn make_default(&self) -> Value {
        Value::Int(CheckedInt::new(0))
    }

    /// Interpret a number literal as an integer or a real.
    pub fn number(&self, lexeme: &str) -> Result<Value> {
        if lexeme.contains('.') {
            lexeme
                .parse::<Real>()
                .map(Value::Real)
                .map_err(|_| Error::Overflow(lexeme.to_owned()))
        } else {
            lexeme
                .parse::<Integer>()
                .map(|value| Value::Int(CheckedInt::new(value)))
                .map_err(|_| Error::Overflow(lexeme.to_owned()))
        }
    }

    /// Read a variable; returns a clone of its value.
    pub fn variable(&self, name: &str) -> Result<Value> {
        self.env
            .get_var(name)
            .cloned()
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))
    }

    /// Add left hand side to the right hand side.
    pub fn add(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary("+", left, right)
    }

    /// Subtract right hand side from the left hand side.
    pub fn sub(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary("-", left, right)
    }

    /// Multiply left hand side with the right hand side.
    pub fn mult(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary("*", left, right)
    }

    /// Divide left hand side by the right hand side.
    pub fn div(&mut self, left: Value, right: Value) -> Result<Value> {
        self.binary("/", left, right)
    }

    /// Negate a value.
    pub fn unary_minus(&mut self, value: Value) -> Result<Value> {
        self.env.call("unary-", vec![value])
    }

    /// Compute a binary relational operator (`<`, `<=`, `==`, `!=`, `>=`,
    /// `>`).
    pub fn rel_op(&mut self, op: &str, left: Value, right: Value) -> Result<Value> {
        self.binary(op, left, right)
    }

    /// Compute the `in [lower, upper]` operator.
    pub fn rel_in(&mut self, value: Value, lower: Value, upper: Value) -> Result<Value> {
        self.env.call("in", vec![value, lower, upper])
    }

    /// Compute the dice roll operator.
    ///
    /// `XdY` assumes its operands are independent, so operands that carry
    /// dependencies are rejected.
    pub fn roll(&mut self, left: Value, right: Value) -> Result<Value> {
        if has_dependencies(&left) || has_dependencies(&right) {
            return Err(Error::DependentRollOperand);
        }
        self.env.call("roll_op", vec![left, right])
    }

    /// Assign `value` to the variable `name` and leave definition mode.
    ///
    /// The value is promoted before it is stored so that every later read
    /// shares the same dependency handles.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        self.is_definition = false;
        if !self.variable_redefinition && self.env.get_var(name).is_some() {
            return Err(Error::Redefinition(name.to_owned()));
        }
        let value = match value {
            Value::RandVar(var) => Value::RandVar(var.decompose()),
            other => other,
        };
        self.env.set_var(name, value);
        Ok(())
    }

    /// Call the function `name` with `args`.
    pub fn call(&mut self, name: &str, mut args: Vec<Value>) -> Result<Value> {
        if self.is_definition && args.iter().any(has_dependencies) {
            for arg in &mut args {
                promote(arg);
            }
        }
        self.env.call(name, args)
    }

    fn binary(&mut self, op: &str, mut left: Value, mut right: Value) -> Result<Value> {
        self.prepare_operands(&mut left, &mut right);
        self.env.call(op, vec![left, right])
    }

    /// Promotion rule: inside a definition, once any operand depends on a
    /// promoted variable, promote every dependency-free random-variable
    /// operand as well.
    fn prepare_operands(&mut self, left: &mut Value, right: &mut Value) {
        if !self.is_definition {
            return;
        }
        if has_dependencies(left) || has_dependencies(right) {
            log::debug!("promoting operands of a binary operator in a definition");
            promote(left);
            promote(right);
        }
    }
}

fn has_dependencies(value: &Value) -> bool {
    matches!(value, Value::RandVar(var) if var.has_dependencies())
}

fn promote(value: &mut Value) {
    if let Value::RandVar(var) = value {
        if !var.has_dependencies() {
            *var = var.decompose();
        }
    }
}
