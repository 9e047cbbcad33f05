//! Functions callable from dice expressions.

use dice_core::{CheckedInt, Error, Real, Result};
use dice_prob::Decomposition;

use crate::value::{TypeId, Value};

/// Context of a function execution: the (already converted) arguments of
/// the current call.
#[derive(Debug)]
pub struct ExecutionContext {
    args: Vec<Value>,
}

impl ExecutionContext {
    /// Create a context over an argument list.
    pub fn new(args: Vec<Value>) -> Self {
        Self { args }
    }

    /// Number of arguments of this call.
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Type of the `i`-th argument.
    pub fn arg_type(&self, i: usize) -> TypeId {
        self.args[i].type_id()
    }

    /// Move the `i`-th argument out of the context as an integer.
    pub fn take_int(&mut self, i: usize) -> Result<CheckedInt> {
        match self.take(i) {
            Value::Int(value) => Ok(value),
            other => Err(mismatch(TypeId::Int, &other)),
        }
    }

    /// Move the `i`-th argument out of the context as a real.
    pub fn take_real(&mut self, i: usize) -> Result<Real> {
        match self.take(i) {
            Value::Real(value) => Ok(value),
            other => Err(mismatch(TypeId::Real, &other)),
        }
    }

    /// Move the `i`-th argument out of the context as a random variable.
    pub fn take_rand_var(&mut self, i: usize) -> Result<Decomposition> {
        match self.take(i) {
            Value::RandVar(value) => Ok(value),
            other => Err(mismatch(TypeId::RandVar, &other)),
        }
    }

    fn take(&mut self, i: usize) -> Value {
        std::mem::replace(&mut self.args[i], Value::Int(CheckedInt::new(0)))
    }
}

fn mismatch(expected: TypeId, found: &Value) -> Error {
    Error::ArgumentTypeMismatch {
        expected: expected.to_string(),
        found: found.type_id().to_string(),
    }
}

/// Implementation of a function callable from a dice expression.
pub type Callable = Box<dyn Fn(&mut ExecutionContext) -> Result<Value>>;

/// A function callable from a dice expression: an implementation plus the
/// argument types used for overload resolution.
pub struct FunctionDefinition {
    callable: Callable,
    args: Vec<TypeId>,
}

impl FunctionDefinition {
    /// Define a function with the given argument types.
    pub fn new(callable: Callable, args: Vec<TypeId>) -> Self {
        Self { callable, args }
    }

    /// Define a function that takes no arguments.
    pub fn nullary(callable: Callable) -> Self {
        Self::new(callable, Vec::new())
    }

    /// Argument types for type checking.
    pub fn args(&self) -> &[TypeId] {
        &self.args
    }

    /// Number of arguments this function expects.
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Call this function with a prepared context.
    pub fn call(&self, context: &mut ExecutionContext) -> Result<Value> {
        (self.callable)(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_takes_typed_arguments() {
        let mut context = ExecutionContext::new(vec![
            Value::Int(CheckedInt::new(1)),
            Value::Real(2.5),
        ]);
        assert_eq!(context.argc(), 2);
        assert_eq!(context.arg_type(0), TypeId::Int);
        assert_eq!(context.take_int(0).unwrap(), CheckedInt::new(1));
        assert_eq!(context.take_real(1).unwrap(), 2.5);
    }

    #[test]
    fn wrong_kind_is_a_type_mismatch() {
        let mut context = ExecutionContext::new(vec![Value::Real(2.5)]);
        assert!(matches!(
            context.take_int(0),
            Err(Error::ArgumentTypeMismatch { .. })
        ));
    }

    #[test]
    fn nullary_functions_expect_no_arguments() {
        let function =
            FunctionDefinition::nullary(Box::new(|_| Ok(Value::Int(CheckedInt::new(42)))));
        assert_eq!(function.argc(), 0);
        let mut context = ExecutionContext::new(Vec::new());
        assert_eq!(
            function.call(&mut context).unwrap(),
            Value::Int(CheckedInt::new(42))
        );
    }
}
