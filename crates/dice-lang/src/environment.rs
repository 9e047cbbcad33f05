//! The built-in environment: variables, functions, and overload dispatch.
//!
//! A function name maps to a list of [`FunctionDefinition`]s. A call picks
//! the candidate with the lowest summed conversion cost over its arguments;
//! ties go to the first registered candidate. The operator registrations
//! below list the integer overload first, then real, then random variable,
//! so an exact match always beats a widening one.

use std::collections::HashMap;

use dice_core::{CheckedInt, Error, Real, Result};
use dice_prob::Decomposition;

use crate::conversions::{Conversions, Cost};
use crate::functions::{ExecutionContext, FunctionDefinition};
use crate::value::{TypeId, Value};

/// Symbol table of a calculator session: named values and overloaded
/// functions.
pub struct Environment {
    conversions: Conversions,
    functions: HashMap<String, Vec<FunctionDefinition>>,
    variables: HashMap<String, Value>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment with all built-in operators and functions
    /// registered.
    pub fn new() -> Self {
        let mut env = Self {
            conversions: Conversions,
            functions: HashMap::new(),
            variables: HashMap::new(),
        };
        env.register_builtins();
        env
    }

    /// Add an overload for `name`. The function becomes available in dice
    /// expressions.
    pub fn add_function(&mut self, name: &str, function: FunctionDefinition) {
        self.functions
            .entry(name.to_owned())
            .or_default()
            .push(function);
    }

    /// Set the value of a variable, inserting or overwriting.
    pub fn set_var(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_owned(), value);
    }

    /// Value of a variable, or `None` if it does not exist.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Call the function `name` with `args`.
    ///
    /// Resolution keeps the overloads with matching arity, sums the
    /// per-argument conversion costs, and picks the cheapest viable
    /// candidate; arguments are then converted in place and the
    /// implementation is invoked.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))?;

        let mut best: Option<&FunctionDefinition> = None;
        let mut best_cost = Conversions::MAX_COST;
        for function in overloads {
            if function.argc() != args.len() {
                continue;
            }

            let mut cost: Cost = 0;
            let mut viable = true;
            for (arg, &to) in args.iter().zip(function.args()) {
                let conversion = self.conversions.cost(arg.type_id(), to);
                if conversion == Conversions::MAX_COST {
                    viable = false;
                    break;
                }
                cost += conversion;
            }

            // strict comparison keeps the first registered candidate on ties
            if viable && cost < best_cost {
                best_cost = cost;
                best = Some(function);
            }
        }

        let function = best.ok_or_else(|| Error::NoMatchingOverload(name.to_owned()))?;
        log::trace!("dispatching {name}() at conversion cost {best_cost}");

        let mut converted = Vec::with_capacity(args.len());
        for (arg, &to) in args.into_iter().zip(function.args()) {
            converted.push(self.conversions.convert(to, arg)?);
        }
        let mut context = ExecutionContext::new(converted);
        function.call(&mut context)
    }

    fn register_builtins(&mut self) {
        // binary arithmetic operators over all three kinds
        self.add_function("+", int_binary(CheckedInt::add));
        self.add_function("+", real_binary(|a, b| a + b));
        self.add_function("+", rand_var_binary(Decomposition::add));
        self.add_function("-", int_binary(CheckedInt::sub));
        self.add_function("-", real_binary(|a, b| a - b));
        self.add_function("-", rand_var_binary(Decomposition::sub));
        self.add_function("*", int_binary(CheckedInt::mul));
        self.add_function("*", real_binary(|a, b| a * b));
        self.add_function("*", rand_var_binary(Decomposition::mul));
        self.add_function("/", int_binary(CheckedInt::div));
        self.add_function("/", real_binary(|a, b| a / b));
        self.add_function("/", rand_var_binary(Decomposition::div));

        self.add_function("unary-", int_unary(CheckedInt::neg));
        self.add_function("unary-", real_unary(|a| -a));
        self.add_function("unary-", rand_var_unary(Decomposition::neg));

        // dice roll: XdY over independent random variables
        self.add_function("roll_op", rand_var_binary(Decomposition::roll));

        // relational operators produce indicator variables
        self.add_function("<", rand_var_binary(Decomposition::less_than));
        self.add_function("<=", rand_var_binary(Decomposition::less_than_or_equal));
        self.add_function("==", rand_var_binary(Decomposition::equal));
        self.add_function("!=", rand_var_binary(Decomposition::not_equal));
        self.add_function(">=", rand_var_binary(Decomposition::greater_than_or_equal));
        self.add_function(">", rand_var_binary(Decomposition::greater_than));

        self.add_function(
            "in",
            FunctionDefinition::new(
                Box::new(|context| {
                    let upper_bound = context.take_real(2)?;
                    let lower_bound = context.take_real(1)?;
                    let var = context.take_rand_var(0)?;
                    Ok(Value::RandVar(var.in_interval(lower_bound, upper_bound)))
                }),
                vec![TypeId::RandVar, TypeId::Real, TypeId::Real],
            ),
        );

        self.add_function(
            "expectation",
            FunctionDefinition::new(
                Box::new(|context| {
                    let var = context.take_rand_var(0)?;
                    Ok(Value::Real(var.expected_value()))
                }),
                vec![TypeId::RandVar],
            ),
        );
        self.add_function(
            "variance",
            FunctionDefinition::new(
                Box::new(|context| {
                    let var = context.take_rand_var(0)?;
                    Ok(Value::Real(var.variance()))
                }),
                vec![TypeId::RandVar],
            ),
        );

        // single-shot sampling
        self.add_function(
            "roll",
            FunctionDefinition::new(
                Box::new(|context| {
                    let var = context.take_rand_var(0)?;
                    let value = var
                        .to_random_variable()
                        .sample(&mut rand::rng())
                        .ok_or(Error::UndefinedQuantile)?;
                    Ok(Value::Int(value))
                }),
                vec![TypeId::RandVar],
            ),
        );

        self.add_function("min", int_binary(|a, b| Ok(a.min(b))));
        self.add_function("min", real_binary(Real::min));
        self.add_function("min", rand_var_binary(Decomposition::min_of));
        self.add_function("max", int_binary(|a, b| Ok(a.max(b))));
        self.add_function("max", real_binary(Real::max));
        self.add_function("max", rand_var_binary(Decomposition::max_of));
    }
}

fn int_binary(f: fn(CheckedInt, CheckedInt) -> Result<CheckedInt>) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let a = context.take_int(0)?;
            let b = context.take_int(1)?;
            Ok(Value::Int(f(a, b)?))
        }),
        vec![TypeId::Int, TypeId::Int],
    )
}

fn int_unary(f: fn(CheckedInt) -> Result<CheckedInt>) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let a = context.take_int(0)?;
            Ok(Value::Int(f(a)?))
        }),
        vec![TypeId::Int],
    )
}

fn real_binary(f: fn(Real, Real) -> Real) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let a = context.take_real(0)?;
            let b = context.take_real(1)?;
            Ok(Value::Real(f(a, b)))
        }),
        vec![TypeId::Real, TypeId::Real],
    )
}

fn real_unary(f: fn(Real) -> Real) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let a = context.take_real(0)?;
            Ok(Value::Real(f(a)))
        }),
        vec![TypeId::Real],
    )
}

fn rand_var_binary(
    f: fn(&Decomposition, &Decomposition) -> Result<Decomposition>,
) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let b = context.take_rand_var(1)?;
            let a = context.take_rand_var(0)?;
            Ok(Value::RandVar(f(&a, &b)?))
        }),
        vec![TypeId::RandVar, TypeId::RandVar],
    )
}

fn rand_var_unary(f: fn(&Decomposition) -> Result<Decomposition>) -> FunctionDefinition {
    FunctionDefinition::new(
        Box::new(move |context| {
            let a = context.take_rand_var(0)?;
            Ok(Value::RandVar(f(&a)?))
        }),
        vec![TypeId::RandVar],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i32) -> Value {
        Value::Int(CheckedInt::new(value))
    }

    #[test]
    fn exact_match_wins_over_widening() {
        let env = Environment::new();
        assert_eq!(env.call("+", vec![int(2), int(3)]).unwrap(), int(5));
        assert_eq!(
            env.call("min", vec![int(2), int(3)]).unwrap(),
            int(2)
        );
    }

    #[test]
    fn mixed_arguments_widen_to_real() {
        let env = Environment::new();
        assert_eq!(
            env.call("+", vec![int(2), Value::Real(0.5)]).unwrap(),
            Value::Real(2.5)
        );
    }

    #[test]
    fn unknown_function_fails() {
        let env = Environment::new();
        assert_eq!(
            env.call("nope", vec![]),
            Err(Error::UnknownFunction("nope".to_owned()))
        );
    }

    #[test]
    fn arity_mismatch_has_no_overload() {
        let env = Environment::new();
        assert_eq!(
            env.call("+", vec![int(1)]),
            Err(Error::NoMatchingOverload("+".to_owned()))
        );
    }

    #[test]
    fn variables_upsert() {
        let mut env = Environment::new();
        assert!(env.get_var("x").is_none());
        env.set_var("x", int(1));
        env.set_var("x", int(2));
        assert_eq!(env.get_var("x"), Some(&int(2)));
    }
}
