//! Values in a dice expression.
//!
//! A [`Value`] is a tagged sum of the three kinds the language computes
//! with: bounded integers, reals, and random variables (represented by
//! their decomposition). Cloning is deep except for dependency handles,
//! which stay shared; equality is structural within a kind and always
//! false across kinds — semantic equality between kinds is expressed by
//! operators after conversion.

use std::fmt;

use dice_core::{CheckedInt, Real};
use dice_prob::Decomposition;

/// Type identifier of a value in a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    /// A bounded integer.
    Int,
    /// A real number.
    Real,
    /// A discrete random variable.
    RandVar,
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeId::Int => "int",
            TypeId::Real => "real",
            TypeId::RandVar => "random_variable",
        })
    }
}

/// A value computed by a dice expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A bounded integer.
    Int(CheckedInt),
    /// A real number.
    Real(Real),
    /// A random variable.
    RandVar(Decomposition),
}

impl Value {
    /// Type identifier of this value, used for dispatch.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Int(_) => TypeId::Int,
            Value::Real(_) => TypeId::Real,
            Value::RandVar(_) => TypeId::RandVar,
        }
    }

    /// Dispatch on the kind of this value.
    pub fn accept<V: ValueVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Value::Int(value) => visitor.visit_int(value),
            Value::Real(value) => visitor.visit_real(value),
            Value::RandVar(value) => visitor.visit_rand_var(value),
        }
    }
}

/// Visitor over the kinds of [`Value`].
pub trait ValueVisitor {
    /// Visit an integer value.
    fn visit_int(&mut self, value: &CheckedInt);
    /// Visit a real value.
    fn visit_real(&mut self, value: &Real);
    /// Visit a random-variable value.
    fn visit_rand_var(&mut self, value: &Decomposition);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural_within_a_kind() {
        assert_eq!(Value::Int(CheckedInt::new(5)), Value::Int(CheckedInt::new(5)));
        assert_ne!(Value::Int(CheckedInt::new(5)), Value::Int(CheckedInt::new(6)));
        assert_eq!(Value::Real(0.5), Value::Real(0.5));
    }

    #[test]
    fn equality_across_kinds_is_false() {
        assert_ne!(Value::Int(CheckedInt::new(5)), Value::Real(5.0));
        assert_ne!(
            Value::Int(CheckedInt::new(5)),
            Value::RandVar(Decomposition::constant(5))
        );
    }

    #[test]
    fn visitor_dispatches_on_the_tag() {
        struct Tags(Vec<TypeId>);
        impl ValueVisitor for Tags {
            fn visit_int(&mut self, _: &CheckedInt) {
                self.0.push(TypeId::Int);
            }
            fn visit_real(&mut self, _: &Real) {
                self.0.push(TypeId::Real);
            }
            fn visit_rand_var(&mut self, _: &Decomposition) {
                self.0.push(TypeId::RandVar);
            }
        }

        let mut tags = Tags(Vec::new());
        Value::Int(CheckedInt::new(1)).accept(&mut tags);
        Value::Real(1.0).accept(&mut tags);
        Value::RandVar(Decomposition::constant(1)).accept(&mut tags);
        assert_eq!(tags.0, vec![TypeId::Int, TypeId::Real, TypeId::RandVar]);
    }
}
