//! Type conversions between value kinds.
//!
//! Conversions carry a cost so that overload resolution can pick the
//! cheapest viable candidate. Converting a value to its own kind is free;
//! an integer widens to a real or to a constant random variable at cost 1;
//! everything else is unsupported.

use dice_core::{Error, Real, Result};
use dice_prob::Decomposition;

use crate::value::{TypeId, Value};

/// Cost of a conversion in the dispatch cost model.
pub type Cost = usize;

/// The conversion table.
#[derive(Debug, Default, Clone, Copy)]
pub struct Conversions;

impl Conversions {
    /// Cost of an impossible conversion.
    pub const MAX_COST: Cost = Cost::MAX;

    /// Cost of converting `from` to `to`: 0 for the identity, 1 for a
    /// supported widening, [`Self::MAX_COST`] otherwise.
    pub fn cost(&self, from: TypeId, to: TypeId) -> Cost {
        if from == to {
            return 0;
        }
        match (from, to) {
            (TypeId::Int, TypeId::Real) | (TypeId::Int, TypeId::RandVar) => 1,
            _ => Self::MAX_COST,
        }
    }

    /// Convert `value` to the kind `to`, consuming it.
    pub fn convert(&self, to: TypeId, value: Value) -> Result<Value> {
        if value.type_id() == to {
            return Ok(value);
        }
        match (value, to) {
            (Value::Int(value), TypeId::Real) => Ok(Value::Real(Real::from(value.get()))),
            (Value::Int(value), TypeId::RandVar) => {
                Ok(Value::RandVar(Decomposition::constant(value)))
            }
            (value, to) => Err(Error::ImpossibleConversion {
                from: value.type_id().to_string(),
                to: to.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_core::CheckedInt;

    #[test]
    fn identity_is_free() {
        let conversions = Conversions;
        assert_eq!(conversions.cost(TypeId::Int, TypeId::Int), 0);
        assert_eq!(conversions.cost(TypeId::Real, TypeId::Real), 0);
        assert_eq!(conversions.cost(TypeId::RandVar, TypeId::RandVar), 0);
    }

    #[test]
    fn int_widens_at_cost_one() {
        let conversions = Conversions;
        assert_eq!(conversions.cost(TypeId::Int, TypeId::Real), 1);
        assert_eq!(conversions.cost(TypeId::Int, TypeId::RandVar), 1);
    }

    #[test]
    fn other_edges_are_impossible() {
        let conversions = Conversions;
        assert_eq!(
            conversions.cost(TypeId::Real, TypeId::Int),
            Conversions::MAX_COST
        );
        assert_eq!(
            conversions.cost(TypeId::Real, TypeId::RandVar),
            Conversions::MAX_COST
        );
        assert_eq!(
            conversions.cost(TypeId::RandVar, TypeId::Int),
            Conversions::MAX_COST
        );
    }

    #[test]
    fn convert_int_to_real() {
        let conversions = Conversions;
        let value = conversions
            .convert(TypeId::Real, Value::Int(CheckedInt::new(3)))
            .unwrap();
        assert_eq!(value, Value::Real(3.0));
    }

    #[test]
    fn convert_int_to_random_variable() {
        let conversions = Conversions;
        let value = conversions
            .convert(TypeId::RandVar, Value::Int(CheckedInt::new(3)))
            .unwrap();
        assert_eq!(value, Value::RandVar(Decomposition::constant(3)));
    }

    #[test]
    fn impossible_conversion_is_an_error() {
        let conversions = Conversions;
        assert!(matches!(
            conversions.convert(TypeId::Int, Value::Real(3.0)),
            Err(Error::ImpossibleConversion { .. })
        ));
    }
}
