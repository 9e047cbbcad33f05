//! Error types for dicelab.
//!
//! Every failure the evaluator can produce — arithmetic, dispatch, naming,
//! and domain errors — is a variant of the single `thiserror`-derived
//! [`Error`] enum so that it can cross crate boundaries without wrapping.

use thiserror::Error;

/// The top-level error type used throughout dicelab.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Integer arithmetic exceeded the upper bound of the value type.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// Integer arithmetic exceeded the lower bound of the value type.
    #[error("arithmetic underflow: {0}")]
    Underflow(String),

    /// Integer division by zero.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// A dice-roll operand contained a non-positive value.
    #[error("invalid dice parameters: {0}")]
    InvalidDiceParameters(String),

    /// A dice-roll operand depends on a named random variable.
    #[error("it is invalid to use names in the dice roll operator")]
    DependentRollOperand,

    /// A variable name was referenced before being defined.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A function name has no registered overloads.
    #[error("unknown function {0}()")]
    UnknownFunction(String),

    /// A variable was redefined while redefinition is disabled.
    #[error("variable '{0}' redefinition")]
    Redefinition(String),

    /// No registered overload is viable for the given argument types.
    #[error("no matching overload for function {0}()")]
    NoMatchingOverload(String),

    /// A function implementation received an argument of the wrong type.
    #[error("invalid argument type: expected {expected}, got {found}")]
    ArgumentTypeMismatch {
        /// Name of the expected type.
        expected: String,
        /// Name of the type that was actually passed.
        found: String,
    },

    /// A conversion was requested along an unsupported edge.
    #[error("unsupported conversion from {from} to {to}")]
    ImpossibleConversion {
        /// Name of the source type.
        from: String,
        /// Name of the target type.
        to: String,
    },

    /// Quantile of the impossible event (empty support) was requested.
    #[error("quantile is not defined for the impossible event")]
    UndefinedQuantile,
}

/// Shorthand `Result` type used throughout dicelab.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(...)` with the given error variant unless the condition holds.
///
/// # Example
/// ```
/// use dice_core::{ensure, errors::Error};
/// fn positive(x: i32) -> dice_core::Result<i32> {
///     ensure!(x > 0, Error::InvalidDiceParameters(format!("{x}")));
///     Ok(x)
/// }
/// assert!(positive(1).is_ok());
/// assert!(positive(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Return `Err(...)` with the given error variant immediately.
///
/// # Example
/// ```
/// use dice_core::{fail, errors::Error};
/// fn always_err() -> dice_core::Result<()> {
///     fail!(Error::UndefinedQuantile);
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($err:expr) => {
        return Err($err)
    };
}
