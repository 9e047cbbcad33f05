//! # dicelab
//!
//! An exact probability calculator for dice expressions.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `dice-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use dicelab::core::CheckedInt;
//! use dicelab::lang::{Calculator, Value};
//!
//! let mut calc = Calculator::new();
//! let values = calc.evaluate("var damage = 2d6 + 3; expectation(damage)");
//! assert_eq!(values[0], None); // assignments produce no value
//! match values[1] {
//!     Some(Value::Real(expectation)) => assert!((expectation - 10.0).abs() < 1e-9),
//!     ref other => panic!("unexpected result: {other:?}"),
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, checked integer arithmetic, and error definitions.
pub use dice_core as core;

/// Random variables, dice convolution, and decompositions.
pub use dice_prob as prob;

/// The expression language: values, dispatch, parser, and interpreter.
pub use dice_lang as lang;
