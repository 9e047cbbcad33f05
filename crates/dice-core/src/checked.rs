//! Checked integer arithmetic.
//!
//! [`CheckedInt`] wraps the [`Integer`] value type and turns every boundary
//! violation into a typed error instead of wrapping around. Overflow and
//! underflow are reported separately; division truncates toward zero.

use std::fmt;

use crate::errors::{Error, Result};
use crate::Integer;

/// A signed integer whose arithmetic reports overflow, underflow, and
/// division by zero as typed failures.
///
/// Equality, ordering, and hashing follow the wrapped integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckedInt(Integer);

impl CheckedInt {
    /// Wrap a raw integer value.
    pub const fn new(value: Integer) -> Self {
        Self(value)
    }

    /// The wrapped integer value.
    pub const fn get(self) -> Integer {
        self.0
    }

    /// Compute `self + other`.
    pub fn add(self, other: CheckedInt) -> Result<CheckedInt> {
        let (a, b) = (self.0, other.0);
        if b > 0 && a > Integer::MAX - b {
            return Err(Error::Overflow(format!("{a} + {b}")));
        }
        if b < 0 && a < Integer::MIN - b {
            return Err(Error::Underflow(format!("{a} + {b}")));
        }
        Ok(Self(a + b))
    }

    /// Compute `self - other`.
    pub fn sub(self, other: CheckedInt) -> Result<CheckedInt> {
        let (a, b) = (self.0, other.0);
        if b < 0 && a > Integer::MAX + b {
            return Err(Error::Overflow(format!("{a} - {b}")));
        }
        if b > 0 && a < Integer::MIN + b {
            return Err(Error::Underflow(format!("{a} - {b}")));
        }
        Ok(Self(a - b))
    }

    /// Compute `self * other`.
    pub fn mul(self, other: CheckedInt) -> Result<CheckedInt> {
        let (a, b) = (self.0, other.0);
        if a != 0 && b != 0 {
            if (a == -1 && b == Integer::MIN) || (a == Integer::MIN && b == -1) {
                return Err(Error::Overflow(format!("{a} * {b}")));
            }

            let both_positive = a > 0 && b > 0;
            let both_negative = a < 0 && b < 0;
            if (both_positive && a > Integer::MAX / b)
                || (both_negative && a < Integer::MAX / b)
            {
                return Err(Error::Overflow(format!("{a} * {b}")));
            }

            // b == -1 cannot underflow here; a == MIN is handled above.
            if (b > 0 && a < Integer::MIN / b) || (b < -1 && a > Integer::MIN / b) {
                return Err(Error::Underflow(format!("{a} * {b}")));
            }
        }
        Ok(Self(a * b))
    }

    /// Compute `self / other`, truncating toward zero.
    pub fn div(self, other: CheckedInt) -> Result<CheckedInt> {
        let (a, b) = (self.0, other.0);
        if b == 0 {
            return Err(Error::DivisionByZero(format!("{a} / 0")));
        }
        if a == Integer::MIN && b == -1 {
            return Err(Error::Overflow(format!("{a} / {b}")));
        }
        Ok(Self(a / b))
    }

    /// Compute `-self`.
    pub fn neg(self) -> Result<CheckedInt> {
        if self.0 == Integer::MIN {
            return Err(Error::Overflow(format!("-({})", self.0)));
        }
        Ok(Self(-self.0))
    }
}

impl From<Integer> for CheckedInt {
    fn from(value: Integer) -> Self {
        Self(value)
    }
}

impl fmt::Display for CheckedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX: CheckedInt = CheckedInt::new(Integer::MAX);
    const MIN: CheckedInt = CheckedInt::new(Integer::MIN);

    fn int(value: Integer) -> CheckedInt {
        CheckedInt::new(value)
    }

    #[test]
    fn add_within_bounds() {
        assert_eq!(int(2).add(int(3)).unwrap(), int(5));
        assert_eq!(MAX.add(int(0)).unwrap(), MAX);
        assert_eq!(MIN.add(int(0)).unwrap(), MIN);
        assert_eq!(MAX.add(int(-1)).unwrap(), int(Integer::MAX - 1));
    }

    #[test]
    fn add_overflow_and_underflow() {
        assert!(matches!(MAX.add(int(1)), Err(Error::Overflow(_))));
        assert!(matches!(MIN.add(int(-1)), Err(Error::Underflow(_))));
    }

    #[test]
    fn sub_within_bounds() {
        assert_eq!(int(2).sub(int(3)).unwrap(), int(-1));
        assert_eq!(MIN.sub(int(0)).unwrap(), MIN);
        assert_eq!(MIN.sub(int(-1)).unwrap(), int(Integer::MIN + 1));
    }

    #[test]
    fn sub_overflow_and_underflow() {
        assert!(matches!(MAX.sub(int(-1)), Err(Error::Overflow(_))));
        assert!(matches!(MIN.sub(int(1)), Err(Error::Underflow(_))));
    }

    #[test]
    fn mul_within_bounds() {
        assert_eq!(int(-7).mul(int(3)).unwrap(), int(-21));
        assert_eq!(MAX.mul(int(1)).unwrap(), MAX);
        assert_eq!(MIN.mul(int(1)).unwrap(), MIN);
        assert_eq!(MAX.mul(int(-1)).unwrap(), int(Integer::MIN + 1));
    }

    #[test]
    fn mul_overflow() {
        assert!(matches!(MIN.mul(int(-1)), Err(Error::Overflow(_))));
        assert!(matches!(int(-1).mul(MIN), Err(Error::Overflow(_))));
        assert!(matches!(MAX.mul(int(2)), Err(Error::Overflow(_))));
        assert!(matches!(MIN.mul(int(-2)), Err(Error::Overflow(_))));
    }

    #[test]
    fn mul_underflow() {
        assert!(matches!(MIN.mul(int(2)), Err(Error::Underflow(_))));
        assert!(matches!(MAX.mul(int(-2)), Err(Error::Underflow(_))));
    }

    #[test]
    fn div_truncates_toward_zero() {
        assert_eq!(int(7).div(int(2)).unwrap(), int(3));
        assert_eq!(int(-7).div(int(2)).unwrap(), int(-3));
        assert_eq!(int(7).div(int(-2)).unwrap(), int(-3));
    }

    #[test]
    fn div_failures() {
        assert!(matches!(int(1).div(int(0)), Err(Error::DivisionByZero(_))));
        assert!(matches!(MIN.div(int(-1)), Err(Error::Overflow(_))));
        assert_eq!(MAX.div(int(-1)).unwrap(), int(-Integer::MAX));
    }

    #[test]
    fn neg_boundary() {
        assert_eq!(int(5).neg().unwrap(), int(-5));
        assert_eq!(MAX.neg().unwrap(), int(-Integer::MAX));
        assert!(matches!(MIN.neg(), Err(Error::Overflow(_))));
    }

    proptest! {
        #[test]
        fn neg_neg_round_trips(x in (Integer::MIN + 1)..=Integer::MAX) {
            let value = int(x);
            prop_assert_eq!(value.neg().unwrap().neg().unwrap(), value);
        }

        #[test]
        fn add_matches_wide_arithmetic(a: Integer, b: Integer) {
            let wide = i64::from(a) + i64::from(b);
            match int(a).add(int(b)) {
                Ok(sum) => prop_assert_eq!(i64::from(sum.get()), wide),
                Err(_) => prop_assert!(
                    wide > i64::from(Integer::MAX) || wide < i64::from(Integer::MIN)
                ),
            }
        }
    }
}
