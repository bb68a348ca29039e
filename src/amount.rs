//! Fixed-point money type with 4 decimal places precision.
//!
//! Balances and transfer amounts are carried as `rust_decimal` values with an
//! enforced scale, so replaying a settlement never accumulates binary
//! floating-point drift. Every comparison against zero still goes through
//! [`Amount::EPSILON`].
//!
//! Parsed amounts are capped at [`Amount::MAX_MAGNITUDE`]. Arithmetic
//! saturates at the `Decimal` range instead of panicking, which a capped
//! input can only reach with an absurd participant count.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A signed money amount that maintains exactly 4 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use settlement_engine::Amount;
///
/// let amount = Amount::from_str("-60.5").unwrap();
/// assert_eq!(amount.to_string(), "-60.5000");
/// assert_eq!(amount.abs().to_string(), "60.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Tolerance of 0.01 currency units. Anything this close to zero is settled.
    pub const EPSILON: Self = Amount(Decimal::from_parts(100, 0, 0, false, 4));

    /// Largest absolute value accepted when parsing: 10^15 currency units.
    /// 10^19 at scale 4 is `0x8AC7_2304_89E8_0000`.
    pub const MAX_MAGNITUDE: Self =
        Amount(Decimal::from_parts(0x89E8_0000, 0x8AC7_2304, 0, false, 4));

    /// Creates a new `Amount` from a `Decimal`, normalizing to 4 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Amount(self.0.abs())
    }

    /// Returns `true` if this value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly above `+EPSILON`: the holder is a creditor.
    pub fn is_credit(&self) -> bool {
        *self > Self::EPSILON
    }

    /// Strictly below `-EPSILON`: the holder is a debtor.
    pub fn is_debt(&self) -> bool {
        *self < -Self::EPSILON
    }

    /// Within `[-EPSILON, EPSILON]`.
    pub fn is_settled(&self) -> bool {
        self.abs() <= Self::EPSILON
    }

    /// Equal to `other` within `EPSILON`.
    pub fn approx_eq(self, other: Self) -> bool {
        (self - other).is_settled()
    }

    /// Decimal bound an overflowing operation moving in `direction` clamps to.
    fn saturated(direction: Decimal) -> Self {
        if direction.is_sign_negative() {
            Amount(Decimal::MIN)
        } else {
            Amount(Decimal::MAX)
        }
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Parses and rescales to 4 dp, rejecting magnitudes above
    /// [`Amount::MAX_MAGNITUDE`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let amount = Amount::new(Decimal::from_str(s.trim())?);
        if amount > Self::MAX_MAGNITUDE {
            return Err(rust_decimal::Error::ExceedsMaximumPossibleValue);
        }
        if amount < -Self::MAX_MAGNITUDE {
            return Err(rust_decimal::Error::LessThanMinimumPossibleValue);
        }
        Ok(amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match self.0.checked_add(rhs.0) {
            Some(sum) => Amount::new(sum),
            None => Amount::saturated(rhs.0),
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        match self.0.checked_sub(rhs.0) {
            Some(difference) => Amount::new(difference),
            None => Amount::saturated(-rhs.0),
        }
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(amt("100").to_string(), "100.0000");
        assert_eq!(amt("  -40.5  ").to_string(), "-40.5000");
        assert_eq!(amt("0.005").to_string(), "0.0050");
    }

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(Amount::EPSILON, amt("0.01"));
        assert_eq!(Amount::EPSILON.to_string(), "0.0100");
    }

    #[test]
    fn test_classification_boundaries() {
        assert!(!amt("0.01").is_credit());
        assert!(amt("0.0101").is_credit());
        assert!(!amt("-0.01").is_debt());
        assert!(amt("-0.0101").is_debt());
        assert!(amt("0.01").is_settled());
        assert!(amt("-0.005").is_settled());
        assert!(!amt("0.02").is_settled());
    }

    #[test]
    fn test_approx_eq_uses_epsilon() {
        assert!(amt("100").approx_eq(amt("99.99")));
        assert!(!amt("100").approx_eq(amt("99.98")));
    }

    #[test]
    fn test_rejects_magnitudes_above_cap() {
        assert_eq!(Amount::MAX_MAGNITUDE, amt("1000000000000000"));
        assert!(Amount::from_str("-1000000000000000").is_ok());
        assert!(Amount::from_str("1000000000000000.0001").is_err());
        assert!(Amount::from_str("-1000000000000001").is_err());
        assert!(Amount::from_str("79228162514264337593543950335").is_err());
    }

    #[test]
    fn test_overflow_saturates_instead_of_panicking() {
        let huge = Amount::new(Decimal::MAX);
        assert_eq!(huge + huge, Amount::new(Decimal::MAX));
        assert_eq!(-huge - huge, Amount::new(Decimal::MIN));

        let mut total = huge;
        total += huge;
        assert_eq!(total, huge);
        assert_eq!([huge, huge, huge].iter().sum::<Amount>(), huge);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let values = [amt("50"), amt("30"), amt("-40"), amt("-40")];
        assert_eq!(values.iter().sum::<Amount>(), Amount::ZERO);
        assert_eq!((amt("1.5") - amt("2.5")).to_string(), "-1.0000");
        assert_eq!((-amt("3")).abs(), amt("3"));
    }
}
