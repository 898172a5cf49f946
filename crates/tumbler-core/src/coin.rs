//! Fixed-point money type.
//!
//! All monetary values are held as a signed count of minor units
//! (1 coin = 100 minor units). The ledger's wire format is a decimal
//! string (`"10.50"`); parsing and formatting go through this type and
//! nowhere else, so text/cents conversion never touches floating point.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoinError;

/// Number of minor units per whole coin.
pub const MINOR_UNITS_PER_COIN: i64 = 100;

/// A monetary amount in minor units.
///
/// Zero and negative values are representable; "must be positive" is a
/// caller-level rule enforced at the send boundary, not a type invariant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin(i64);

impl Coin {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a `Coin` from a raw count of minor units.
    pub const fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    /// The raw count of minor units.
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtraction that returns `None` on overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl Add for Coin {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Coin {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Coin {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Coin {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Coin {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Coin {
    /// Canonical wire form: `whole.FF` with exactly two fraction digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / MINOR_UNITS_PER_COIN as u64,
            abs % MINOR_UNITS_PER_COIN as u64
        )
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    /// Parse a decimal amount string into minor units.
    ///
    /// The fraction part is padded or truncated to exactly two digits:
    /// `"10"` and `"10.00"` parse identically, `"10.5"` means 10.50,
    /// `"10.509"` truncates to 10.50.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoinError::Malformed(s.to_string());

        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let fraction = match fraction.len() {
            0 => "00".to_string(),
            1 => format!("{fraction}0"),
            _ => fraction[..2].to_string(),
        };

        // The sign, if any, rides along in the whole part.
        let units: i64 = format!("{whole}{fraction}")
            .parse()
            .map_err(|_| malformed())?;

        // A negative whole part means the fraction counts away from zero.
        Ok(Self(units))
    }
}

impl Serialize for Coin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Coin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_canonical_two_decimal_form() {
        assert_eq!("10.00".parse::<Coin>().unwrap(), Coin::from_minor_units(1000));
        assert_eq!("0.07".parse::<Coin>().unwrap(), Coin::from_minor_units(7));
        assert_eq!("123.45".parse::<Coin>().unwrap(), Coin::from_minor_units(12345));
    }

    #[test]
    fn whole_number_equals_two_decimal_form() {
        assert_eq!("10".parse::<Coin>().unwrap(), "10.00".parse::<Coin>().unwrap());
    }

    #[test]
    fn short_fraction_is_padded() {
        assert_eq!("10.5".parse::<Coin>().unwrap(), Coin::from_minor_units(1050));
    }

    #[test]
    fn long_fraction_is_truncated() {
        assert_eq!("10.509".parse::<Coin>().unwrap(), Coin::from_minor_units(1050));
    }

    #[test]
    fn negative_amounts_parse_and_format() {
        let c = "-10.50".parse::<Coin>().unwrap();
        assert_eq!(c, Coin::from_minor_units(-1050));
        assert_eq!(c.to_string(), "-10.50");
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        for bad in ["", "abc", "10.x5", "1.2.3", "10,00", "--5"] {
            assert!(bad.parse::<Coin>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_amounts_below_one_coin() {
        assert_eq!(Coin::from_minor_units(7).to_string(), "0.07");
        assert_eq!(Coin::from_minor_units(70).to_string(), "0.70");
        assert_eq!(Coin::ZERO.to_string(), "0.00");
    }

    #[test]
    fn serde_uses_the_wire_string_form() {
        let c = Coin::from_minor_units(1050);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"10.50\"");
        let back: Coin = serde_json::from_str("\"10.50\"").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn arithmetic_and_ordering() {
        let a = Coin::from_minor_units(120);
        let b = Coin::from_minor_units(20);
        assert_eq!(a - b, Coin::from_minor_units(100));
        assert_eq!(a + b, Coin::from_minor_units(140));
        assert!(a > b);
        assert!(b.is_positive());
        assert!(!Coin::ZERO.is_positive());
        assert_eq!(a.checked_sub(b), Some(Coin::from_minor_units(100)));
        assert_eq!(
            Coin::from_minor_units(i64::MIN).checked_sub(Coin::from_minor_units(1)),
            None
        );
    }

    proptest! {
        #[test]
        fn round_trips_canonical_text(units in -1_000_000_000i64..1_000_000_000) {
            let c = Coin::from_minor_units(units);
            let text = c.to_string();
            prop_assert_eq!(text.parse::<Coin>().unwrap(), c);
        }
    }
}
