//! Amount type for the firewall's single fungible asset
//!
//! Amounts are u64 base units with 9 decimal places
//! (1 coin = 1_000_000_000 base units). Callers pass decimal strings at the
//! boundary; internally everything is integer arithmetic with overflow
//! checking.

use crate::error::{FirewallError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places of the asset's base unit.
pub const DECIMALS: u32 = 9;

/// Base units per whole coin.
pub const UNITS_PER_COIN: u64 = 1_000_000_000;

/// An amount of the asset, in smallest indivisible units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal coin string into base units.
    ///
    /// Grammar: one or more digits, optionally followed by `.` and up to 9
    /// fraction digits. Parsed exactly, without going through floats.
    pub fn parse_decimal(input: &str) -> Result<Self> {
        let value = input.trim();
        if value.is_empty() {
            return Err(FirewallError::invalid_amount("amount is empty"));
        }

        let (whole, frac) = match value.split_once('.') {
            Some((w, f)) => (w, f),
            None => (value, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FirewallError::invalid_amount(format!(
                "'{value}' is not a decimal amount"
            )));
        }
        if frac.len() > DECIMALS as usize || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FirewallError::invalid_amount(format!(
                "'{value}' has more than {DECIMALS} fraction digits"
            )));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| FirewallError::invalid_amount(format!("'{value}' is out of range")))?;

        // Right-pad the fraction to 9 digits: "05" -> 050_000_000 units.
        let mut frac_units: u64 = 0;
        if !frac.is_empty() {
            let padding = DECIMALS as usize - frac.len();
            frac_units = frac.parse::<u64>().expect("digits checked above") * 10u64.pow(padding as u32);
        }

        whole
            .checked_mul(UNITS_PER_COIN)
            .and_then(|units| units.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| FirewallError::invalid_amount(format!("'{value}' is out of range")))
    }

    /// Render as a decimal coin string, e.g. `3.000000000`.
    pub fn to_decimal_string(&self) -> String {
        let whole = self.0 / UNITS_PER_COIN;
        let frac = self.0 % UNITS_PER_COIN;
        format!("{}.{:0>width$}", whole, frac, width = DECIMALS as usize)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_coins() {
        assert_eq!(Amount::parse_decimal("3").unwrap(), Amount::new(3_000_000_000));
        assert_eq!(Amount::parse_decimal("0").unwrap(), Amount::zero());
    }

    #[test]
    fn test_parse_fraction_is_right_padded() {
        assert_eq!(Amount::parse_decimal("0.1").unwrap(), Amount::new(100_000_000));
        assert_eq!(Amount::parse_decimal("0.05").unwrap(), Amount::new(50_000_000));
        assert_eq!(
            Amount::parse_decimal("1.000000001").unwrap(),
            Amount::new(1_000_000_001)
        );
    }

    #[test]
    fn test_parse_rejects_bad_grammar() {
        for bad in ["", ".", "1.", ".5", "1.0000000001", "1,5", "-1", "1e9", "0x10"] {
            assert!(Amount::parse_decimal(bad).is_err(), "should reject {bad:?}");
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        // u64::MAX base units is ~18.4 billion coins
        assert_eq!(
            Amount::parse_decimal("18446744073.709551615").unwrap(),
            Amount::new(u64::MAX)
        );
        assert!(Amount::parse_decimal("18446744073.709551616").is_err());
        assert!(Amount::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let amount = Amount::new(3_100_000_000);
        assert_eq!(amount.to_string(), "3.100000000");
        assert_eq!(Amount::parse_decimal(&amount.to_string()).unwrap(), amount);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Amount::new(100);
        let b = Amount::new(50);
        assert_eq!(a.checked_add(b), Some(Amount::new(150)));
        assert_eq!(a.checked_sub(b), Some(Amount::new(50)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(Amount::new(u64::MAX).checked_add(Amount::new(1)), None);
    }
}
