use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::Error;

/// A ledger amount. Parsed from and displayed as a decimal string, which may
/// exceed the 64-bit range; the canonical form fed into block hashes is 16
/// bytes big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u128);

impl Amount {
    pub const LEN: usize = 16;

    pub const fn zero() -> Self {
        Amount(0)
    }

    pub const fn from_raw(value: u128) -> Self {
        Amount(value)
    }

    pub const fn to_raw(self) -> u128 {
        self.0
    }

    pub const fn to_bytes(self) -> [u8; Self::LEN] {
        self.0.to_be_bytes()
    }

    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Sum widened to 256 bits, so a full block of near-maximum amounts can
    /// never wrap.
    pub fn sum<'a, I>(amounts: I) -> U256
    where
        I: IntoIterator<Item = &'a Amount>,
    {
        amounts
            .into_iter()
            .fold(U256::zero(), |acc, amount| acc + U256::from(amount.0))
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let value = s.parse::<u128>().map_err(|source| Error::InvalidFormat {
            what: "amount",
            reason: source.to_string(),
        })?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_round_trip() {
        let amount = Amount::from_str("100").unwrap();
        assert_eq!(amount.to_raw(), 100);
        assert_eq!(amount.to_string(), "100");

        // Values past 2^64 are fine.
        let big = Amount::from_str("340282366920938463463374607431768211455").unwrap();
        assert_eq!(big.to_raw(), u128::MAX);
        assert_eq!(big.to_string(), "340282366920938463463374607431768211455");
    }

    #[test]
    fn rejects_bad_decimals() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("-1").is_err());
        assert!(Amount::from_str("12x").is_err());
        // One past u128::MAX.
        assert!(Amount::from_str("340282366920938463463374607431768211456").is_err());
    }

    #[test]
    fn canonical_bytes_are_big_endian() {
        let amount = Amount::from_raw(0x0102);
        let mut expected = [0u8; 16];
        expected[14] = 1;
        expected[15] = 2;
        assert_eq!(amount.to_bytes(), expected);
        assert_eq!(Amount::from_bytes(expected), amount);
    }

    #[test]
    fn widened_sum_does_not_wrap() {
        let amounts = [Amount::from_raw(u128::MAX); 8];
        let total = Amount::sum(amounts.iter());
        assert_eq!(
            total.to_string(),
            "2722258935367507707706996859454145691640"
        );
        let none: [Amount; 0] = [];
        assert_eq!(Amount::sum(none.iter()), U256::zero());
    }

    #[test]
    fn checked_add() {
        assert_eq!(
            Amount::from_raw(1).checked_add(Amount::from_raw(2)),
            Some(Amount::from_raw(3))
        );
        assert_eq!(
            Amount::from_raw(u128::MAX).checked_add(Amount::from_raw(1)),
            None
        );
    }
}
