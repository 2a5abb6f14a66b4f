//! Domain identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Ledger position identifier (an ERC-721 style `uint256` token id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(U256);

impl PositionId {
    /// Wrap a raw `uint256` identifier.
    #[must_use]
    pub const fn new(raw: U256) -> Self {
        Self(raw)
    }

    /// Get the raw `uint256` value.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PositionId {
    fn from(raw: u64) -> Self {
        Self(U256::from(raw))
    }
}

impl From<U256> for PositionId {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<PositionId> for U256 {
    fn from(id: PositionId) -> Self {
        id.0
    }
}

impl FromStr for PositionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        U256::from_str(trimmed)
            .map(Self)
            .map_err(|e| format!("invalid position id '{s}': {e}"))
    }
}

/// Human-readable market name (e.g. `BAYC`), unique within a deployment.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketName(String);

impl MarketName {
    /// Create a new `MarketName` from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the market name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MarketName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_id_parses_decimal_and_hash_prefix() {
        assert_eq!("42".parse::<PositionId>().unwrap(), PositionId::from(42));
        assert_eq!(" #7 ".parse::<PositionId>().unwrap(), PositionId::from(7));
    }

    #[test]
    fn position_id_rejects_garbage() {
        let err = "seven".parse::<PositionId>().unwrap_err();
        assert!(err.contains("seven"));
    }

    #[test]
    fn position_ids_order_numerically() {
        let mut ids = vec![PositionId::from(10), PositionId::from(2), PositionId::from(33)];
        ids.sort();
        assert_eq!(
            ids,
            vec![PositionId::from(2), PositionId::from(10), PositionId::from(33)]
        );
    }

    #[test]
    fn market_name_display() {
        assert_eq!(MarketName::from("BAYC").to_string(), "BAYC");
    }
}
