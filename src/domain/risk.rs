//! Cached aggregate risk and the materiality rule that gates cache writes.

use std::fmt;

use alloy_primitives::{I256, U256};

use super::error::DomainError;
use super::fixed::{self, format_wad};

/// Per-market aggregate `{PNL, delta}` as stored in the risk cache.
///
/// Both values are 18-decimal fixed point. `delta` is per unit of notional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskSnapshot {
    /// Summed mark-to-market PNL of the market's active positions.
    pub pnl: I256,
    /// Weighted delta normalized by the outstanding option supply.
    pub delta: I256,
}

impl RiskSnapshot {
    /// The snapshot of a market with no active positions.
    pub const ZERO: Self = Self {
        pnl: I256::ZERO,
        delta: I256::ZERO,
    };

    /// Create a snapshot from raw WAD values.
    #[must_use]
    pub const fn new(pnl: I256, delta: I256) -> Self {
        Self { pnl, delta }
    }

    /// Build a snapshot from the ledger's aggregate over the active set.
    ///
    /// `weighted_delta` is divided by `total_supply` after scaling by `1e18`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for a zero supply or on overflow.
    pub fn from_aggregate(
        pnl: I256,
        weighted_delta: I256,
        total_supply: U256,
    ) -> Result<Self, DomainError> {
        let delta = fixed::div_wad(weighted_delta, total_supply, "delta per unit")?;
        Ok(Self { pnl, delta })
    }

    /// True when both values are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.pnl.is_zero() && self.delta.is_zero()
    }
}

impl fmt::Display for RiskSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pnl={} delta={}",
            format_wad(self.pnl),
            format_wad(self.delta)
        )
    }
}

/// Rule deciding whether a freshly computed snapshot is worth a cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materiality {
    /// Write when `|new - old| * scale > |old|` for PNL or delta.
    ///
    /// With `scale = 100` any change larger than 1% of the cached value is
    /// material; a change of exactly 1% is not.
    Relative {
        /// Multiplier applied to the absolute change.
        scale: u64,
    },
    /// Write whenever either value differs at all.
    AnyChange,
}

impl Default for Materiality {
    fn default() -> Self {
        Self::Relative { scale: 100 }
    }
}

impl Materiality {
    /// Decide whether moving from `cached` to `computed` warrants a write.
    #[must_use]
    pub fn is_material(&self, cached: &RiskSnapshot, computed: &RiskSnapshot) -> bool {
        match *self {
            Self::AnyChange => cached != computed,
            Self::Relative { scale } => {
                exceeds(scale, cached.pnl, computed.pnl)
                    || exceeds(scale, cached.delta, computed.delta)
            }
        }
    }
}

fn exceeds(scale: u64, old: I256, new: I256) -> bool {
    let Some(change) = new.checked_sub(old) else {
        // A difference outside int256 is material by any measure.
        return true;
    };
    change.unsigned_abs().saturating_mul(U256::from(scale)) > old.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixed::from_decimal;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn snapshot(pnl: Decimal, delta: Decimal) -> RiskSnapshot {
        RiskSnapshot::new(from_decimal(pnl).unwrap(), from_decimal(delta).unwrap())
    }

    #[test]
    fn one_percent_moves_are_not_material_by_default() {
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(101), dec!(10.05));
        assert!(!Materiality::default().is_material(&cached, &computed));
    }

    #[test]
    fn exactly_at_threshold_is_not_material() {
        // |1| * 100 == |100|: strict inequality means no write.
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(101), dec!(10));
        assert!(!Materiality::default().is_material(&cached, &computed));

        let computed = snapshot(dec!(99), dec!(10.1));
        assert!(!Materiality::default().is_material(&cached, &computed));
    }

    #[test]
    fn just_above_threshold_is_material() {
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(101.000000000000000001), dec!(10));
        assert!(Materiality::default().is_material(&cached, &computed));
    }

    #[test]
    fn delta_alone_can_trigger() {
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(100), dec!(10.2));
        assert!(Materiality::default().is_material(&cached, &computed));
    }

    #[test]
    fn any_move_away_from_zero_is_material() {
        let cached = RiskSnapshot::ZERO;
        let computed = snapshot(dec!(0.000001), dec!(0));
        assert!(Materiality::default().is_material(&cached, &computed));
        assert!(!Materiality::default().is_material(&cached, &RiskSnapshot::ZERO));
    }

    #[test]
    fn scale_is_tunable() {
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(105), dec!(10));
        assert!(Materiality::Relative { scale: 100 }.is_material(&cached, &computed));
        // scale 10 -> only moves above 10% count
        assert!(!Materiality::Relative { scale: 10 }.is_material(&cached, &computed));
    }

    #[test]
    fn any_change_writes_on_every_difference() {
        let cached = snapshot(dec!(100), dec!(10));
        let computed = snapshot(dec!(100.000000000000000001), dec!(10));
        assert!(Materiality::AnyChange.is_material(&cached, &computed));
        assert!(!Materiality::AnyChange.is_material(&cached, &cached));
    }

    #[test]
    fn overflowing_difference_is_material() {
        let cached = RiskSnapshot::new(I256::MIN, I256::ZERO);
        let computed = RiskSnapshot::new(I256::MAX, I256::ZERO);
        assert!(Materiality::default().is_material(&cached, &computed));
    }

    #[test]
    fn from_aggregate_normalizes_delta() {
        let supply = U256::from(4_000_000_000_000_000_000u128);
        let result =
            RiskSnapshot::from_aggregate(from_decimal(dec!(7)).unwrap(), from_decimal(dec!(2)).unwrap(), supply)
                .unwrap();
        assert_eq!(result, snapshot(dec!(7), dec!(0.5)));
    }

    #[test]
    fn from_aggregate_rejects_zero_supply() {
        assert!(RiskSnapshot::from_aggregate(I256::ZERO, I256::ONE, U256::ZERO).is_err());
    }

    #[test]
    fn display_uses_human_units() {
        assert_eq!(snapshot(dec!(1.5), dec!(-2)).to_string(), "pnl=1.5 delta=-2");
    }
}
