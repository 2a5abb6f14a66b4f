//! 18-decimal fixed-point helpers over the ledger's 256-bit integers.
//!
//! PNL and delta live on chain as `int256` scaled by `1e18`. Division follows
//! the ledger's signed integer division: scale first, then truncate toward zero.

use alloy_primitives::{I256, U256};
use rust_decimal::Decimal;

use super::error::DomainError;

/// Number of decimals in a WAD value.
pub const WAD_DECIMALS: u32 = 18;

/// `1e18` as a signed 256-bit integer.
pub const WAD: I256 = I256::from_raw(U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]));

fn pow10(exp: u32) -> I256 {
    I256::from_raw(U256::from(10u64).pow(U256::from(exp)))
}

/// Compute `numerator * 1e18 / denominator`.
///
/// The quotient truncates toward zero like Solidity's signed division, so a
/// negative result rounds toward zero rather than toward negative infinity:
/// `-1` over `3` (both WAD) gives `-0.333333333333333333`, not `...334`.
///
/// # Errors
///
/// Returns [`DomainError::DivisionByZero`] for a zero denominator and
/// [`DomainError::Overflow`] if any intermediate leaves the `int256` range.
pub fn div_wad(numerator: I256, denominator: U256, what: &'static str) -> Result<I256, DomainError> {
    if denominator.is_zero() {
        return Err(DomainError::DivisionByZero { what });
    }
    let denominator = I256::try_from(denominator).map_err(|_| DomainError::Overflow { what })?;
    numerator
        .checked_mul(WAD)
        .and_then(|scaled| scaled.checked_div(denominator))
        .ok_or(DomainError::Overflow { what })
}

/// Convert a human decimal (e.g. `10.05`) into a WAD integer.
///
/// Digits beyond 18 decimals are truncated.
///
/// # Errors
///
/// Returns [`DomainError::Overflow`] if the scaled value does not fit.
pub fn from_decimal(value: Decimal) -> Result<I256, DomainError> {
    let what = "decimal to wad";
    let mantissa = I256::try_from(value.mantissa()).map_err(|_| DomainError::Overflow { what })?;
    let scale = value.scale();
    if scale <= WAD_DECIMALS {
        mantissa
            .checked_mul(pow10(WAD_DECIMALS - scale))
            .ok_or(DomainError::Overflow { what })
    } else {
        mantissa
            .checked_div(pow10(scale - WAD_DECIMALS))
            .ok_or(DomainError::Overflow { what })
    }
}

/// Convert a WAD integer into a human decimal for logs and operator output.
///
/// Returns `None` when the value is too large for `Decimal`.
#[must_use]
pub fn to_decimal(value: I256) -> Option<Decimal> {
    let raw = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(raw, WAD_DECIMALS)
        .ok()
        .or_else(|| Decimal::try_from_i128_with_scale(raw / 1_000_000_000, WAD_DECIMALS - 9).ok())
        .map(|d| d.normalize())
}

/// Render a WAD integer for display, falling back to the raw integer.
#[must_use]
pub fn format_wad(value: I256) -> String {
    to_decimal(value).map_or_else(|| format!("{value}e-18"), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wad(value: Decimal) -> I256 {
        from_decimal(value).unwrap()
    }

    #[test]
    fn wad_constant_is_one_e18() {
        assert_eq!(WAD.to_string(), "1000000000000000000");
    }

    #[test]
    fn from_decimal_scales_fractional_values() {
        assert_eq!(wad(dec!(10.05)).to_string(), "10050000000000000000");
        assert_eq!(wad(dec!(-1)).to_string(), "-1000000000000000000");
        assert_eq!(wad(dec!(0)), I256::ZERO);
    }

    #[test]
    fn from_decimal_truncates_past_eighteen_places() {
        let value = Decimal::from_i128_with_scale(1_234_567_890_123_456_789_5, 19);
        assert_eq!(from_decimal(value).unwrap().to_string(), "1234567890123456789");
    }

    #[test]
    fn div_wad_normalizes_by_supply() {
        // weighted delta 6 over a supply of 2 -> 3 per unit
        let result = div_wad(wad(dec!(6)), U256::from(2_000_000_000_000_000_000u128), "delta").unwrap();
        assert_eq!(result, wad(dec!(3)));
    }

    #[test]
    fn div_wad_truncates_toward_zero() {
        let three = U256::from(3u64) * U256::from(1_000_000_000_000_000_000u64);
        let positive = div_wad(wad(dec!(1)), three, "delta").unwrap();
        assert_eq!(positive.to_string(), "333333333333333333");

        let negative = div_wad(wad(dec!(-1)), three, "delta").unwrap();
        assert_eq!(negative.to_string(), "-333333333333333333");
    }

    #[test]
    fn div_wad_rejects_zero_denominator() {
        assert_eq!(
            div_wad(WAD, U256::ZERO, "delta"),
            Err(DomainError::DivisionByZero { what: "delta" })
        );
    }

    #[test]
    fn div_wad_reports_overflow() {
        assert_eq!(
            div_wad(I256::MAX, U256::from(1u64), "delta"),
            Err(DomainError::Overflow { what: "delta" })
        );
    }

    #[test]
    fn to_decimal_round_trips_display_values() {
        assert_eq!(to_decimal(wad(dec!(101.5))), Some(dec!(101.5)));
        assert_eq!(format_wad(wad(dec!(-3.25))), "-3.25");
    }

    #[test]
    fn format_wad_falls_back_for_huge_values() {
        assert!(format_wad(I256::MAX).ends_with("e-18"));
    }
}
