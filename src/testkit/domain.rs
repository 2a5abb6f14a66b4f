//! Builders for domain primitives used across tests.

use alloy_primitives::{Address, I256, U256};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::fixed::{self, WAD};
use crate::domain::{Market, Position, PositionId, PositionState, RiskSnapshot};

/// Market `name` whose collection is `0xbb..bb` for `byte = 0xbb` and whose
/// option token is the same byte with the high bit set.
pub fn market(name: &str, byte: u8) -> Market {
    Market::new(
        name,
        Address::repeat_byte(byte),
        dec!(0.5),
        Some(Address::repeat_byte(byte | 0x80)),
    )
}

/// Market with no option token deployed.
pub fn market_without_option_token(name: &str, byte: u8) -> Market {
    Market::new(name, Address::repeat_byte(byte), dec!(0.5), None)
}

/// Convert a human decimal into a WAD integer.
pub fn wad(value: Decimal) -> I256 {
    fixed::from_decimal(value).expect("test value fits in int256")
}

/// Convert a non-negative human decimal into an unsigned WAD integer.
pub fn wad_u(value: Decimal) -> U256 {
    wad(value).into_raw()
}

/// Snapshot from human decimals.
pub fn snapshot(pnl: Decimal, delta: Decimal) -> RiskSnapshot {
    RiskSnapshot::new(wad(pnl), wad(delta))
}

/// Position ids from raw integers.
pub fn ids(raw: &[u64]) -> Vec<PositionId> {
    raw.iter().map(|&i| PositionId::from(i)).collect()
}

/// A position of one unit notional with no risk contribution that never expires.
pub fn position(id: u64, market: &Market, state: PositionState) -> Position {
    Position {
        id: PositionId::from(id),
        collection: market.collection(),
        strike: WAD.into_raw(),
        expiry: u64::MAX,
        amount: WAD.into_raw(),
        state,
        pnl: I256::ZERO,
        weighted_delta: I256::ZERO,
    }
}

/// A position contributing `pnl` and `weighted_delta` with notional `amount`.
pub fn risky_position(
    id: u64,
    market: &Market,
    state: PositionState,
    pnl: Decimal,
    weighted_delta: Decimal,
    amount: Decimal,
) -> Position {
    Position {
        pnl: wad(pnl),
        weighted_delta: wad(weighted_delta),
        amount: wad_u(amount),
        ..position(id, market, state)
    }
}
