//! Pure decimal helpers - no I/O, no async
//! All money in the engine is `rust_decimal::Decimal`; nothing here touches f64.

use candid::Nat;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use crate::infrastructure::errors::{Result, CalculationError, ValidationError};
use crate::infrastructure::constants::{MAX_TOKEN_DECIMALS, SECONDS_PER_DAY};

/// Convert a raw ledger amount (base units) into a token-denominated Decimal
///
/// `1_5000_0000` with 8 decimals becomes `1.5`. Amounts that do not fit the
/// 96-bit Decimal mantissa are rejected rather than rounded.
pub fn nat_to_decimal(amount: &Nat, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(CalculationError::ConversionFailed {
            value: amount.to_string(),
            reason: format!("{} decimals exceeds maximum of {}", decimals, MAX_TOKEN_DECIMALS),
        }.into());
    }

    let raw = amount.0.to_i128()
        .ok_or_else(|| CalculationError::Overflow {
            operation: format!("nat_to_decimal({})", amount),
        })?;

    Decimal::try_from_i128_with_scale(raw, decimals as u32)
        .map(|d| d.normalize())
        .map_err(|e| CalculationError::ConversionFailed {
            value: amount.to_string(),
            reason: e.to_string(),
        }.into())
}

/// Parse a decimal string as sent by the oracle or a caller
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed).map_err(|e| {
        ValidationError::InvalidAmount {
            amount: trimmed.to_string(),
            reason: e.to_string(),
        }.into()
    })
}

pub fn clamp_non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Clamp a ratio into [0, 1]
pub fn clamp_unit_interval(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Day count to seconds, saturating
pub fn days_to_seconds(days: u64) -> u64 {
    days.saturating_mul(SECONDS_PER_DAY)
}
