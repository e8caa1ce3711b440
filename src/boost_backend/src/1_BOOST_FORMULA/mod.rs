//! # Boost Formula
//!
//! Pure valuation of one locked deposit. No I/O, no async, no clock:
//! `now` is always an argument.
//!
//! ## Formula
//! ```text
//! virtual_end      = perpetual ? min(now + ext·86400, lock_start + ceiling·86400) : lock_end
//! lock_ratio       = max(0, virtual_end − lock_start) / ceiling_s
//! time_ratio       = max(0, now − lock_start)         / ceiling_s
//! combined         = clamp(lock_ratio + time_ratio, 0, 1)
//! boosted_amount   = amount × (1 + combined)
//! ```
//!
//! The two ratios are ADDED before capping: a lock as long as the ceiling
//! reaches the full 2× boost immediately, a shorter one grows into it as it
//! is held.
//!
//! ## Example
//! ```text
//! 1000 locked for 100 days, ceiling 200 days, at lock start:
//!   lock_ratio 0.5 + time_ratio 0 → ×1.5 → 1500
//! Same deposit at lock expiry:
//!   lock_ratio 0.5 + time_ratio 0.5 → ×2.0 → 2000
//! ```

use rust_decimal::Decimal;
use crate::infrastructure::{clamp_non_negative, clamp_unit_interval};
use crate::infrastructure::math::days_to_seconds;

/// Lock end used for valuation
///
/// A perpetual lock is re-extended relative to `now` but never beyond the
/// program's maximum lock length measured from its start.
pub fn virtual_lock_end(
    lock_start: u64,
    lock_end: u64,
    now: u64,
    ceiling_days: u32,
    perpetual_extension_days: Option<u32>,
) -> u64 {
    match perpetual_extension_days {
        Some(extension_days) => {
            let renewed = now.saturating_add(days_to_seconds(extension_days as u64));
            let ceiling_end = lock_start.saturating_add(days_to_seconds(ceiling_days as u64));
            renewed.min(ceiling_end)
        }
        None => lock_end,
    }
}

/// Combined lock + time ratio, capped into [0, 1]
///
/// Returns zero when the ceiling is zero (boosting disabled).
pub fn combined_ratio(
    lock_start: u64,
    lock_end: u64,
    now: u64,
    ceiling_days: u32,
    perpetual_extension_days: Option<u32>,
) -> Decimal {
    let ceiling_seconds = days_to_seconds(ceiling_days as u64);
    if ceiling_seconds == 0 {
        return Decimal::ZERO;
    }

    let end = virtual_lock_end(lock_start, lock_end, now, ceiling_days, perpetual_extension_days);
    let lock_duration = end.saturating_sub(lock_start);
    let time_since_start = now.saturating_sub(lock_start);

    let ceiling = Decimal::from(ceiling_seconds);
    let lock_ratio = Decimal::from(lock_duration) / ceiling;
    let time_ratio = Decimal::from(time_since_start) / ceiling;

    // Both ratios are individually non-negative; checked_add guards the
    // (theoretical) overflow of two huge ratios before the cap applies.
    let sum = lock_ratio.checked_add(time_ratio).unwrap_or(Decimal::ONE);
    clamp_unit_interval(sum)
}

/// Multiplier in [1, 2]
pub fn boost_multiplier(
    lock_start: u64,
    lock_end: u64,
    now: u64,
    ceiling_days: u32,
    perpetual_extension_days: Option<u32>,
) -> Decimal {
    Decimal::ONE + combined_ratio(lock_start, lock_end, now, ceiling_days, perpetual_extension_days)
}

/// Time-decayed boosted amount of one locked deposit
///
/// Never less than the (non-negative) principal; equals it exactly when the
/// ceiling is zero.
pub fn boosted_amount(
    amount: Decimal,
    lock_start: u64,
    lock_end: u64,
    now: u64,
    ceiling_days: u32,
    perpetual_extension_days: Option<u32>,
) -> Decimal {
    let amount = clamp_non_negative(amount);
    if ceiling_days == 0 {
        return amount;
    }

    let multiplier = boost_multiplier(lock_start, lock_end, now, ceiling_days, perpetual_extension_days);
    // Only a principal near Decimal::MAX can overflow; fall back to no boost
    amount.checked_mul(multiplier).unwrap_or(amount)
}
