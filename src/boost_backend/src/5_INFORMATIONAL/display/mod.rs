//! Display module - boost breakdown formatting for UI
//!
//! Entry points behind the canister's query/update methods. Breakdowns are
//! served from the cache while fresh; everything else is computed by the
//! combiner against the currently configured ledgers.

use candid::Principal;
use rust_decimal::Decimal;
use crate::_1_BOOST_FORMULA::{boosted_amount, combined_ratio};
use crate::_4_BREAKDOWN::IcBreakdownCombiner;
use crate::_5_INFORMATIONAL::cache::{self, CacheKey, ComputingGuard};
use crate::infrastructure::{
    clamp_non_negative, get_engine_config, parse_decimal, Result, ValidationError, NANOS_PER_SECOND,
};
use crate::types::reply::{decimal_text, BoostBreakdownReply, PreviewReply, PreviewRequest};
use crate::types::{BreakdownStatus, PoolConfig};

/// Current canister time in unix seconds
pub fn now_seconds() -> u64 {
    ic_cdk::api::time() / NANOS_PER_SECOND
}

/// Breakdown for `user`, cached for the configured freshness window
///
/// `force_refresh` skips the cache lookup (the fresh result is still stored).
pub async fn get_boost_breakdown(user: Principal, force_refresh: bool) -> BoostBreakdownReply {
    let config = get_engine_config();
    let now = now_seconds();
    let key = CacheKey::new(user, config.endpoint_fingerprint());

    if !force_refresh {
        if let Some(cached) = cache::lookup(&key, now) {
            crate::log!("⚡ Serving cached breakdown for {} (computed at {})", user, cached.computed_at);
            return BoostBreakdownReply::from_breakdown(&cached, true);
        }
    }

    let _guard = ComputingGuard::begin(user);
    let breakdown = IcBreakdownCombiner::from_config(&config).compute(user, now).await;

    // Endpoints may have been reconfigured while the queries were in flight
    if get_engine_config().endpoint_fingerprint() == key.endpoints {
        cache::store(key, breakdown.clone(), now);
    }

    BoostBreakdownReply::from_breakdown(&breakdown, false)
}

/// Lightweight status for polling clients
pub fn get_breakdown_status(user: Principal) -> BreakdownStatus {
    if user == Principal::anonymous() {
        return BreakdownStatus::Pending;
    }
    if cache::is_computing(&user) {
        return BreakdownStatus::Computing;
    }

    let key = CacheKey::new(user, get_engine_config().endpoint_fingerprint());
    cache::peek_status(&key, now_seconds()).unwrap_or(BreakdownStatus::Pending)
}

/// Value one hypothetical deposit with the boost formula
pub fn preview_boost(request: &PreviewRequest, now: u64) -> Result<PreviewReply> {
    let amount = parse_decimal(&request.amount)?;
    if amount < Decimal::ZERO {
        return Err(ValidationError::InvalidAmount {
            amount: request.amount.clone(),
            reason: "amount must not be negative".to_string(),
        }.into());
    }

    let at = request.at_time.unwrap_or(now);
    let config = PoolConfig::from_raw_ceiling(request.lock_ceiling_days);

    let ratio = combined_ratio(
        request.lock_start,
        request.lock_end,
        at,
        config.lock_ceiling_days,
        request.perpetual_extension_days,
    );
    let boosted = boosted_amount(
        amount,
        request.lock_start,
        request.lock_end,
        at,
        config.lock_ceiling_days,
        request.perpetual_extension_days,
    );

    // An overflowing boost falls back to the bare amount; report what was applied
    let ratio = if !amount.is_zero() && boosted == amount { Decimal::ZERO } else { ratio };

    Ok(PreviewReply {
        boosted_amount: decimal_text(&boosted),
        boost_amount: decimal_text(&clamp_non_negative(boosted - amount)),
        multiplier: decimal_text(&(Decimal::ONE + ratio)),
        combined_ratio: decimal_text(&ratio),
    })
}
