// Candid replies for the presentation layer
// Every monetary field is a decimal string so no precision is lost in transit.
use candid::{CandidType, Deserialize};
use rust_decimal::Decimal;
use serde::Serialize;
use super::boost::{BoostBreakdown, BreakdownSource, BreakdownStatus, LockedDepositSummary, PoolSummary};

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LockedDepositReply {
    pub amount: String,
    pub lock_end: u64,
    pub days_remaining: u64,
    pub boost_amount: String,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PoolSummaryReply {
    pub base_amount: String,
    pub locked_deposits: Vec<LockedDepositReply>,
    pub effective_amount: String,
    pub skipped_deposits: u32,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BoostBreakdownReply {
    pub total_boost_ratio: String,
    pub staking: PoolSummaryReply,
    pub discount: PoolSummaryReply,
    pub status: BreakdownStatus,
    pub degraded: Vec<BreakdownSource>,
    pub computed_at: u64,
    pub cached: bool,
}

// What-if query for a single hypothetical deposit
#[derive(CandidType, Deserialize, Serialize, Debug, Clone)]
pub struct PreviewRequest {
    pub amount: String,
    pub lock_start: u64,
    pub lock_end: u64,
    pub lock_ceiling_days: i64,
    pub perpetual_extension_days: Option<u32>,
    pub at_time: Option<u64>,        // defaults to now
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PreviewReply {
    pub boosted_amount: String,
    pub boost_amount: String,
    pub multiplier: String,
    pub combined_ratio: String,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub ttl_seconds: u64,
}

pub fn decimal_text(value: &Decimal) -> String {
    value.normalize().to_string()
}

impl From<&LockedDepositSummary> for LockedDepositReply {
    fn from(d: &LockedDepositSummary) -> Self {
        Self {
            amount: decimal_text(&d.amount),
            lock_end: d.lock_end,
            days_remaining: d.days_remaining,
            boost_amount: decimal_text(&d.boost_amount),
        }
    }
}

impl From<&PoolSummary> for PoolSummaryReply {
    fn from(p: &PoolSummary) -> Self {
        Self {
            base_amount: decimal_text(&p.base_amount),
            locked_deposits: p.locked_deposits.iter().map(LockedDepositReply::from).collect(),
            effective_amount: decimal_text(&p.effective_amount),
            skipped_deposits: p.skipped_deposits,
        }
    }
}

impl BoostBreakdownReply {
    pub fn from_breakdown(breakdown: &BoostBreakdown, cached: bool) -> Self {
        Self {
            total_boost_ratio: decimal_text(&breakdown.total_boost_ratio),
            staking: PoolSummaryReply::from(&breakdown.staking),
            discount: PoolSummaryReply::from(&breakdown.discount),
            status: breakdown.status,
            degraded: breakdown.degraded.clone(),
            computed_at: breakdown.computed_at,
            cached,
        }
    }
}
