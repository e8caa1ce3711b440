use candid::{CandidType, Deserialize};
use rust_decimal::Decimal;
use serde::Serialize;

// One locked principal tranche as reported by a ledger (read-only here)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LockedDeposit {
    pub amount: Decimal,
    pub lock_start: u64,             // unix seconds
    pub lock_end: Option<u64>,       // None while locked = malformed record
    pub is_locked: bool,             // false = liquid, already part of base
    pub perpetual_extension_days: Option<u32>,
}

impl LockedDeposit {
    /// A plain time lock
    pub fn timed(amount: Decimal, lock_start: u64, lock_end: u64) -> Self {
        Self {
            amount,
            lock_start,
            lock_end: Some(lock_end),
            is_locked: true,
            perpetual_extension_days: None,
        }
    }

    /// An auto-renewing lock that always keeps `extension_days` ahead of now
    pub fn perpetual(amount: Decimal, lock_start: u64, lock_end: u64, extension_days: u32) -> Self {
        Self {
            perpetual_extension_days: Some(extension_days),
            ..Self::timed(amount, lock_start, lock_end)
        }
    }
}

/// Per-pool program parameters reported by the ledger
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub lock_ceiling_days: u32,
}

impl PoolConfig {
    pub fn new(lock_ceiling_days: u32) -> Self {
        Self { lock_ceiling_days }
    }

    /// Ledgers report the ceiling as a signed integer; negatives disable boosting
    pub fn from_raw_ceiling(raw_days: i64) -> Self {
        let clamped = raw_days.clamp(0, u32::MAX as i64) as u32;
        Self::new(clamped)
    }
}

// Per-deposit detail for display
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LockedDepositSummary {
    pub amount: Decimal,
    pub lock_end: u64,
    pub days_remaining: u64,
    pub boost_amount: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PoolSummary {
    pub base_amount: Decimal,
    pub locked_deposits: Vec<LockedDepositSummary>,
    pub effective_amount: Decimal,
    pub skipped_deposits: u32,       // malformed records left out of the boosted sum
}

impl PoolSummary {
    /// Degraded pool: what the presentation layer sees when a ledger is down
    pub fn zero() -> Self {
        Self {
            base_amount: Decimal::ZERO,
            locked_deposits: Vec::new(),
            effective_amount: Decimal::ZERO,
            skipped_deposits: 0,
        }
    }

    /// Sum of the boost increments; `None` if it does not fit a `Decimal`
    pub fn total_boost(&self) -> Option<Decimal> {
        self.locked_deposits
            .iter()
            .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.boost_amount))
    }

    /// Anything worth showing: a base balance or an active lock
    pub fn has_activity(&self) -> bool {
        !self.base_amount.is_zero() || !self.locked_deposits.is_empty()
    }
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Staking,
    Discount,
}

impl PoolKind {
    pub fn label(&self) -> &'static str {
        match self {
            PoolKind::Staking => "staking",
            PoolKind::Discount => "discount",
        }
    }
}

/// Collaborator that fell back to its default in a breakdown
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownSource {
    StakingPool,
    DiscountPool,
    BoostOracle,
}

impl From<PoolKind> for BreakdownSource {
    fn from(kind: PoolKind) -> Self {
        match kind {
            PoolKind::Staking => BreakdownSource::StakingPool,
            PoolKind::Discount => BreakdownSource::DiscountPool,
        }
    }
}

/// Conceptual lifecycle of one breakdown request. There is no failure state:
/// the engine always yields a best-effort structure.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownStatus {
    Pending,     // no user/session available
    Computing,
    Ready,
    Partial,     // at least one pool degraded to zero
    Empty,       // no balance and no locks in either pool
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BoostBreakdown {
    pub total_boost_ratio: Decimal,  // externally sourced headline figure
    pub staking: PoolSummary,
    pub discount: PoolSummary,
    pub status: BreakdownStatus,
    pub degraded: Vec<BreakdownSource>,
    pub computed_at: u64,            // unix seconds snapshot used for decay
}

impl BoostBreakdown {
    pub fn pending(now: u64) -> Self {
        Self {
            total_boost_ratio: Decimal::ZERO,
            staking: PoolSummary::zero(),
            discount: PoolSummary::zero(),
            status: BreakdownStatus::Pending,
            degraded: Vec::new(),
            computed_at: now,
        }
    }
}
