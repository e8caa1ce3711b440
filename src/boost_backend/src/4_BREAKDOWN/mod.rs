//! # Boost Breakdown
//!
//! Combines both pools and the headline oracle ratio into one
//! `BoostBreakdown`. This is the failure boundary of the engine: every
//! collaborator error or timeout is absorbed here and replaced by its
//! degraded default, so `compute` has no error path.
//!
//! ## Flow
//! 1. Anonymous caller → `Pending`, nothing is fetched
//! 2. Staking load, discount load and oracle read run concurrently
//!    (`futures::join!`), each under its own timeout
//! 3. Each successful snapshot goes through the one pool aggregator
//! 4. Failed or overflowing pool → `PoolSummary::zero()`, failed oracle → ratio 0
//! 5. Status: `Partial` if a pool degraded, `Empty` if both pools are
//!    idle, otherwise `Ready`

pub mod timeout;


use candid::Principal;
use rust_decimal::Decimal;
use std::time::Duration;
use crate::_2_POOL_AGGREGATION::aggregate_snapshot;
use crate::_3_LEDGER_SOURCES::{
    BoostOracle, DiscountPool, IcBoostOracle, IcDiscountLedger, IcStakingLedger, PoolSource, StakingPool,
};
use crate::infrastructure::{clamp_non_negative, EngineConfig};
use crate::types::{BoostBreakdown, BreakdownSource, BreakdownStatus, PoolSummary};
use timeout::{bounded_wait_seconds, with_timeout, CallDeadline, Delay};

pub struct BreakdownCombiner<S, D, O, T> {
    staking: S,
    discount: D,
    oracle: O,
    delay: T,
    fetch_timeout: Duration,
}

/// Production wiring: IC ledger clients making bounded-wait calls
pub type IcBreakdownCombiner = BreakdownCombiner<
    StakingPool<IcStakingLedger>,
    DiscountPool<IcDiscountLedger>,
    IcBoostOracle,
    CallDeadline,
>;

impl IcBreakdownCombiner {
    pub fn from_config(config: &EngineConfig) -> Self {
        let fetch_timeout = Duration::from_secs(config.fetch_timeout_seconds);
        let call_timeout = bounded_wait_seconds(fetch_timeout);

        BreakdownCombiner::new(
            StakingPool::new(IcStakingLedger::new(config.staking_ledger.clone(), call_timeout)),
            DiscountPool::new(IcDiscountLedger::new(config.discount_ledger.clone(), call_timeout)),
            IcBoostOracle::new(config.boost_oracle, call_timeout),
            CallDeadline,
            fetch_timeout,
        )
    }
}

impl<S, D, O, T> BreakdownCombiner<S, D, O, T>
where
    S: PoolSource,
    D: PoolSource,
    O: BoostOracle,
    T: Delay,
{
    pub fn new(staking: S, discount: D, oracle: O, delay: T, fetch_timeout: Duration) -> Self {
        Self { staking, discount, oracle, delay, fetch_timeout }
    }

    /// Best-effort breakdown for `user` valued at unix time `now`
    pub async fn compute(&self, user: Principal, now: u64) -> BoostBreakdown {
        if user == Principal::anonymous() {
            crate::log!("⏸️  No user session, breakdown pending");
            return BoostBreakdown::pending(now);
        }

        crate::log!("📊 Computing boost breakdown for {} at {}", user, now);

        let (staking, discount, total_boost_ratio) = futures::join!(
            self.load_pool(&self.staking, user, now),
            self.load_pool(&self.discount, user, now),
            self.load_total_boost(user),
        );

        let mut degraded = Vec::new();
        let staking = staking.unwrap_or_else(|| {
            degraded.push(BreakdownSource::from(self.staking.kind()));
            PoolSummary::zero()
        });
        let discount = discount.unwrap_or_else(|| {
            degraded.push(BreakdownSource::from(self.discount.kind()));
            PoolSummary::zero()
        });
        let total_boost_ratio = total_boost_ratio.unwrap_or_else(|| {
            degraded.push(BreakdownSource::BoostOracle);
            Decimal::ZERO
        });

        let status = resolve_status(&staking, &discount, &degraded);

        crate::log!(
            "✅ Breakdown {:?}: staking {} / discount {} effective, ratio {}",
            status,
            staking.effective_amount,
            discount.effective_amount,
            total_boost_ratio
        );

        BoostBreakdown {
            total_boost_ratio,
            staking,
            discount,
            status,
            degraded,
            computed_at: now,
        }
    }

    /// Fetch and aggregate one pool; `None` means the pool degraded
    async fn load_pool<P: PoolSource>(&self, source: &P, user: Principal, now: u64) -> Option<PoolSummary> {
        let kind = source.kind();
        let label = format!("{}.fetch_snapshot", kind.label());

        let summary = with_timeout(source.fetch_snapshot(user), &self.delay, self.fetch_timeout, &label)
            .await
            .and_then(|snapshot| aggregate_snapshot(&snapshot, now));

        match summary {
            Ok(summary) => Some(summary),
            Err(e) => {
                crate::log!("  ⚠️  {} pool degraded to zero: {}", kind.label(), e);
                None
            }
        }
    }

    /// Headline ratio; `None` means the oracle was unavailable
    async fn load_total_boost(&self, user: Principal) -> Option<Decimal> {
        let read = self.oracle.get_total_boost(user);
        match with_timeout(read, &self.delay, self.fetch_timeout, "oracle.get_total_boost").await {
            Ok(ratio) => Some(clamp_non_negative(ratio)),
            Err(e) => {
                crate::log!("  ⚠️  Boost oracle unavailable, ratio defaults to 0: {}", e);
                None
            }
        }
    }
}

/// Final state of a computed breakdown
pub fn resolve_status(
    staking: &PoolSummary,
    discount: &PoolSummary,
    degraded: &[BreakdownSource],
) -> BreakdownStatus {
    let pool_degraded = degraded
        .iter()
        .any(|s| matches!(s, BreakdownSource::StakingPool | BreakdownSource::DiscountPool));

    if pool_degraded {
        BreakdownStatus::Partial
    } else if !staking.has_activity() && !discount.has_activity() {
        BreakdownStatus::Empty
    } else {
        BreakdownStatus::Ready
    }
}
