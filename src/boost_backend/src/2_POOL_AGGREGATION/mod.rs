//! # Pool Aggregation
//!
//! Sums a pool's base balance with the boost increments of its active
//! locked deposits. One aggregation path serves every pool; the pool only
//! decides where its base balance, deposits and ceiling come from.
//!
//! ## Deposit classification
//! - **Unlocked**: liquid tranche, already inside `base_amount` - ignored
//! - **Malformed**: locked without an end time - skipped and counted
//! - **Expired**: `lock_end <= now` - principal already in base, no boost
//! - **Active**: valued through the boost formula
//!
//! Invariant: `effective_amount == base_amount + Σ boost_amount`. A sum that
//! does not fit a `Decimal` is an error for the pool, never a panic.

use rust_decimal::Decimal;
use crate::_1_BOOST_FORMULA::boosted_amount;
use crate::infrastructure::{clamp_non_negative, CalculationError, Result, SECONDS_PER_DAY};
use crate::types::{LockedDeposit, LockedDepositSummary, PoolConfig, PoolSummary};

/// Everything a pool source hands to the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub base_amount: Decimal,
    pub deposits: Vec<LockedDeposit>,
    pub config: PoolConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositClass {
    Unlocked,
    Malformed,
    Expired,
    Active { lock_end: u64 },
}

pub fn classify_deposit(deposit: &LockedDeposit, now: u64) -> DepositClass {
    if !deposit.is_locked {
        return DepositClass::Unlocked;
    }

    match deposit.lock_end {
        None => DepositClass::Malformed,
        Some(lock_end) if lock_end <= now => DepositClass::Expired,
        Some(lock_end) => DepositClass::Active { lock_end },
    }
}

/// Aggregate one pool
pub fn aggregate_pool(
    base_amount: Decimal,
    deposits: &[LockedDeposit],
    config: &PoolConfig,
    now: u64,
) -> Result<PoolSummary> {
    let base_amount = clamp_non_negative(base_amount);
    let mut locked_deposits = Vec::new();
    let mut skipped_deposits = 0u32;

    for deposit in deposits {
        let lock_end = match classify_deposit(deposit, now) {
            DepositClass::Active { lock_end } => lock_end,
            DepositClass::Malformed => {
                crate::log!(
                    "  ⚠️  Skipping malformed deposit (locked, no lock_end): amount {} start {}",
                    deposit.amount,
                    deposit.lock_start
                );
                skipped_deposits = skipped_deposits.saturating_add(1);
                continue;
            }
            DepositClass::Unlocked | DepositClass::Expired => continue,
        };

        let amount = clamp_non_negative(deposit.amount);
        let boosted = boosted_amount(
            amount,
            deposit.lock_start,
            lock_end,
            now,
            config.lock_ceiling_days,
            deposit.perpetual_extension_days,
        );
        // boosted >= amount, the clamp only documents the invariant
        let boost_amount = clamp_non_negative(boosted - amount);

        locked_deposits.push(LockedDepositSummary {
            amount,
            lock_end,
            days_remaining: (lock_end - now) / SECONDS_PER_DAY,
            boost_amount,
        });
    }

    // Ledger amounts may sit near Decimal::MAX; an overflow fails this pool only
    let effective_amount = locked_deposits
        .iter()
        .try_fold(base_amount, |acc, d| acc.checked_add(d.boost_amount))
        .ok_or_else(|| CalculationError::Overflow {
            operation: format!(
                "pool effective amount (base {} + {} boosted deposits)",
                base_amount,
                locked_deposits.len()
            ),
        })?;

    Ok(PoolSummary {
        base_amount,
        effective_amount,
        locked_deposits,
        skipped_deposits,
    })
}

/// Aggregate a fetched snapshot
pub fn aggregate_snapshot(snapshot: &PoolSnapshot, now: u64) -> Result<PoolSummary> {
    aggregate_pool(snapshot.base_amount, &snapshot.deposits, &snapshot.config, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const DAY: u64 = 86_400;

    fn malformed(amount: Decimal) -> LockedDeposit {
        LockedDeposit {
            amount,
            lock_start: 0,
            lock_end: None,
            is_locked: true,
            perpetual_extension_days: None,
        }
    }

    #[test]
    fn test_single_active_deposit() {
        let deposits = vec![LockedDeposit::timed(dec!(1000), 0, 100 * DAY)];
        let summary = aggregate_pool(dec!(1000), &deposits, &PoolConfig::new(200), 0).unwrap();

        assert_eq!(summary.locked_deposits.len(), 1);
        assert_eq!(summary.locked_deposits[0].boost_amount, dec!(500));
        assert_eq!(summary.locked_deposits[0].days_remaining, 100);
        assert_eq!(summary.effective_amount, dec!(1500));
    }

    #[test]
    fn test_expired_deposit_contributes_nothing() {
        let deposits = vec![
            LockedDeposit::timed(dec!(400), 0, 10 * DAY),
            LockedDeposit::timed(dec!(600), 0, 30 * DAY),
        ];
        // exactly at the first lock's end: it is expired
        let summary = aggregate_pool(dec!(1000), &deposits, &PoolConfig::new(100), 10 * DAY).unwrap();

        assert_eq!(summary.locked_deposits.len(), 1);
        assert_eq!(summary.locked_deposits[0].amount, dec!(600));
        // lock 30/100 + time 10/100 = 0.4 → boost 240
        assert_eq!(summary.locked_deposits[0].boost_amount, dec!(240));
        assert_eq!(summary.effective_amount, dec!(1240));
    }

    #[test]
    fn test_malformed_deposit_skipped_rest_of_pool_kept() {
        let deposits = vec![
            malformed(dec!(50)),
            LockedDeposit::timed(dec!(100), 0, 50 * DAY),
        ];
        let summary = aggregate_pool(dec!(150), &deposits, &PoolConfig::new(100), 0).unwrap();

        assert_eq!(summary.skipped_deposits, 1);
        assert_eq!(summary.locked_deposits.len(), 1);
        assert_eq!(summary.effective_amount, dec!(200));
    }

    #[test]
    fn test_unlocked_records_ignored() {
        let mut liquid = LockedDeposit::timed(dec!(75), 0, 100 * DAY);
        liquid.is_locked = false;
        let summary = aggregate_pool(dec!(75), &[liquid], &PoolConfig::new(100), 0).unwrap();

        assert!(summary.locked_deposits.is_empty());
        assert_eq!(summary.skipped_deposits, 0);
        assert_eq!(summary.effective_amount, dec!(75));
    }

    #[test]
    fn test_days_remaining_floors() {
        let deposits = vec![LockedDeposit::timed(dec!(1), 0, 10 * DAY + DAY - 1)];
        let summary = aggregate_pool(Decimal::ZERO, &deposits, &PoolConfig::new(365), 0).unwrap();
        assert_eq!(summary.locked_deposits[0].days_remaining, 10);

        let summary = aggregate_pool(Decimal::ZERO, &deposits, &PoolConfig::new(365), 11 * DAY - 2).unwrap();
        assert_eq!(summary.locked_deposits[0].days_remaining, 0);
    }

    #[test]
    fn test_aggregation_identity_holds() {
        let deposits = vec![
            LockedDeposit::timed(dec!(0.1), 0, 7 * DAY),
            LockedDeposit::timed(dec!(0.2), DAY, 90 * DAY),
            LockedDeposit::perpetual(dec!(0.3), 0, 2 * DAY, 30),
            LockedDeposit::timed(dec!(12345.6789), 3 * DAY, 400 * DAY),
            LockedDeposit::timed(dec!(5), 0, DAY),
            malformed(dec!(9)),
        ];

        for now in [0, DAY, 5 * DAY, 60 * DAY, 500 * DAY] {
            let summary = aggregate_pool(dec!(20000), &deposits, &PoolConfig::new(365), now).unwrap();
            assert_eq!(summary.effective_amount, summary.base_amount + summary.total_boost().unwrap());
            assert!(summary.locked_deposits.iter().all(|d| d.boost_amount >= Decimal::ZERO));
            assert!(summary.locked_deposits.iter().all(|d| d.lock_end > now));
        }
    }

    #[test]
    fn test_repeated_aggregation_does_not_drift() {
        // 0.1 has no exact binary representation; decimal sums stay exact
        let deposits: Vec<_> = (0..1000)
            .map(|_| LockedDeposit::timed(dec!(0.1), 0, 100 * DAY))
            .collect();
        let summary = aggregate_pool(Decimal::ZERO, &deposits, &PoolConfig::new(200), 0).unwrap();
        assert_eq!(summary.effective_amount, dec!(50));
    }

    #[test]
    fn test_zero_ceiling_pool_has_no_boost() {
        let deposits = vec![LockedDeposit::timed(dec!(100), 0, 100 * DAY)];
        let summary = aggregate_pool(dec!(100), &deposits, &PoolConfig::from_raw_ceiling(-30), 0).unwrap();

        assert_eq!(summary.locked_deposits.len(), 1);
        assert_eq!(summary.locked_deposits[0].boost_amount, Decimal::ZERO);
        assert_eq!(summary.effective_amount, dec!(100));
    }

    #[test]
    fn test_negative_base_clamped() {
        let summary = aggregate_pool(dec!(-10), &[], &PoolConfig::new(100), 0).unwrap();
        assert_eq!(summary.base_amount, Decimal::ZERO);
        assert_eq!(summary.effective_amount, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_pool_is_an_error() {
        // each value fits a Decimal, their sum does not
        let deposits = vec![LockedDeposit::timed(dec!(50000000000000000000000000000), 0, 100 * DAY)];
        let result = aggregate_pool(dec!(70000000000000000000000000000), &deposits, &PoolConfig::new(200), 0);

        assert!(matches!(
            result,
            Err(crate::infrastructure::BoostError::Calculation(CalculationError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_base_at_decimal_max_without_boost_is_fine() {
        let summary = aggregate_pool(Decimal::MAX, &[], &PoolConfig::new(200), 0).unwrap();
        assert_eq!(summary.effective_amount, Decimal::MAX);
    }

    #[test]
    fn test_classify_deposit() {
        assert_eq!(classify_deposit(&malformed(dec!(1)), 0), DepositClass::Malformed);
        assert_eq!(
            classify_deposit(&LockedDeposit::timed(dec!(1), 0, 10), 10),
            DepositClass::Expired
        );
        assert_eq!(
            classify_deposit(&LockedDeposit::timed(dec!(1), 0, 10), 9),
            DepositClass::Active { lock_end: 10 }
        );
    }
}
