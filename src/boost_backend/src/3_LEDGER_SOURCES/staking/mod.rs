//! Staking Ledger Integration (ledger A)
//!
//! Queries the staking ledger for:
//! - A user's position: base principal, accrued rewards, locked tranches
//! - The program's lock ceiling
//!
//! Base amount for boosting is principal plus accrued rewards.

use candid::Principal;
use rust_decimal::Decimal;
use ic_cdk::call::Call;
use super::{decode_reply, deposits_from_records, PoolSource, StakingLedger};
use crate::_2_POOL_AGGREGATION::PoolSnapshot;
use crate::infrastructure::{nat_to_decimal, CalculationError, PoolEndpoint, Result};
use crate::types::ledger::{LedgerConfigRecord, StakingPositionRecord};
use crate::types::{LockedDeposit, PoolConfig, PoolKind};

/// Position in principal terms
#[derive(Debug, Clone, PartialEq)]
pub struct StakingPosition {
    pub base_principal: Decimal,
    pub accrued_rewards: Decimal,
    pub locked_deposits: Vec<LockedDeposit>,
}

/// Inter-canister client for ledger A
pub struct IcStakingLedger {
    endpoint: PoolEndpoint,
    timeout_seconds: u32,
}

impl IcStakingLedger {
    pub fn new(endpoint: PoolEndpoint, timeout_seconds: u32) -> Self {
        Self { endpoint, timeout_seconds }
    }
}

impl StakingLedger for IcStakingLedger {
    async fn get_position(&self, user: Principal) -> Result<StakingPosition> {
        let canister = self.endpoint.canister;
        let reply = Call::bounded_wait(canister, "get_position")
            .with_arg(&user)
            .change_timeout(self.timeout_seconds)
            .await;
        let record: StakingPositionRecord = decode_reply(&canister, "get_position", reply)?;

        let decimals = self.endpoint.token_decimals;
        Ok(StakingPosition {
            base_principal: nat_to_decimal(&record.base_principal, decimals)?,
            accrued_rewards: nat_to_decimal(&record.accrued_rewards, decimals)?,
            locked_deposits: deposits_from_records(record.locked_deposits, decimals, "staking"),
        })
    }

    async fn get_config(&self) -> Result<PoolConfig> {
        let canister = self.endpoint.canister;
        let reply = Call::bounded_wait(canister, "get_config")
            .change_timeout(self.timeout_seconds)
            .await;
        let config: LedgerConfigRecord = decode_reply(&canister, "get_config", reply)?;

        Ok(PoolConfig::from_raw_ceiling(config.lock_ceiling_days))
    }
}

/// Ledger A as a pool source
pub struct StakingPool<L> {
    ledger: L,
}

impl<L: StakingLedger> StakingPool<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }
}

impl<L: StakingLedger> PoolSource for StakingPool<L> {
    fn kind(&self) -> PoolKind {
        PoolKind::Staking
    }

    async fn fetch_snapshot(&self, user: Principal) -> Result<PoolSnapshot> {
        let (position, config) = futures::try_join!(
            self.ledger.get_position(user),
            self.ledger.get_config(),
        )?;

        let base_amount = position.base_principal
            .checked_add(position.accrued_rewards)
            .ok_or_else(|| CalculationError::Overflow {
                operation: format!(
                    "staking base {} + rewards {}",
                    position.base_principal, position.accrued_rewards
                ),
            })?;

        crate::log!(
            "  staking: base {} ({} principal + {} rewards), {} locked records, ceiling {}d",
            base_amount,
            position.base_principal,
            position.accrued_rewards,
            position.locked_deposits.len(),
            config.lock_ceiling_days
        );

        Ok(PoolSnapshot {
            base_amount,
            deposits: position.locked_deposits,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{BoostError, QueryError};
    use futures::executor::block_on;
    use rust_decimal_macros::dec;

    struct FixedLedger {
        position: Result<StakingPosition>,
        ceiling: i64,
    }

    impl StakingLedger for FixedLedger {
        async fn get_position(&self, _user: Principal) -> Result<StakingPosition> {
            self.position.clone()
        }

        async fn get_config(&self) -> Result<PoolConfig> {
            Ok(PoolConfig::from_raw_ceiling(self.ceiling))
        }
    }

    #[test]
    fn test_snapshot_adds_rewards_to_base() {
        let pool = StakingPool::new(FixedLedger {
            position: Ok(StakingPosition {
                base_principal: dec!(100),
                accrued_rewards: dec!(2.5),
                locked_deposits: vec![LockedDeposit::timed(dec!(40), 0, 86_400)],
            }),
            ceiling: 365,
        });

        let snapshot = block_on(pool.fetch_snapshot(Principal::anonymous())).unwrap();
        assert_eq!(snapshot.base_amount, dec!(102.5));
        assert_eq!(snapshot.deposits.len(), 1);
        assert_eq!(snapshot.config, PoolConfig::new(365));
        assert_eq!(pool.kind(), PoolKind::Staking);
    }

    #[test]
    fn test_ledger_error_propagates_to_caller() {
        let pool = StakingPool::new(FixedLedger {
            position: Err(BoostError::Query(QueryError::CanisterUnreachable {
                canister: "staking".to_string(),
                reason: "down".to_string(),
            })),
            ceiling: 365,
        });

        let result = block_on(pool.fetch_snapshot(Principal::anonymous()));
        assert!(matches!(result, Err(BoostError::Query(_))));
    }

    #[test]
    fn test_negative_ceiling_clamped() {
        let pool = StakingPool::new(FixedLedger {
            position: Ok(StakingPosition {
                base_principal: dec!(1),
                accrued_rewards: Decimal::ZERO,
                locked_deposits: Vec::new(),
            }),
            ceiling: -5,
        });

        let snapshot = block_on(pool.fetch_snapshot(Principal::anonymous())).unwrap();
        assert_eq!(snapshot.config.lock_ceiling_days, 0);
    }
}
