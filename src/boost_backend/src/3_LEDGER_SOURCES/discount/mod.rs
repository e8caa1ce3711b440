//! Discount Ledger Integration (ledger B)
//!
//! Queries the discount-tier ledger for total deposits, locked tranches and
//! the lock ceiling. Amounts on this ledger may be vault shares; when the
//! endpoint has `convert_shares` set, they are translated to principal with
//! the ledger's `convert_to_assets` before any boost is applied.

use candid::{Nat, Principal};
use rust_decimal::Decimal;
use ic_cdk::call::Call;
use super::{decode_reply, deposits_from_records, one_unit, DiscountLedger, PoolSource};
use crate::_2_POOL_AGGREGATION::PoolSnapshot;
use crate::infrastructure::{clamp_non_negative, nat_to_decimal, CalculationError, PoolEndpoint, Result};
use crate::types::ledger::{LedgerConfigRecord, LockedDepositRecord};
use crate::types::{LockedDeposit, PoolConfig, PoolKind};

/// Inter-canister client for ledger B
pub struct IcDiscountLedger {
    endpoint: PoolEndpoint,
    timeout_seconds: u32,
}

impl IcDiscountLedger {
    pub fn new(endpoint: PoolEndpoint, timeout_seconds: u32) -> Self {
        Self { endpoint, timeout_seconds }
    }
}

impl DiscountLedger for IcDiscountLedger {
    async fn get_total_deposits(&self, user: Principal) -> Result<Decimal> {
        let canister = self.endpoint.canister;
        let reply = Call::bounded_wait(canister, "get_total_deposits")
            .with_arg(&user)
            .change_timeout(self.timeout_seconds)
            .await;
        let total: Nat = decode_reply(&canister, "get_total_deposits", reply)?;

        nat_to_decimal(&total, self.endpoint.token_decimals)
    }

    async fn get_locked_deposits(&self, user: Principal) -> Result<Vec<LockedDeposit>> {
        let canister = self.endpoint.canister;
        let reply = Call::bounded_wait(canister, "get_locked_deposits")
            .with_arg(&user)
            .change_timeout(self.timeout_seconds)
            .await;
        let records: Vec<LockedDepositRecord> = decode_reply(&canister, "get_locked_deposits", reply)?;

        Ok(deposits_from_records(records, self.endpoint.token_decimals, "discount"))
    }

    async fn get_config(&self) -> Result<PoolConfig> {
        let canister = self.endpoint.canister;
        let reply = Call::bounded_wait(canister, "get_config")
            .change_timeout(self.timeout_seconds)
            .await;
        let config: LedgerConfigRecord = decode_reply(&canister, "get_config", reply)?;

        Ok(PoolConfig::from_raw_ceiling(config.lock_ceiling_days))
    }

    async fn principal_per_share(&self) -> Result<Option<Decimal>> {
        if !self.endpoint.convert_shares {
            return Ok(None);
        }

        let canister = self.endpoint.canister;
        let decimals = self.endpoint.token_decimals;
        // Value of exactly one share, returned in base units
        let reply = Call::bounded_wait(canister, "convert_to_assets")
            .with_arg(&one_unit(decimals))
            .change_timeout(self.timeout_seconds)
            .await;
        let assets: Nat = decode_reply(&canister, "convert_to_assets", reply)?;

        Ok(Some(nat_to_decimal(&assets, decimals)?))
    }
}

/// Ledger B as a pool source
pub struct DiscountPool<L> {
    ledger: L,
}

impl<L: DiscountLedger> DiscountPool<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }
}

fn to_principal(shares: Decimal, price: Decimal) -> Result<Decimal> {
    shares.checked_mul(price).ok_or_else(|| {
        CalculationError::Overflow {
            operation: format!("{} shares × {} principal/share", shares, price),
        }
        .into()
    })
}

impl<L: DiscountLedger> PoolSource for DiscountPool<L> {
    fn kind(&self) -> PoolKind {
        PoolKind::Discount
    }

    async fn fetch_snapshot(&self, user: Principal) -> Result<PoolSnapshot> {
        let (mut base_amount, mut deposits, config, price) = futures::try_join!(
            self.ledger.get_total_deposits(user),
            self.ledger.get_locked_deposits(user),
            self.ledger.get_config(),
            self.ledger.principal_per_share(),
        )?;

        if let Some(price) = price {
            let price = clamp_non_negative(price);
            base_amount = to_principal(base_amount, price)?;
            for deposit in deposits.iter_mut() {
                deposit.amount = to_principal(deposit.amount, price)?;
            }
            crate::log!("  discount: converted shares at {} principal/share", price);
        }

        crate::log!(
            "  discount: base {}, {} locked records, ceiling {}d",
            base_amount,
            deposits.len(),
            config.lock_ceiling_days
        );

        Ok(PoolSnapshot {
            base_amount,
            deposits,
            config,
        })
    }
}
