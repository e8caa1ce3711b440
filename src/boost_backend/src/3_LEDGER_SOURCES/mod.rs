//! # Ledger Sources
//!
//! Read-only collaborators of the engine and the seams where they plug in.
//!
//! ## Architecture
//!
//! ### staking/
//! Ledger A. One `get_position` call returns base principal, accrued
//! rewards and the locked tranches.
//!
//! ### discount/
//! Ledger B. Deposits and locks come from separate calls and may be
//! denominated in shares that need converting to principal.
//!
//! ### oracle/
//! Headline total-boost ratio. Shown as-is, never recomputed here.
//!
//! Every IC client call is `Call::bounded_wait` with the configured fetch
//! timeout, so a silent ledger is rejected by the replica instead of holding
//! the breakdown open.
//!
//! Each ledger is a trait so the combiner can be driven by the IC clients in
//! production and by in-memory ledgers under test. `StakingPool` and
//! `DiscountPool` turn a ledger into a `PoolSource`, the single shape the
//! aggregator consumes.

pub mod staking;
pub mod discount;
pub mod oracle;

use candid::{CandidType, Deserialize, Nat, Principal};
use ic_cdk::call::{CallFailed, Response};
use rust_decimal::Decimal;
use crate::_2_POOL_AGGREGATION::PoolSnapshot;
use crate::infrastructure::{nat_to_decimal, BoostError, QueryError, Result};
use crate::types::ledger::LockedDepositRecord;
use crate::types::{LockedDeposit, PoolConfig, PoolKind};

pub use staking::{IcStakingLedger, StakingPool, StakingPosition};
pub use discount::{IcDiscountLedger, DiscountPool};
pub use oracle::IcBoostOracle;

/// Ledger A: staking-style pool
#[allow(async_fn_in_trait)]
pub trait StakingLedger {
    async fn get_position(&self, user: Principal) -> Result<StakingPosition>;
    async fn get_config(&self) -> Result<PoolConfig>;
}

/// Ledger B: discount-tier pool
#[allow(async_fn_in_trait)]
pub trait DiscountLedger {
    async fn get_total_deposits(&self, user: Principal) -> Result<Decimal>;
    async fn get_locked_deposits(&self, user: Principal) -> Result<Vec<LockedDeposit>>;
    async fn get_config(&self) -> Result<PoolConfig>;

    /// Principal value of one share unit; `None` when amounts already are principal
    async fn principal_per_share(&self) -> Result<Option<Decimal>> {
        Ok(None)
    }
}

/// Headline boost ratio oracle
#[allow(async_fn_in_trait)]
pub trait BoostOracle {
    async fn get_total_boost(&self, user: Principal) -> Result<Decimal>;
}

/// Anything that can produce one pool's aggregation input
#[allow(async_fn_in_trait)]
pub trait PoolSource {
    fn kind(&self) -> PoolKind;
    async fn fetch_snapshot(&self, user: Principal) -> Result<PoolSnapshot>;
}

/// Convert ledger deposit records, dropping the ones whose amount cannot be
/// represented (logged). A locked record without `lock_end` is kept as-is;
/// the aggregator counts it as malformed.
pub fn deposits_from_records(records: Vec<LockedDepositRecord>, decimals: u8, ledger: &str) -> Vec<LockedDeposit> {
    records
        .into_iter()
        .filter_map(|record| match nat_to_decimal(&record.amount, decimals) {
            Ok(amount) => Some(LockedDeposit {
                amount,
                lock_start: record.lock_start,
                lock_end: record.lock_end,
                is_locked: record.is_locked,
                perpetual_extension_days: record.perpetual_extension_days,
            }),
            Err(e) => {
                crate::log!("  ⚠️  {}: dropping deposit with unreadable amount {}: {}", ledger, record.amount, e);
                None
            }
        })
        .collect()
}

/// Decode a bounded-wait reply into the query taxonomy
///
/// A reject (an elapsed call timeout included) means the canister could not
/// answer; a payload of the wrong shape is a malformed response.
pub(crate) fn decode_reply<R>(
    canister: &Principal,
    method: &str,
    reply: std::result::Result<Response, CallFailed>,
) -> Result<R>
where
    R: CandidType + for<'de> Deserialize<'de>,
{
    let response = reply.map_err(|e| {
        crate::log!("Failed to query {}.{}: {}", canister.to_text(), method, e);
        BoostError::Query(QueryError::CanisterUnreachable {
            canister: canister.to_text(),
            reason: format!("{}: {}", method, e),
        })
    })?;

    response.candid::<R>().map_err(|e| {
        BoostError::Query(QueryError::MalformedResponse {
            method: method.to_string(),
            reason: e.to_string(),
        })
    })
}

/// One whole share unit in base units (10^decimals)
pub(crate) fn one_unit(decimals: u8) -> Nat {
    Nat::from(10u128.pow(decimals as u32))
}
