//! Shared types: engine domain model, ledger wire records, Candid replies

pub mod boost;
pub mod ledger;
pub mod reply;

pub use boost::{
    BoostBreakdown, BreakdownSource, BreakdownStatus, LockedDeposit, LockedDepositSummary,
    PoolConfig, PoolKind, PoolSummary,
};
