// Wire types of the external ledgers and oracle (Candid)
use candid::{CandidType, Deserialize, Nat};

#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct LockedDepositRecord {
    pub amount: Nat,                 // base units
    pub lock_start: u64,
    pub lock_end: Option<u64>,
    pub is_locked: bool,
    pub perpetual_extension_days: Option<u32>,
}

// Ledger A: staking-style pool
#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct StakingPositionRecord {
    pub base_principal: Nat,
    pub accrued_rewards: Nat,
    pub locked_deposits: Vec<LockedDepositRecord>,
}

// Both ledgers expose the same config shape
#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct LedgerConfigRecord {
    pub lock_ceiling_days: i64,
}
