//! Boost Oracle Integration
//!
//! Reads the authoritative headline boost ratio for a user. The oracle
//! answers with a decimal string so the ratio crosses the canister boundary
//! without binary rounding.

use candid::Principal;
use rust_decimal::Decimal;
use ic_cdk::call::Call;
use super::{decode_reply, BoostOracle};
use crate::infrastructure::{parse_decimal, BoostError, QueryError, Result};

pub struct IcBoostOracle {
    canister: Principal,
    timeout_seconds: u32,
}

impl IcBoostOracle {
    pub fn new(canister: Principal, timeout_seconds: u32) -> Self {
        Self { canister, timeout_seconds }
    }
}

impl BoostOracle for IcBoostOracle {
    async fn get_total_boost(&self, user: Principal) -> Result<Decimal> {
        let reply = Call::bounded_wait(self.canister, "get_total_boost")
            .with_arg(&user)
            .change_timeout(self.timeout_seconds)
            .await;
        let ratio: String = decode_reply(&self.canister, "get_total_boost", reply)?;

        parse_decimal(&ratio).map_err(|e| {
            BoostError::Query(QueryError::MalformedResponse {
                method: "get_total_boost".to_string(),
                reason: e.to_string(),
            })
        })
    }
}
