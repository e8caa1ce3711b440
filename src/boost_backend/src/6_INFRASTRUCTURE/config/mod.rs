//! Runtime engine configuration
//!
//! Which canisters back each pool and the oracle, plus the per-query timeout
//! and cache freshness window. Economic parameters (lock ceiling) are NOT
//! configured here; each ledger reports its own.

use candid::{CandidType, Deserialize, Principal};
use serde::Serialize;
use std::cell::RefCell;
use crate::infrastructure::errors::{Result, ValidationError};
use crate::infrastructure::constants::*;

/// One ledger endpoint and how to read its amounts
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PoolEndpoint {
    pub canister: Principal,
    pub token_decimals: u8,
    /// Discount ledger only: amounts are shares and must be converted
    pub convert_shares: bool,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub staking_ledger: PoolEndpoint,
    pub discount_ledger: PoolEndpoint,
    pub boost_oracle: Principal,
    pub fetch_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staking_ledger: PoolEndpoint {
                canister: Principal::from_text(STAKING_LEDGER_ID).unwrap_or(Principal::anonymous()),
                token_decimals: DEFAULT_TOKEN_DECIMALS,
                convert_shares: false,
            },
            discount_ledger: PoolEndpoint {
                canister: Principal::from_text(DISCOUNT_LEDGER_ID).unwrap_or(Principal::anonymous()),
                token_decimals: DEFAULT_TOKEN_DECIMALS,
                convert_shares: true,
            },
            boost_oracle: Principal::from_text(BOOST_ORACLE_ID).unwrap_or(Principal::anonymous()),
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
            cache_ttl_seconds: CACHE_TTL_SECONDS,
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        for (field, endpoint) in [
            ("staking_ledger", &self.staking_ledger),
            ("discount_ledger", &self.discount_ledger),
        ] {
            if endpoint.canister == Principal::anonymous() {
                return Err(ValidationError::InvalidPrincipal {
                    principal: format!("{}: {}", field, endpoint.canister.to_text()),
                }.into());
            }
            if endpoint.token_decimals > MAX_TOKEN_DECIMALS {
                return Err(ValidationError::InvalidConfig {
                    field: format!("{}.token_decimals", field),
                    reason: format!("{} exceeds maximum of {}", endpoint.token_decimals, MAX_TOKEN_DECIMALS),
                }.into());
            }
        }

        if self.boost_oracle == Principal::anonymous() {
            return Err(ValidationError::InvalidPrincipal {
                principal: format!("boost_oracle: {}", self.boost_oracle.to_text()),
            }.into());
        }

        if self.fetch_timeout_seconds == 0 || self.fetch_timeout_seconds > MAX_FETCH_TIMEOUT_SECONDS {
            return Err(ValidationError::InvalidConfig {
                field: "fetch_timeout_seconds".to_string(),
                reason: format!("must be within 1..={}", MAX_FETCH_TIMEOUT_SECONDS),
            }.into());
        }

        if self.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(ValidationError::InvalidConfig {
                field: "cache_ttl_seconds".to_string(),
                reason: format!("must not exceed {}", MAX_CACHE_TTL_SECONDS),
            }.into());
        }

        Ok(())
    }

    /// Identity of the backing endpoints; cached breakdowns are only valid
    /// for the fingerprint they were computed under
    pub fn endpoint_fingerprint(&self) -> String {
        format!(
            "{}:{}:{}|{}:{}:{}|{}",
            self.staking_ledger.canister.to_text(),
            self.staking_ledger.token_decimals,
            self.staking_ledger.convert_shares,
            self.discount_ledger.canister.to_text(),
            self.discount_ledger.token_decimals,
            self.discount_ledger.convert_shares,
            self.boost_oracle.to_text(),
        )
    }
}

thread_local! {
    static ENGINE_CONFIG: RefCell<EngineConfig> = RefCell::new(EngineConfig::default());
}

pub fn get_engine_config() -> EngineConfig {
    ENGINE_CONFIG.with(|c| c.borrow().clone())
}

/// Validate and install a new config
///
/// Returns true when the backing endpoints changed, so the caller can drop
/// cached breakdowns.
pub fn set_engine_config(config: EngineConfig) -> Result<bool> {
    config.validate()?;
    let endpoints_changed = ENGINE_CONFIG.with(|c| {
        let mut current = c.borrow_mut();
        let changed = current.endpoint_fingerprint() != config.endpoint_fingerprint();
        *current = config;
        changed
    });
    Ok(endpoints_changed)
}
