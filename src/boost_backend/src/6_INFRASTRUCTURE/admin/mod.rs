//! Admin Controls Module
//!
//! Controller gate for configuration endpoints and a bounded log of
//! admin actions (config changes, cache clears).

use candid::Principal;
use std::cell::RefCell;
use crate::infrastructure::{BoostError, Result, MAX_ADMIN_LOG_ENTRIES};

/// Require caller is a controller of this canister
pub fn require_controller() -> Result<()> {
    let caller = ic_cdk::api::msg_caller();

    if ic_cdk::api::is_controller(&caller) {
        Ok(())
    } else {
        Err(BoostError::Unauthorized {
            principal: caller.to_text(),
        })
    }
}

/// Admin action log entry
#[derive(Clone, Debug, candid::CandidType, candid::Deserialize, serde::Serialize)]
pub struct AdminAction {
    pub timestamp: u64,
    pub admin: Principal,
    pub action: String,
}

thread_local! {
    static ADMIN_LOG: RefCell<Vec<AdminAction>> = RefCell::new(Vec::new());
}

/// Log an admin action performed by the current caller
pub fn log_admin_action(action: String) {
    let admin = ic_cdk::api::msg_caller();
    record_admin_action(admin, action.clone(), ic_cdk::api::time());
    crate::log!("📝 Admin action: {} by {}", action, admin);
}

fn record_admin_action(admin: Principal, action: String, timestamp: u64) {
    ADMIN_LOG.with(|log| {
        let mut log = log.borrow_mut();
        log.push(AdminAction { timestamp, admin, action });

        let len = log.len();
        if len > MAX_ADMIN_LOG_ENTRIES {
            log.drain(0..(len - MAX_ADMIN_LOG_ENTRIES));
        }
    });
}

/// Get admin action log
pub fn get_admin_log() -> Vec<AdminAction> {
    ADMIN_LOG.with(|log| log.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_log_is_bounded() {
        let admin = Principal::anonymous();
        for i in 0..(MAX_ADMIN_LOG_ENTRIES + 5) {
            record_admin_action(admin, format!("action {}", i), i as u64);
        }

        let log = get_admin_log();
        assert_eq!(log.len(), MAX_ADMIN_LOG_ENTRIES);
        // Oldest entries are dropped first
        assert_eq!(log[0].action, "action 5");
        assert_eq!(log.last().unwrap().timestamp, (MAX_ADMIN_LOG_ENTRIES + 4) as u64);
    }
}
