//! Stable storage management for upgrade persistence
//!
//! Only the engine configuration survives an upgrade. Breakdowns are
//! recomputed on demand and the cache starts empty.

use candid::{CandidType, Deserialize};
use crate::infrastructure::config::EngineConfig;

#[derive(CandidType, Deserialize, Default)]
pub struct StableState {
    pub engine_config: Option<EngineConfig>,
}

pub fn save_state(engine_config: EngineConfig) {
    let state = StableState { engine_config: Some(engine_config) };

    // A failed save must not trap the upgrade; the canister falls back to
    // the default config and a controller can re-apply it.
    match ic_cdk::storage::stable_save((state,)) {
        Ok(_) => crate::log!("💾 Saved engine config to stable memory"),
        Err(e) => crate::log!("⚠️ WARNING: Failed to save engine config to stable memory: {}", e),
    }
}

pub fn restore_state() -> Option<EngineConfig> {
    match ic_cdk::storage::stable_restore::<(StableState,)>() {
        Ok((state,)) => {
            crate::log!("✅ Restored engine config from stable storage");
            state.engine_config
        }
        Err(e) => {
            crate::log!("⚠️  No stable state to restore (first deployment or empty): {}", e);
            None
        }
    }
}
