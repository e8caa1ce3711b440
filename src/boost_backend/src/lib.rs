//! Boost Backend - Locked-deposit boost breakdowns with Numbered Zones
//!
//! Architecture:
//! 1_BOOST_FORMULA - Lock/time ratio and boosted amount (pure)
//! 2_POOL_AGGREGATION - One pool's deposits into a summary (pure)
//! 3_LEDGER_SOURCES - Staking ledger, discount ledger, boost oracle clients
//! 4_BREAKDOWN - Concurrent fetch, timeouts, degraded defaults
//! 5_INFORMATIONAL - Caching and display replies
//! 6_INFRASTRUCTURE - Constants, errors, logging, config, admin

#[path = "1_BOOST_FORMULA/mod.rs"]
mod boost_formula_1;
use boost_formula_1 as _1_BOOST_FORMULA;

#[path = "2_POOL_AGGREGATION/mod.rs"]
mod pool_aggregation_2;
use pool_aggregation_2 as _2_POOL_AGGREGATION;

#[path = "3_LEDGER_SOURCES/mod.rs"]
mod ledger_sources_3;
use ledger_sources_3 as _3_LEDGER_SOURCES;

#[path = "4_BREAKDOWN/mod.rs"]
mod breakdown_4;
use breakdown_4 as _4_BREAKDOWN;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

mod types;

use candid::{candid_method, Principal};
use ic_cdk::{init, post_upgrade, pre_upgrade, query, update};
use infrastructure::{AdminAction, EngineConfig, Result};
use types::reply::{BoostBreakdownReply, CacheStats, PreviewReply, PreviewRequest};
use types::BreakdownStatus;

// ===== PUBLIC API =====

/// Breakdown for the caller, served from cache while fresh
#[update]
#[candid_method(update)]
async fn get_boost_breakdown() -> BoostBreakdownReply {
    let caller = ic_cdk::api::msg_caller();
    _5_INFORMATIONAL::display::get_boost_breakdown(caller, false).await
}

#[update]
#[candid_method(update)]
async fn get_boost_breakdown_for(user: Principal) -> BoostBreakdownReply {
    _5_INFORMATIONAL::display::get_boost_breakdown(user, false).await
}

/// Recompute the caller's breakdown, ignoring any cached copy
#[update]
#[candid_method(update)]
async fn refresh_boost_breakdown() -> BoostBreakdownReply {
    let caller = ic_cdk::api::msg_caller();
    _5_INFORMATIONAL::display::get_boost_breakdown(caller, true).await
}

#[query]
#[candid_method(query)]
fn get_breakdown_status() -> BreakdownStatus {
    _5_INFORMATIONAL::display::get_breakdown_status(ic_cdk::api::msg_caller())
}

/// What-if valuation of one deposit; no ledger is queried
#[query]
#[candid_method(query)]
fn preview_boost(request: PreviewRequest) -> Result<PreviewReply> {
    let now = _5_INFORMATIONAL::display::now_seconds();
    _5_INFORMATIONAL::display::preview_boost(&request, now)
}

#[query]
#[candid_method(query)]
fn get_engine_config() -> EngineConfig {
    infrastructure::get_engine_config()
}

#[query]
#[candid_method(query)]
fn get_cache_stats() -> CacheStats {
    _5_INFORMATIONAL::cache::cache_stats()
}

// ===== ADMIN CONTROLS =====

#[update]
#[candid_method(update)]
fn set_engine_config(config: EngineConfig) -> Result<()> {
    infrastructure::require_controller()?;

    let ttl = config.cache_ttl_seconds;
    let endpoints_changed = infrastructure::set_engine_config(config)?;

    _5_INFORMATIONAL::cache::set_cache_ttl(ttl);
    if endpoints_changed {
        _5_INFORMATIONAL::cache::clear_all_caches();
    }

    infrastructure::log_admin_action(format!(
        "set_engine_config (endpoints changed: {}, cache ttl: {}s)",
        endpoints_changed, ttl
    ));
    Ok(())
}

#[update]
#[candid_method(update)]
fn clear_caches() -> Result<()> {
    infrastructure::require_controller()?;

    _5_INFORMATIONAL::cache::clear_all_caches();
    infrastructure::log_admin_action("clear_caches".to_string());
    Ok(())
}

#[query]
#[candid_method(query)]
fn get_admin_action_log() -> Result<Vec<AdminAction>> {
    infrastructure::require_controller()?;
    Ok(infrastructure::get_admin_log())
}

// ===== INITIALIZATION =====

#[init]
fn init(config: Option<EngineConfig>) {
    ic_cdk::println!("===================================");
    ic_cdk::println!("Boost Backend Initialized");
    ic_cdk::println!("===================================");

    if let Some(config) = config {
        if let Err(e) = infrastructure::set_engine_config(config) {
            // Keep the defaults rather than trap the install
            ic_cdk::println!("⚠️ Init config rejected, using defaults: {}", e);
        }
    }

    apply_runtime_config();
}

#[pre_upgrade]
fn pre_upgrade() {
    infrastructure::stable_storage::save_state(infrastructure::get_engine_config());
}

#[post_upgrade]
fn post_upgrade() {
    if let Some(config) = infrastructure::stable_storage::restore_state() {
        if let Err(e) = infrastructure::set_engine_config(config) {
            ic_cdk::println!("⚠️ Restored config rejected, using defaults: {}", e);
        }
    }

    apply_runtime_config();
    ic_cdk::println!("✅ Boost backend upgraded successfully");
}

// ===== HELPER FUNCTIONS =====

/// Push the active config into the cache and start the sweep timer
fn apply_runtime_config() {
    let config = infrastructure::get_engine_config();
    _5_INFORMATIONAL::cache::set_cache_ttl(config.cache_ttl_seconds);

    ic_cdk_timers::set_timer_interval(
        std::time::Duration::from_secs(infrastructure::CACHE_SWEEP_INTERVAL_SECONDS),
        || {
            let now = _5_INFORMATIONAL::display::now_seconds();
            let removed = _5_INFORMATIONAL::cache::sweep_expired(now);
            if removed > 0 {
                ic_cdk::println!("🧹 Periodic sweep: removed {} stale breakdowns", removed);
            }
        },
    );

    ic_cdk::println!(
        "⚙️ Staking {} / discount {} / oracle {}, timeout {}s, cache ttl {}s",
        config.staking_ledger.canister,
        config.discount_ledger.canister,
        config.boost_oracle,
        config.fetch_timeout_seconds,
        config.cache_ttl_seconds
    );
}

ic_cdk::export_candid!();
