//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod constants;
pub mod errors;
pub mod logging;
pub mod math;
pub mod config;
pub mod admin;
pub mod stable_storage;

// Re-export commonly used items
pub use constants::*;
pub use errors::{BoostError, Result, QueryError, ValidationError, CalculationError};
pub use math::{nat_to_decimal, clamp_non_negative, clamp_unit_interval, parse_decimal};
pub use config::{EngineConfig, PoolEndpoint, get_engine_config, set_engine_config};
pub use admin::{require_controller, log_admin_action, get_admin_log, AdminAction};
