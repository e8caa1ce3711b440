//! System-wide constants

/// Seconds in one day; lock ceilings and extensions are configured in days
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Nanoseconds per second (`ic_cdk::api::time()` is in nanoseconds)
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Default bound on each ledger / oracle query
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 10;

/// Upper bound accepted for a configured fetch timeout
pub const MAX_FETCH_TIMEOUT_SECONDS: u64 = 120;

/// Freshness window for memoised breakdowns (2 minutes)
pub const CACHE_TTL_SECONDS: u64 = 120;

/// Upper bound accepted for a configured cache TTL
pub const MAX_CACHE_TTL_SECONDS: u64 = 3_600;

/// Maximum number of cached breakdowns kept at once
pub const MAX_CACHE_ENTRIES: usize = 10_000;

/// Interval of the cache sweep timer
pub const CACHE_SWEEP_INTERVAL_SECONDS: u64 = 3_600;

/// rust_decimal supports at most 28 fractional digits
pub const MAX_TOKEN_DECIMALS: u8 = 28;

/// Default ledger token decimals (e8, ICRC convention)
pub const DEFAULT_TOKEN_DECIMALS: u8 = 8;

/// Keep only the most recent admin actions
pub const MAX_ADMIN_LOG_ENTRIES: usize = 1000;

// Mainnet collaborators (overridable through EngineConfig)
pub const STAKING_LEDGER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";
pub const DISCOUNT_LEDGER_ID: &str = "mxzaz-hqaaa-aaaar-qaada-cai";
pub const BOOST_ORACLE_ID: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";
