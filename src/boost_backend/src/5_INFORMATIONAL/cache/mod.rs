//! Short-lived breakdown cache
//!
//! Keyed by user and the fingerprint of the backing endpoints, so a config
//! change can never serve a breakdown computed against other ledgers. Only
//! complete breakdowns are stored: a degraded one is recomputed on the next
//! request so a recovered ledger shows up immediately.
//!
//! The status of the last breakdown per key is remembered for the same
//! window even when the breakdown itself was not stored, so polling clients
//! see `Partial`. Also tracks which users have a computation in flight
//! (`Computing`).

use candid::Principal;
use std::cell::RefCell;
use std::collections::HashMap;
use crate::infrastructure::{CACHE_TTL_SECONDS, MAX_CACHE_ENTRIES};
use crate::types::reply::CacheStats;
use crate::types::{BoostBreakdown, BreakdownStatus};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user: Principal,
    pub endpoints: String,
}

impl CacheKey {
    pub fn new(user: Principal, endpoints: impl Into<String>) -> Self {
        Self { user, endpoints: endpoints.into() }
    }
}

#[derive(Debug, Clone)]
struct CachedBreakdown {
    breakdown: BoostBreakdown,
    stored_at: u64,
}

#[derive(Debug)]
pub struct BreakdownCache {
    entries: HashMap<CacheKey, CachedBreakdown>,
    last_status: HashMap<CacheKey, (BreakdownStatus, u64)>,
    ttl_seconds: u64,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl BreakdownCache {
    pub fn new(ttl_seconds: u64, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            last_status: HashMap::new(),
            ttl_seconds,
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    fn is_fresh(&self, entry: &CachedBreakdown, now: u64) -> bool {
        now.saturating_sub(entry.stored_at) < self.ttl_seconds
    }

    pub fn get(&mut self, key: &CacheKey, now: u64) -> Option<BoostBreakdown> {
        let fresh = self.entries.get(key).filter(|e| self.is_fresh(e, now)).map(|e| e.breakdown.clone());
        match fresh {
            Some(breakdown) => {
                self.hits += 1;
                Some(breakdown)
            }
            None => {
                self.misses += 1;
                self.entries.remove(key);
                None
            }
        }
    }

    /// Store a breakdown if it is worth reusing; returns whether it was stored
    ///
    /// Its status is recorded either way.
    pub fn insert(&mut self, key: CacheKey, breakdown: BoostBreakdown, now: u64) -> bool {
        self.record_status(&key, breakdown.status, now);

        if self.ttl_seconds == 0 || !is_cacheable(&breakdown) {
            return false;
        }

        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.purge_expired(now);
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        self.entries.insert(key, CachedBreakdown { breakdown, stored_at: now });
        true
    }

    fn record_status(&mut self, key: &CacheKey, status: BreakdownStatus, now: u64) {
        if self.last_status.len() >= self.max_entries && !self.last_status.contains_key(key) {
            let ttl = self.ttl_seconds;
            self.last_status.retain(|_, (_, at)| now.saturating_sub(*at) < ttl);
            if self.last_status.len() >= self.max_entries {
                let oldest = self.last_status
                    .iter()
                    .min_by_key(|(_, (_, at))| *at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    self.last_status.remove(&oldest);
                }
            }
        }
        self.last_status.insert(key.clone(), (status, now));
    }

    /// Status of the last breakdown for `key`, while still fresh
    pub fn status(&self, key: &CacheKey, now: u64) -> Option<BreakdownStatus> {
        self.last_status
            .get(key)
            .filter(|(_, at)| now.saturating_sub(*at) < self.ttl_seconds)
            .map(|(status, _)| *status)
    }

    /// Drop stale entries; returns how many breakdowns were removed
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let ttl = self.ttl_seconds;
        let before = self.entries.len();
        self.entries.retain(|_, e| now.saturating_sub(e.stored_at) < ttl);
        self.last_status.retain(|_, (_, at)| now.saturating_sub(*at) < ttl);
        before - self.entries.len()
    }

    fn evict_oldest(&mut self) {
        let oldest = self.entries
            .iter()
            .min_by_key(|(_, e)| e.stored_at)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_status.clear();
    }

    pub fn set_ttl(&mut self, ttl_seconds: u64) {
        self.ttl_seconds = ttl_seconds;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len() as u64,
            hits: self.hits,
            misses: self.misses,
            ttl_seconds: self.ttl_seconds,
        }
    }
}

/// Pending and degraded breakdowns are never reused
pub fn is_cacheable(breakdown: &BoostBreakdown) -> bool {
    breakdown.degraded.is_empty()
        && matches!(breakdown.status, BreakdownStatus::Ready | BreakdownStatus::Empty)
}

thread_local! {
    static BREAKDOWN_CACHE: RefCell<BreakdownCache> =
        RefCell::new(BreakdownCache::new(CACHE_TTL_SECONDS, MAX_CACHE_ENTRIES));

    // Concurrent requests for one user each hold a count
    static IN_FLIGHT: RefCell<HashMap<Principal, u32>> = RefCell::new(HashMap::new());
}

pub fn lookup(key: &CacheKey, now: u64) -> Option<BoostBreakdown> {
    BREAKDOWN_CACHE.with(|c| c.borrow_mut().get(key, now))
}

pub fn store(key: CacheKey, breakdown: BoostBreakdown, now: u64) -> bool {
    BREAKDOWN_CACHE.with(|c| c.borrow_mut().insert(key, breakdown, now))
}

/// Peek without touching hit/miss counters
pub fn peek_status(key: &CacheKey, now: u64) -> Option<BreakdownStatus> {
    BREAKDOWN_CACHE.with(|c| c.borrow().status(key, now))
}

pub fn sweep_expired(now: u64) -> usize {
    BREAKDOWN_CACHE.with(|c| c.borrow_mut().purge_expired(now))
}

pub fn set_cache_ttl(ttl_seconds: u64) {
    BREAKDOWN_CACHE.with(|c| c.borrow_mut().set_ttl(ttl_seconds));
}

pub fn clear_all_caches() {
    BREAKDOWN_CACHE.with(|c| c.borrow_mut().clear());
    crate::log!("🧹 Breakdown cache cleared");
}

pub fn cache_stats() -> CacheStats {
    BREAKDOWN_CACHE.with(|c| c.borrow().stats())
}

/// Marks a user's breakdown as being computed for as long as it lives
pub struct ComputingGuard {
    user: Principal,
}

impl ComputingGuard {
    pub fn begin(user: Principal) -> Self {
        IN_FLIGHT.with(|in_flight| {
            *in_flight.borrow_mut().entry(user).or_insert(0) += 1;
        });
        ComputingGuard { user }
    }
}

impl Drop for ComputingGuard {
    fn drop(&mut self) {
        IN_FLIGHT.with(|in_flight| {
            let mut in_flight = in_flight.borrow_mut();
            if let Some(count) = in_flight.get_mut(&self.user) {
                *count -= 1;
                if *count == 0 {
                    in_flight.remove(&self.user);
                }
            }
        });
    }
}

pub fn is_computing(user: &Principal) -> bool {
    IN_FLIGHT.with(|in_flight| in_flight.borrow().contains_key(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BreakdownSource, PoolSummary};
    use rust_decimal::Decimal;

    fn ready(now: u64) -> BoostBreakdown {
        BoostBreakdown {
            total_boost_ratio: Decimal::ONE,
            staking: PoolSummary::zero(),
            discount: PoolSummary::zero(),
            status: BreakdownStatus::Ready,
            degraded: Vec::new(),
            computed_at: now,
        }
    }

    fn key(byte: u8, endpoints: &str) -> CacheKey {
        CacheKey::new(Principal::from_slice(&[byte]), endpoints)
    }

    #[test]
    fn test_hit_within_ttl_miss_after() {
        let mut cache = BreakdownCache::new(120, 10);
        assert!(cache.insert(key(1, "a"), ready(1000), 1000));

        assert_eq!(cache.get(&key(1, "a"), 1119).unwrap().computed_at, 1000);
        assert!(cache.get(&key(1, "a"), 1120).is_none());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 0));
    }

    #[test]
    fn test_endpoint_change_misses() {
        let mut cache = BreakdownCache::new(120, 10);
        cache.insert(key(1, "ledgers-v1"), ready(0), 0);
        assert!(cache.get(&key(1, "ledgers-v2"), 1).is_none());
        assert!(cache.get(&key(1, "ledgers-v1"), 1).is_some());
    }

    #[test]
    fn test_degraded_and_pending_not_cached() {
        let mut cache = BreakdownCache::new(120, 10);

        let mut partial = ready(0);
        partial.status = BreakdownStatus::Partial;
        partial.degraded = vec![BreakdownSource::DiscountPool];
        assert!(!cache.insert(key(1, "a"), partial, 0));

        let mut oracle_down = ready(0);
        oracle_down.degraded = vec![BreakdownSource::BoostOracle];
        assert!(!cache.insert(key(1, "a"), oracle_down, 0));

        assert!(!cache.insert(key(1, "a"), BoostBreakdown::pending(0), 0));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let mut cache = BreakdownCache::new(0, 10);
        assert!(!cache.insert(key(1, "a"), ready(0), 0));
    }

    #[test]
    fn test_bounded_size_evicts_oldest() {
        let mut cache = BreakdownCache::new(1000, 2);
        cache.insert(key(1, "a"), ready(0), 10);
        cache.insert(key(2, "a"), ready(0), 20);
        cache.insert(key(3, "a"), ready(0), 30);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(1, "a"), 31).is_none());
        assert!(cache.get(&key(3, "a"), 31).is_some());
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = BreakdownCache::new(100, 10);
        cache.insert(key(1, "a"), ready(0), 0);
        cache.insert(key(2, "a"), ready(0), 50);
        assert_eq!(cache.purge_expired(120), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_partial_status_remembered_without_storing() {
        let mut cache = BreakdownCache::new(120, 10);

        let mut partial = ready(0);
        partial.status = BreakdownStatus::Partial;
        partial.degraded = vec![BreakdownSource::StakingPool];
        assert!(!cache.insert(key(1, "a"), partial, 100));

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.status(&key(1, "a"), 219), Some(BreakdownStatus::Partial));
        assert_eq!(cache.status(&key(1, "a"), 220), None);
        assert_eq!(cache.status(&key(1, "b"), 150), None);
    }

    #[test]
    fn test_newer_status_replaces_older() {
        let mut cache = BreakdownCache::new(120, 10);

        let mut partial = ready(0);
        partial.status = BreakdownStatus::Partial;
        partial.degraded = vec![BreakdownSource::DiscountPool];
        cache.insert(key(1, "a"), partial, 0);
        cache.insert(key(1, "a"), ready(10), 10);

        assert_eq!(cache.status(&key(1, "a"), 20), Some(BreakdownStatus::Ready));
        cache.clear();
        assert_eq!(cache.status(&key(1, "a"), 20), None);
    }

    #[test]
    fn test_computing_until_last_concurrent_request_ends() {
        let user = Principal::from_slice(&[8]);
        let first = ComputingGuard::begin(user);
        let second = ComputingGuard::begin(user);

        drop(first);
        assert!(is_computing(&user));
        drop(second);
        assert!(!is_computing(&user));
    }

    #[test]
    fn test_computing_guard_releases_on_drop() {
        let user = Principal::from_slice(&[9]);
        {
            let _guard = ComputingGuard::begin(user);
            assert!(is_computing(&user));
        }
        assert!(!is_computing(&user));
    }
}
