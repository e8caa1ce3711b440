//! Bounded waits for external queries
//!
//! On the IC the deadline is enforced by the system: every ledger and oracle
//! query is a bounded-wait call (`Call::bounded_wait(..).change_timeout(..)`),
//! which the replica answers with a `SYS_UNKNOWN` reject once the timeout
//! elapses. The query then fails like any other rejection and only that
//! source degrades. No canister timer is involved, so nothing outlives the
//! request.
//!
//! `with_timeout` races an operation against a `Delay` for collaborators that
//! cannot bound themselves; tests drive it with a delay that fires at once.

use futures::future::{self, Either};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;
use crate::infrastructure::{BoostError, QueryError, Result};

/// Source of "wake me after `duration`" futures
pub trait Delay {
    fn delay(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Deadline already carried by the bounded-wait call itself: never fires
pub struct CallDeadline;

impl Delay for CallDeadline {
    fn delay(&self, _duration: Duration) -> impl Future<Output = ()> {
        future::pending::<()>()
    }
}

/// Bounded-wait timeout for one inter-canister call, in whole seconds (>= 1)
pub fn bounded_wait_seconds(limit: Duration) -> u32 {
    u32::try_from(limit.as_secs()).unwrap_or(u32::MAX).max(1)
}

/// Run `operation`, failing with `QueryError::Timeout` if `delay` fires first
pub async fn with_timeout<T, F, D>(
    operation: F,
    delay: &D,
    limit: Duration,
    label: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
    D: Delay,
{
    let operation = pin!(operation);
    let timer = pin!(delay.delay(limit));

    match future::select(operation, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            crate::log!("  ⏱️  {} timed out after {}s", label, limit.as_secs());
            Err(BoostError::Query(QueryError::Timeout {
                operation: label.to_string(),
                seconds: limit.as_secs(),
            }))
        }
    }
}
