//! Process-wide admission gate for the generative-language service
//!
//! All sessions share one upstream quota, so the gate is deliberately
//! decoupled from any single session. Two joint constraints hold at all
//! times: at most `MAX_CONCURRENT` calls in flight, and at least
//! `MIN_INTERVAL` between the starts of consecutive calls. Implemented as
//! a counting semaphore plus an "earliest next start" timestamp gate; no
//! polling, no wake-ups while nothing can proceed. No fairness ordering is
//! guaranteed among waiters.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::trace;

/// Maximum calls in flight at once
pub const MAX_CONCURRENT: usize = 2;
/// Minimum time between the starts of consecutive calls
pub const MIN_INTERVAL: Duration = Duration::from_millis(1200);

/// Shared concurrency and pacing gate
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    /// Earliest instant the next call may start; None until the first call
    next_start: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::with_limits(MAX_CONCURRENT, MIN_INTERVAL)
    }

    /// Custom limits, mainly for tests
    pub fn with_limits(max_concurrent: usize, min_interval: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            next_start: Mutex::new(None),
            min_interval,
        }
    }

    /// Suspend until a call may start, returning an RAII permit
    ///
    /// The concurrency slot is freed when the permit is dropped, on every
    /// exit path of the gated call.
    pub async fn acquire(&self) -> GatePermit {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("admission gate semaphore closed");

        // Holding the lock while waiting serializes call starts, which is
        // exactly the pacing constraint.
        let mut next_start = self.next_start.lock().await;
        if let Some(at) = *next_start {
            let now = Instant::now();
            if at > now {
                trace!(wait_ms = (at - now).as_millis() as u64, "pacing model call");
                tokio::time::sleep_until(at).await;
            }
        }
        *next_start = Some(Instant::now() + self.min_interval);

        GatePermit { _permit: permit }
    }

    /// Free concurrency slots right now (diagnostics only)
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for one admitted call
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn concurrency_never_exceeds_limit() {
        let gate = Arc::new(AdmissionGate::with_limits(2, Duration::from_millis(10)));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire().await;
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn call_starts_are_at_least_min_interval_apart() {
        let gate = Arc::new(AdmissionGate::with_limits(2, Duration::from_millis(1200)));
        let starts = Arc::new(tokio::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gate = gate.clone();
            let starts = starts.clone();
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire().await;
                starts.lock().await.push(Instant::now());
                tokio::time::sleep(Duration::from_millis(100)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut starts = starts.lock().await.clone();
        starts.sort();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1200));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_permit_frees_the_slot() {
        let gate = AdmissionGate::with_limits(1, Duration::from_millis(1));
        let first = gate.acquire().await;
        assert_eq!(gate.available(), 0);
        drop(first);
        assert_eq!(gate.available(), 1);
        // A second acquire proceeds
        let _second = gate.acquire().await;
        assert_eq!(gate.available(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn permit_is_released_when_the_gated_call_errors() {
        let gate = Arc::new(AdmissionGate::with_limits(1, Duration::from_millis(1)));

        async fn failing_call(gate: &AdmissionGate) -> Result<(), &'static str> {
            let _permit = gate.acquire().await;
            Err("provider exploded")
        }

        assert!(failing_call(&gate).await.is_err());
        assert_eq!(gate.available(), 1);
    }
}
