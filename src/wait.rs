//! Bounded polling for externally-driven conditions
//!
//! Harnesses frequently have to wait for background work on the cluster
//! (file creation fan-out, rebalance settling) before asserting anything.
//! This module replaces open-ended sleep loops with an explicit deadline
//! and a fixed probe interval.

use std::time::{Duration, Instant};

/// Outcome of a bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Whether the condition held before the deadline
    pub satisfied: bool,

    /// Number of probes issued (at least 1)
    pub attempts: u32,

    /// Time spent waiting
    pub elapsed: Duration,
}

/// Probe a condition until it holds or the deadline passes
///
/// The condition is probed once immediately, then every `interval` until
/// `timeout` has elapsed. The deadline is checked after each failed
/// probe, so the wait never runs unbounded.
///
/// # Arguments
/// * `timeout` - Hard deadline for the whole wait
/// * `interval` - Sleep between probes
/// * `condition` - Probe; should be cheap and side-effect free
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut condition: F) -> WaitOutcome
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if condition() {
            let elapsed = start.elapsed();
            tracing::debug!("condition held after {} attempts in {:?}", attempts, elapsed);
            return WaitOutcome {
                satisfied: true,
                attempts,
                elapsed,
            };
        }

        if start.elapsed() >= timeout {
            let elapsed = start.elapsed();
            tracing::warn!(
                "condition still false after {} attempts in {:?}",
                attempts,
                elapsed
            );
            return WaitOutcome {
                satisfied: false,
                attempts,
                elapsed,
            };
        }

        std::thread::sleep(interval);
    }
}

/// Fold per-task boolean results into one success flag
///
/// Used to aggregate the outcome of parallel remote commands; logs how
/// many tasks failed so the caller's assertion message can stay short.
pub fn all_ok<I>(results: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    let mut total = 0usize;
    let mut failed = 0usize;
    for ok in results {
        total += 1;
        if !ok {
            failed += 1;
        }
    }
    if failed > 0 {
        tracing::warn!("{}/{} tasks failed", failed, total);
    }
    failed == 0
}
