// Test harness module
// Seeded workload simulator and stress runs on a paused tokio clock

pub mod simulator;

pub use simulator::*;

use crate::center::NotificationCenter;
use crate::config::CenterConfig;
use crate::error::HeraldError;
use crate::types::NotificationKind;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Yields enough times for woken expiry tasks to run to completion.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Yields until `done` holds, at most `max_yields` times.
///
/// Returns whether `done` held. Large bursts of expiring timers need more
/// scheduler turns than [`settle`] gives.
pub async fn settle_until(mut done: impl FnMut() -> bool, max_yields: usize) -> bool {
    for _ in 0..max_yields {
        if done() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    done()
}

/// Advance the paused clock and let due timers fire.
///
/// # Panics
/// If the clock is not paused.
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

/// [`advance`] in milliseconds.
pub async fn advance_ms(ms: u64) {
    advance(Duration::from_millis(ms)).await;
}

/// Build a current-thread runtime whose clock starts paused.
pub(crate) fn paused_runtime() -> Result<tokio::runtime::Runtime, HeraldError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()?)
}

/// Test harness for stress runs
pub struct TestHarness;

impl TestHarness {
    /// Longest duration a stress entry gets
    pub const MAX_STRESS_DURATION_MS: u64 = 5000;

    /// Run bursts of `entries` timed notifications for `rounds` rounds.
    ///
    /// Every third entry is dismissed by hand; the rest must expire. After
    /// each round the clock moves past the longest duration and the center
    /// must be empty with no timer left behind.
    ///
    /// # Errors
    /// - `HeraldError::Io` if the runtime cannot be built
    pub fn run_stress_test(entries: usize, rounds: usize) -> Result<StressTestReport, HeraldError> {
        tracing::info!("Running stress test with {} entries and {} rounds", entries, rounds);

        let runtime = paused_runtime()?;
        let violations = runtime.block_on(async move {
            let center = NotificationCenter::new(CenterConfig::new());
            let mut rng = StdRng::seed_from_u64(12345);
            let mut violations = 0;

            for round in 0..rounds {
                let mut issued = Vec::with_capacity(entries);
                for i in 0..entries {
                    let kind = NotificationKind::ALL[i % NotificationKind::ALL.len()];
                    let duration = rng.random_range(1..=Self::MAX_STRESS_DURATION_MS);
                    issued.push(center.show_for(kind, format!("round {round} entry {i}"), duration));
                }

                if center.len() != entries || center.pending_timers() != entries {
                    tracing::warn!("Round {}: burst not fully active", round);
                    violations += 1;
                }

                for id in issued.iter().step_by(3) {
                    center.dismiss(*id);
                }

                advance_ms(Self::MAX_STRESS_DURATION_MS).await;
                settle_until(|| center.is_empty(), entries * 4).await;

                if !center.is_empty() || center.pending_timers() != 0 {
                    tracing::warn!(
                        "Round {}: {} entries and {} timers left after expiry",
                        round,
                        center.len(),
                        center.pending_timers()
                    );
                    violations += 1;
                }
            }

            violations
        });

        Ok(StressTestReport {
            entries,
            rounds,
            violations,
            success: violations == 0,
        })
    }
}

/// Report from a stress test
#[derive(Debug, Clone)]
pub struct StressTestReport {
    pub entries: usize,
    pub rounds: usize,
    pub violations: usize,
    pub success: bool,
}
