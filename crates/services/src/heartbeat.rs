//! Periodic progress reporting for tracked lessons.

use std::time::Duration;

use lms_core::model::ReportTrigger;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::reporter::ProgressReporter;
use crate::tracker::TrackerSnapshot;

pub const DEFAULT_HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub period: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_HEARTBEAT_PERIOD,
        }
    }
}

impl HeartbeatConfig {
    /// A zero period falls back to the default.
    #[must_use]
    pub fn every(period: Duration) -> Self {
        if period.is_zero() {
            return Self::default();
        }
        Self { period }
    }
}

/// Running heartbeat. Dropping the handle cancels it.
pub struct HeartbeatHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Cancel the heartbeat and abort its task. A tick already being handled may
    /// still hand off its send; no later tick fires.
    pub fn stop(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Report the latest snapshot every `config.period`, starting one period from now.
///
/// Each tick spawns its own send, so a request slower than the period overlaps the
/// next one instead of delaying it.
pub fn spawn_heartbeat(
    reporter: ProgressReporter,
    snapshots: watch::Receiver<TrackerSnapshot>,
    config: HeartbeatConfig,
) -> HeartbeatHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let lesson = reporter.lesson().clone();

    let task = tokio::spawn(async move {
        tracing::debug!(%lesson, period = ?config.period, "heartbeat started");
        let mut ticker = tokio::time::interval_at(Instant::now() + config.period, config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(%lesson, "heartbeat stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let snapshot = snapshots.borrow().clone();
                    drop(reporter.spawn_send(&snapshot, ReportTrigger::Heartbeat));
                }
            }
        }
    });

    HeartbeatHandle { cancel, task }
}
