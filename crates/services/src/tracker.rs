//! Per-lesson playback tracking: state, completion gate, and reports.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lms_core::PlaybackGate;
use lms_core::model::{LessonRef, MediaEvent, PlaybackState, ReportTrigger, TrackingMode};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::heartbeat::{HeartbeatConfig, HeartbeatHandle, spawn_heartbeat};
use crate::reporter::ProgressReporter;

/// Invoked once, the first time a lesson completes.
pub type CompletionCallback = Arc<dyn Fn(&LessonRef) + Send + Sync>;

/// Everything a view or the heartbeat needs to know about a lesson right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerSnapshot {
    pub playback: PlaybackState,
    pub gate: PlaybackGate,
    pub scorm_status: Option<String>,
}

impl TrackerSnapshot {
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.gate.can_advance()
    }
}

/// Owns the playback state of one mounted lesson.
///
/// State lives in a `watch` channel so the heartbeat and the view always read the
/// latest snapshot without locking.
pub struct LessonTracker {
    tracking: TrackingMode,
    state: watch::Sender<TrackerSnapshot>,
    reporter: ProgressReporter,
    on_complete: Option<CompletionCallback>,
    completion_fired: AtomicBool,
}

impl LessonTracker {
    #[must_use]
    pub fn new(tracking: TrackingMode, reporter: ProgressReporter) -> Self {
        let gate = match tracking {
            TrackingMode::Tracked => PlaybackGate::Locked,
            TrackingMode::Untracked => PlaybackGate::open(),
        };
        let (state, _) = watch::channel(TrackerSnapshot {
            gate,
            ..TrackerSnapshot::default()
        });
        Self {
            tracking,
            state,
            reporter,
            on_complete: None,
            completion_fired: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_completion_callback(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    #[must_use]
    pub fn lesson(&self) -> &LessonRef {
        self.reporter.lesson()
    }

    #[must_use]
    pub fn tracking(&self) -> TrackingMode {
        self.tracking
    }

    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.state.borrow().can_advance()
    }

    /// Route a backing-player callback. Returns the completion report task for `Ended`.
    pub fn handle_media_event(&self, event: MediaEvent) -> Option<JoinHandle<()>> {
        match event {
            MediaEvent::Duration { seconds } => {
                self.set_duration(seconds);
                None
            }
            MediaEvent::Progress { position } => {
                self.set_position(position);
                None
            }
            MediaEvent::Ended => Some(self.media_ended()),
        }
    }

    pub fn set_duration(&self, seconds: f64) {
        self.update(|snapshot| snapshot.playback.set_duration(seconds));
    }

    pub fn set_position(&self, position: f64) {
        self.update(|snapshot| snapshot.playback.set_position(position));
    }

    /// The one permitted manual seek. The gate keeps whatever state it reached.
    pub fn restart(&self) {
        tracing::debug!(lesson = %self.lesson(), "lesson restarted");
        self.set_position(0.0);
    }

    /// Natural end of the media. Sends an immediate report outside the heartbeat.
    pub fn media_ended(&self) -> JoinHandle<()> {
        self.state.send_modify(|snapshot| {
            snapshot.playback.finish();
            snapshot.gate.unlock();
        });
        self.completed(ReportTrigger::MediaEnded)
    }

    /// Lesson status written by a SCORM package.
    ///
    /// Terminal statuses complete the lesson and return the report task; anything
    /// else is only remembered for the next report.
    pub fn scorm_status_changed(&self, status: &str) -> Option<JoinHandle<()>> {
        let terminal = lms_core::scorm::is_terminal_status(status);
        self.state.send_modify(|snapshot| {
            snapshot.scorm_status = Some(status.to_owned());
            if terminal {
                snapshot.playback.mark_completed();
                snapshot.gate.unlock();
            }
        });
        terminal.then(|| self.completed(ReportTrigger::ScormCompleted))
    }

    /// Start the periodic reporter. Untracked content has none.
    #[must_use]
    pub fn start_heartbeat(&self, config: HeartbeatConfig) -> Option<HeartbeatHandle> {
        match self.tracking {
            TrackingMode::Tracked => Some(spawn_heartbeat(
                self.reporter.clone(),
                self.subscribe(),
                config,
            )),
            TrackingMode::Untracked => None,
        }
    }

    fn update(&self, apply: impl FnOnce(&mut TrackerSnapshot)) {
        let lesson = self.lesson();
        self.state.send_modify(|snapshot| {
            apply(snapshot);
            let position = snapshot.playback.position_secs();
            let duration = snapshot.playback.duration_secs();
            if snapshot.gate.observe(position, duration) {
                tracing::info!(%lesson, position, duration, "completion threshold reached");
            }
        });
    }

    fn completed(&self, trigger: ReportTrigger) -> JoinHandle<()> {
        let snapshot = self.snapshot();
        let task = self.reporter.spawn_send(&snapshot, trigger);

        if !self.completion_fired.swap(true, Ordering::AcqRel) {
            tracing::info!(lesson = %self.lesson(), ?trigger, "lesson completed");
            if let Some(callback) = self.on_complete.as_ref() {
                callback(self.lesson());
            }
        }
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::model::{CourseId, LessonId, ReportStatus};
    use lms_core::time::fixed_clock;
    use std::sync::atomic::AtomicUsize;
    use transport::InMemoryTransport;

    fn tracker(tracking: TrackingMode, transport: &InMemoryTransport) -> LessonTracker {
        let lesson = LessonRef::new(CourseId::new("c").unwrap(), LessonId::new("l").unwrap());
        let reporter = ProgressReporter::new(lesson, Arc::new(transport.clone()), fixed_clock());
        LessonTracker::new(tracking, reporter)
    }

    #[test]
    fn untracked_content_starts_unlocked() {
        let transport = InMemoryTransport::new();
        assert!(tracker(TrackingMode::Untracked, &transport).can_advance());
        assert!(!tracker(TrackingMode::Tracked, &transport).can_advance());
    }

    #[test]
    fn ten_minute_video_unlocks_at_570_seconds() {
        let transport = InMemoryTransport::new();
        let tracker = tracker(TrackingMode::Tracked, &transport);
        tracker.handle_media_event(MediaEvent::Duration { seconds: 600.0 });
        tracker.handle_media_event(MediaEvent::Progress { position: 570.0 });

        let snapshot = tracker.snapshot();
        assert!((snapshot.playback.percent_remaining() - 5.0).abs() < 1e-9);
        assert!(snapshot.can_advance());
        assert!(!snapshot.playback.is_completed());
    }

    #[test]
    fn gate_survives_restart() {
        let transport = InMemoryTransport::new();
        let tracker = tracker(TrackingMode::Tracked, &transport);
        tracker.set_duration(100.0);
        tracker.set_position(96.0);
        tracker.restart();
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.playback.position_secs(), 0.0);
        assert!(snapshot.can_advance());
    }

    #[tokio::test]
    async fn media_end_sends_completed_report() {
        let transport = InMemoryTransport::new();
        let tracker = tracker(TrackingMode::Tracked, &transport);
        tracker.set_duration(600.0);
        tracker.set_position(200.0);
        tracker
            .handle_media_event(MediaEvent::Ended)
            .expect("completion report")
            .await
            .unwrap();

        let snapshot = tracker.snapshot();
        assert!(snapshot.playback.is_completed());
        assert!(snapshot.can_advance());

        let reports = transport.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, ReportStatus::Completed);
        assert_eq!(reports[0].percent_remaining, 0.0);
    }

    #[tokio::test]
    async fn non_terminal_scorm_status_is_only_remembered() {
        let transport = InMemoryTransport::new();
        let tracker = tracker(TrackingMode::Tracked, &transport);
        assert!(tracker.scorm_status_changed("incomplete").is_none());
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.scorm_status.as_deref(), Some("incomplete"));
        assert!(!snapshot.can_advance());
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test]
    async fn completion_callback_fires_once() {
        let transport = InMemoryTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let tracker = tracker(TrackingMode::Tracked, &transport).with_completion_callback(
            Arc::new(move |_lesson| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tracker.scorm_status_changed("completed").unwrap().await.unwrap();
        tracker.media_ended().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Every terminal event still reports; duplicates are the backend's to reconcile.
        assert_eq!(transport.reports().len(), 2);
    }
}
