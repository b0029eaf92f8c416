use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lms_core::model::{LessonRef, ProgressReport, ReportTrigger};
use tokio::task::JoinHandle;
use transport::ProgressTransport;

use crate::Clock;
use crate::tracker::TrackerSnapshot;

/// Turns tracker snapshots into progress reports and delivers them.
///
/// Delivery is at most one attempt per report. Failures are logged and dropped.
#[derive(Clone)]
pub struct ProgressReporter {
    lesson: LessonRef,
    transport: Arc<dyn ProgressTransport>,
    clock: Clock,
    sequence: Arc<AtomicU64>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(lesson: LessonRef, transport: Arc<dyn ProgressTransport>, clock: Clock) -> Self {
        Self {
            lesson,
            transport,
            clock,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn lesson(&self) -> &LessonRef {
        &self.lesson
    }

    /// Stamp a snapshot with the next sequence number and the current time.
    #[must_use]
    pub fn build(&self, snapshot: &TrackerSnapshot) -> ProgressReport {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ProgressReport::from_state(
            &self.lesson,
            &snapshot.playback,
            snapshot.scorm_status.as_deref(),
            self.clock.now(),
            sequence,
        )
    }

    /// Build and deliver a report, waiting for the attempt to finish.
    pub async fn send_now(&self, snapshot: &TrackerSnapshot, trigger: ReportTrigger) {
        let report = self.build(snapshot);
        deliver(self.transport.as_ref(), &report, trigger).await;
    }

    /// Build a report now and deliver it on a background task.
    ///
    /// Sends are independent: a slow request never delays the next one.
    pub fn spawn_send(&self, snapshot: &TrackerSnapshot, trigger: ReportTrigger) -> JoinHandle<()> {
        let report = self.build(snapshot);
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            deliver(transport.as_ref(), &report, trigger).await;
        })
    }
}

async fn deliver(transport: &dyn ProgressTransport, report: &ProgressReport, trigger: ReportTrigger) {
    match transport.send_progress(report).await {
        Ok(()) => tracing::debug!(
            course = %report.course_id,
            lesson = %report.lesson_id,
            sequence = report.sequence,
            ?trigger,
            position = report.current_position,
            "progress reported"
        ),
        Err(err) => tracing::warn!(
            course = %report.course_id,
            lesson = %report.lesson_id,
            sequence = report.sequence,
            ?trigger,
            error = %err,
            "progress report failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::model::{CourseId, LessonId, ReportStatus};
    use lms_core::time::fixed_clock;
    use transport::InMemoryTransport;

    fn reporter(transport: &InMemoryTransport) -> ProgressReporter {
        let lesson = LessonRef::new(CourseId::new("c").unwrap(), LessonId::new("l").unwrap());
        ProgressReporter::new(lesson, Arc::new(transport.clone()), fixed_clock())
    }

    #[tokio::test]
    async fn sequences_increase_per_report() {
        let transport = InMemoryTransport::new();
        let reporter = reporter(&transport);
        let snapshot = TrackerSnapshot::default();
        reporter.send_now(&snapshot, ReportTrigger::Heartbeat).await;
        reporter
            .spawn_send(&snapshot, ReportTrigger::Heartbeat)
            .await
            .unwrap();

        let reports = transport.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].sequence, 1);
        assert_eq!(reports[1].sequence, 2);
        assert_eq!(reports[1].status, ReportStatus::InProgress);
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let transport = InMemoryTransport::failing();
        let reporter = reporter(&transport);
        reporter
            .send_now(&TrackerSnapshot::default(), ReportTrigger::MediaEnded)
            .await;
        assert_eq!(transport.attempts(), 1);
    }
}
