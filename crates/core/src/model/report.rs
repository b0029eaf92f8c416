use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ids::{CourseId, LessonId, LessonRef};
use crate::model::playback::PlaybackState;

/// Lesson status as the progress endpoint spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl ReportStatus {
    #[must_use]
    pub fn from_completed(is_completed: bool) -> Self {
        if is_completed {
            Self::Completed
        } else {
            Self::InProgress
        }
    }
}

/// What fired a report. Only used for logging; not part of the wire body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    Heartbeat,
    MediaEnded,
    ScormCompleted,
}

/// Body of `POST /progress`.
///
/// `reported_at` and `sequence` let the backend pick the newest report when a
/// heartbeat and a completion report race; the client never reorders or drops them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub current_position: f64,
    pub duration: f64,
    pub percent_remaining: f64,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorm_status: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub sequence: u64,
}

impl ProgressReport {
    #[must_use]
    pub fn from_state(
        lesson: &LessonRef,
        state: &PlaybackState,
        scorm_status: Option<&str>,
        reported_at: DateTime<Utc>,
        sequence: u64,
    ) -> Self {
        Self {
            course_id: lesson.course_id.clone(),
            lesson_id: lesson.lesson_id.clone(),
            current_position: state.position_secs(),
            duration: state.duration_secs(),
            percent_remaining: state.percent_remaining(),
            status: ReportStatus::from_completed(state.is_completed()),
            scorm_status: scorm_status.map(str::to_owned),
            reported_at,
            sequence,
        }
    }
}
