//! SCORM 1.2 run-time state as seen by package content.
//!
//! Only `cmi.core.lesson_status` writes are kept. Every call succeeds and the last
//! error is always `"0"`; error codes are not tracked.

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const LESSON_STATUS: &str = "cmi.core.lesson_status";
pub const TOTAL_TIME: &str = "cmi.core.total_time";
pub const STUDENT_ID: &str = "cmi.core.student_id";
pub const STUDENT_NAME: &str = "cmi.core.student_name";

pub const DEFAULT_LESSON_STATUS: &str = "not attempted";

const TRUE: &str = "true";
const NO_ERROR: &str = "0";

/// Statuses that count as finishing the lesson.
#[must_use]
pub fn is_terminal_status(value: &str) -> bool {
    matches!(value.trim(), "completed" | "passed")
}

/// Error codes defined by SCORM 1.2.
pub const ERROR_CODES: [&str; 11] = [
    "0", "101", "201", "202", "203", "301", "401", "402", "403", "404", "405",
];

/// Text for a SCORM 1.2 error code.
#[must_use]
pub fn error_string(code: &str) -> &'static str {
    match code.trim() {
        "0" | "" => "No error",
        "101" => "General exception",
        "201" => "Invalid argument error",
        "202" => "Element cannot have children",
        "203" => "Element not an array - cannot have count",
        "301" => "Not initialized",
        "401" => "Not implemented error",
        "402" => "Invalid set value, element is a keyword",
        "403" => "Element is read only",
        "404" => "Element is write only",
        "405" => "Incorrect data type",
        _ => "Unknown error",
    }
}

/// Formats seconds as a SCORM 1.2 `CMITimespan` (`HHHH:MM:SS`).
#[must_use]
pub fn format_timespan(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:04}:{minutes:02}:{secs:02}")
}

/// Learner fields exposed read-only to the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnerInfo {
    pub id: String,
    pub name: String,
}

/// Runtime fields owned by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct ScormRuntimeState {
    pub lesson_status: String,
    pub total_time_secs: f64,
}

impl Default for ScormRuntimeState {
    fn default() -> Self {
        Self {
            lesson_status: DEFAULT_LESSON_STATUS.to_owned(),
            total_time_secs: 0.0,
        }
    }
}

/// Effect of an `LMSSetValue` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValueOutcome {
    /// Lesson status stored, not terminal.
    StatusStored,
    /// Lesson status reached `completed` or `passed`.
    Completed(String),
    /// Element accepted and discarded.
    Discarded,
}

/// One API call as forwarded from the page shim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method")]
pub enum ScormCall {
    #[serde(rename = "LMSInitialize")]
    Initialize,
    #[serde(rename = "LMSFinish")]
    Finish,
    #[serde(rename = "LMSGetValue")]
    GetValue { element: String },
    #[serde(rename = "LMSSetValue")]
    SetValue { element: String, value: String },
    #[serde(rename = "LMSCommit")]
    Commit,
    #[serde(rename = "LMSGetLastError")]
    GetLastError,
    #[serde(rename = "LMSGetErrorString")]
    GetErrorString { code: String },
    #[serde(rename = "LMSGetDiagnostic")]
    GetDiagnostic { code: String },
}

#[derive(Debug, Clone, Default)]
pub struct ScormRuntime {
    state: ScormRuntimeState,
    learner: Option<LearnerInfo>,
    session_started_at: Option<DateTime<Utc>>,
}

impl ScormRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_learner(mut self, learner: LearnerInfo) -> Self {
        self.learner = Some(learner);
        self
    }

    #[must_use]
    pub fn state(&self) -> &ScormRuntimeState {
        &self.state
    }

    #[must_use]
    pub fn lesson_status(&self) -> &str {
        &self.state.lesson_status
    }

    #[must_use]
    pub fn is_session_open(&self) -> bool {
        self.session_started_at.is_some()
    }

    /// `LMSInitialize("")`. Re-initializing an open session keeps the original start.
    pub fn initialize(&mut self, now: DateTime<Utc>) -> &'static str {
        self.session_started_at.get_or_insert(now);
        TRUE
    }

    /// `LMSFinish("")`. Folds the session's wall time into `total_time_secs`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> &'static str {
        self.close_session(now);
        TRUE
    }

    fn close_session(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.session_started_at.take() {
            let elapsed = (now - started).num_milliseconds().max(0);
            #[allow(clippy::cast_precision_loss)]
            let elapsed_secs = elapsed as f64 / 1000.0;
            self.state.total_time_secs += elapsed_secs;
        }
    }

    /// `LMSGetValue(element)`. Unknown elements read as an empty string.
    #[must_use]
    pub fn get_value(&self, element: &str) -> String {
        match element.trim() {
            LESSON_STATUS => self.state.lesson_status.clone(),
            TOTAL_TIME => format_timespan(self.state.total_time_secs),
            STUDENT_ID => self
                .learner
                .as_ref()
                .map(|l| l.id.clone())
                .unwrap_or_default(),
            STUDENT_NAME => self
                .learner
                .as_ref()
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// `LMSSetValue(element, value)`. Always reports success to the package.
    pub fn set_value(&mut self, element: &str, value: &str) -> (&'static str, SetValueOutcome) {
        if element.trim() != LESSON_STATUS {
            return (TRUE, SetValueOutcome::Discarded);
        }
        let value = value.trim().to_owned();
        self.state.lesson_status.clone_from(&value);
        let outcome = if is_terminal_status(&value) {
            SetValueOutcome::Completed(value)
        } else {
            SetValueOutcome::StatusStored
        };
        (TRUE, outcome)
    }

    /// Elements the package may read, with their current values.
    #[must_use]
    pub fn readable_values(&self) -> Vec<(&'static str, String)> {
        [LESSON_STATUS, TOTAL_TIME, STUDENT_ID, STUDENT_NAME]
            .into_iter()
            .map(|element| (element, self.get_value(element)))
            .collect()
    }

    #[must_use]
    pub fn commit(&self) -> &'static str {
        TRUE
    }

    #[must_use]
    pub fn last_error(&self) -> &'static str {
        NO_ERROR
    }

    #[must_use]
    pub fn diagnostic(&self, code: &str) -> String {
        format!("{} (no diagnostic information)", error_string(code))
    }
}
