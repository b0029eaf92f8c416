use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier is blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} cannot be empty")]
pub struct EmptyIdError {
    kind: &'static str,
}

/// Backend identifier for a course.
///
/// The value is opaque to this layer; it is echoed back verbatim in progress reports.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new `CourseId`
    ///
    /// # Errors
    ///
    /// Returns `EmptyIdError` if the value is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyIdError> {
        non_blank(raw.into(), "course id").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Backend identifier for a lesson within a course.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId`
    ///
    /// # Errors
    ///
    /// Returns `EmptyIdError` if the value is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyIdError> {
        non_blank(raw.into(), "lesson id").map(Self)
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn non_blank(raw: String, kind: &'static str) -> Result<String, EmptyIdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmptyIdError { kind });
    }
    if trimmed.len() == raw.len() {
        Ok(raw)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl fmt::Debug for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CourseId({})", self.0)
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for CourseId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for LessonId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The pair of identifiers every progress report is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonRef {
    pub course_id: CourseId,
    pub lesson_id: LessonId,
}

impl LessonRef {
    #[must_use]
    pub fn new(course_id: CourseId, lesson_id: LessonId) -> Self {
        Self {
            course_id,
            lesson_id,
        }
    }
}

impl fmt::Display for LessonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course_id, self.lesson_id)
    }
}
