pub mod content;
mod ids;
mod playback;
mod report;

pub use content::{
    ContentKind, Lesson, LessonContent, LessonContentError, MediaSource, MediaValidationError,
    TrackingMode, VideoProvider,
};
pub use ids::{CourseId, EmptyIdError, LessonId, LessonRef};
pub use playback::{MediaEvent, PlaybackState};
pub use report::{ProgressReport, ReportStatus, ReportTrigger};
