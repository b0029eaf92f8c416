pub mod lesson;
pub mod media;

pub use lesson::{ContentKind, Lesson, LessonContent, LessonContentError, TrackingMode};
pub use media::{MediaSource, MediaValidationError, VideoProvider};
