use thiserror::Error;
use url::Url;

use crate::model::content::media::{MediaSource, MediaValidationError, parse_media_url};
use crate::model::ids::LessonRef;

//
// ─── LESSON CONTENT ────────────────────────────────────────────────────────────
//

/// What a lesson plays. Each variant has exactly one renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Video(MediaSource),
    Scorm { launch_url: Url },
    Pdf { url: Url },
    Presentation { url: Url },
    Text { markdown: String },
}

/// A lesson as handed to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub reference: LessonRef,
    pub title: String,
    pub content: LessonContent,
}

/// Whether a lesson is subject to watch-through tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    /// Progress is heartbeated and the gate starts locked.
    Tracked,
    /// Documents and text: no heartbeat, no watch-through requirement.
    Untracked,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LessonContentError {
    #[error("unknown content type: {0}")]
    UnknownKind(String),

    #[error("Text lesson body cannot be empty.")]
    EmptyText,

    #[error(transparent)]
    Media(#[from] MediaValidationError),
}

/// Content type tags as the backend labels them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Video,
    Scorm,
    Pdf,
    Presentation,
    Text,
}

impl ContentKind {
    /// Parse a backend content tag (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LessonContentError::UnknownKind` for unsupported tags.
    pub fn parse(raw: &str) -> Result<Self, LessonContentError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "scorm" => Ok(Self::Scorm),
            "pdf" => Ok(Self::Pdf),
            "ppt" | "pptx" | "presentation" => Ok(Self::Presentation),
            "text" => Ok(Self::Text),
            other => Err(LessonContentError::UnknownKind(other.to_owned())),
        }
    }
}

impl LessonContent {
    /// Build content from a backend tag and its payload (a URL, or markdown for text).
    ///
    /// # Errors
    ///
    /// Returns `LessonContentError` when the tag is unknown or the payload is invalid.
    pub fn from_parts(kind: ContentKind, payload: &str) -> Result<Self, LessonContentError> {
        match kind {
            ContentKind::Video => Ok(Self::Video(MediaSource::from_url(payload)?)),
            ContentKind::Scorm => Ok(Self::Scorm {
                launch_url: parse_media_url(payload)?,
            }),
            ContentKind::Pdf => Ok(Self::Pdf {
                url: parse_media_url(payload)?,
            }),
            ContentKind::Presentation => Ok(Self::Presentation {
                url: parse_media_url(payload)?,
            }),
            ContentKind::Text => {
                if payload.trim().is_empty() {
                    return Err(LessonContentError::EmptyText);
                }
                Ok(Self::Text {
                    markdown: payload.to_owned(),
                })
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            LessonContent::Video(_) => ContentKind::Video,
            LessonContent::Scorm { .. } => ContentKind::Scorm,
            LessonContent::Pdf { .. } => ContentKind::Pdf,
            LessonContent::Presentation { .. } => ContentKind::Presentation,
            LessonContent::Text { .. } => ContentKind::Text,
        }
    }

    #[must_use]
    pub fn tracking(&self) -> TrackingMode {
        match self {
            LessonContent::Video(_) | LessonContent::Scorm { .. } => TrackingMode::Tracked,
            LessonContent::Pdf { .. }
            | LessonContent::Presentation { .. }
            | LessonContent::Text { .. } => TrackingMode::Untracked,
        }
    }

    /// Viewer URL for iframe-hosted documents.
    ///
    /// PDFs get the built-in toolbar hidden; presentations go through the Office
    /// online viewer since browsers cannot render them natively.
    #[must_use]
    pub fn document_viewer_url(&self) -> Option<String> {
        match self {
            LessonContent::Pdf { url } => Some(format!("{url}#toolbar=0&navpanes=0&scrollbar=0")),
            LessonContent::Presentation { url } => {
                let encoded: String = url::form_urlencoded::byte_serialize(url.as_str().as_bytes())
                    .collect();
                Some(format!(
                    "https://view.officeapps.live.com/op/embed.aspx?src={encoded}"
                ))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_tags() {
        assert_eq!(ContentKind::parse("Video").unwrap(), ContentKind::Video);
        assert_eq!(ContentKind::parse("SCORM").unwrap(), ContentKind::Scorm);
        assert_eq!(ContentKind::parse("PPT").unwrap(), ContentKind::Presentation);
        assert!(matches!(
            ContentKind::parse("quiz"),
            Err(LessonContentError::UnknownKind(_))
        ));
    }

    #[test]
    fn video_and_scorm_are_tracked() {
        let video =
            LessonContent::from_parts(ContentKind::Video, "https://cdn.example.com/a.mp4").unwrap();
        let scorm = LessonContent::from_parts(
            ContentKind::Scorm,
            "https://cdn.example.com/pkg/index.html",
        )
        .unwrap();
        let text = LessonContent::from_parts(ContentKind::Text, "# Hello").unwrap();
        assert_eq!(video.tracking(), TrackingMode::Tracked);
        assert_eq!(scorm.tracking(), TrackingMode::Tracked);
        assert_eq!(text.tracking(), TrackingMode::Untracked);
    }

    #[test]
    fn presentation_viewer_url_is_encoded() {
        let ppt = LessonContent::from_parts(
            ContentKind::Presentation,
            "https://cdn.example.com/deck one.pptx",
        )
        .unwrap();
        let viewer = ppt.document_viewer_url().unwrap();
        assert!(viewer.starts_with("https://view.officeapps.live.com/op/embed.aspx?src=https%3A%2F%2F"));
    }

    #[test]
    fn pdf_viewer_hides_toolbar() {
        let pdf =
            LessonContent::from_parts(ContentKind::Pdf, "https://cdn.example.com/policy.pdf").unwrap();
        assert_eq!(
            pdf.document_viewer_url().as_deref(),
            Some("https://cdn.example.com/policy.pdf#toolbar=0&navpanes=0&scrollbar=0")
        );
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(
            LessonContent::from_parts(ContentKind::Text, "  "),
            Err(LessonContentError::EmptyText)
        );
    }
}
