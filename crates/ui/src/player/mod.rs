//! One renderer per lesson content variant.

mod document;
mod scorm;
mod scripts;
mod video;

use std::sync::Arc;

use dioxus::prelude::*;
use lms_core::model::{LessonContent, MediaSource};
use services::LessonTracker;

pub use document::{DocumentFrame, TextLesson};
pub use scorm::{EvalHost, SCORM_FRAME_ID, ScormFrame};
pub use scripts::{CommandTarget, PlayerCommand};
pub use video::{FileVideo, HostedVideo, MEDIA_ELEMENT_ID};

/// Keys that would scrub the media. They are swallowed on the playback surface.
pub const SEEK_KEYS: [&str; 24] = [
    "ArrowLeft",
    "ArrowRight",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "MediaFastForward",
    "MediaRewind",
    "MediaTrackNext",
    "MediaTrackPrevious",
    "j",
    "l",
    "J",
    "L",
    "0",
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
];

#[must_use]
pub fn is_seek_key(key: &Key) -> bool {
    let name = key.to_string();
    SEEK_KEYS.contains(&name.as_str())
}

/// Shared handle to the lesson's tracker, comparable by identity for props.
#[derive(Clone)]
pub struct TrackerHandle(pub Arc<LessonTracker>);

impl PartialEq for TrackerHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
pub fn LessonPlayer(content: LessonContent, tracker: TrackerHandle) -> Element {
    match &content {
        LessonContent::Video(MediaSource::File(src)) => rsx! {
            FileVideo { src: src.clone(), tracker }
        },
        LessonContent::Video(source @ MediaSource::Hosted { provider, .. }) => rsx! {
            HostedVideo { embed_url: source.embed_url(), provider: *provider, tracker }
        },
        LessonContent::Scorm { launch_url } => rsx! {
            ScormFrame { launch_url: launch_url.clone(), tracker }
        },
        LessonContent::Pdf { .. } | LessonContent::Presentation { .. } => rsx! {
            DocumentFrame { viewer_url: content.document_viewer_url().unwrap_or_default() }
        },
        LessonContent::Text { markdown } => rsx! {
            TextLesson { markdown: markdown.clone() }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_digit_keys_seek() {
        assert!(is_seek_key(&Key::ArrowRight));
        assert!(is_seek_key(&Key::End));
        assert!(is_seek_key(&Key::Character("7".into())));
        assert!(is_seek_key(&Key::Character("l".into())));
    }

    #[test]
    fn space_and_tab_do_not_seek() {
        assert!(!is_seek_key(&Key::Character(" ".into())));
        assert!(!is_seek_key(&Key::Tab));
        assert!(!is_seek_key(&Key::Enter));
    }
}
