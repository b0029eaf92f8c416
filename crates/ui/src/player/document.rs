use dioxus::prelude::*;

use crate::vm::markdown_to_html;

pub const DOCUMENT_FRAME_ID: &str = "lesson-document";

/// PDF or presentation shown through a viewer iframe.
#[component]
pub fn DocumentFrame(viewer_url: String) -> Element {
    rsx! {
        div { class: "player player--document",
            iframe {
                id: DOCUMENT_FRAME_ID,
                class: "player__frame",
                src: "{viewer_url}",
                title: "Lesson document",
                oncontextmenu: move |evt| evt.prevent_default(),
            }
        }
    }
}

#[component]
pub fn TextLesson(markdown: String) -> Element {
    let html = markdown_to_html(&markdown);
    rsx! {
        article { class: "player player--text lesson-text", dangerous_inner_html: "{html}" }
    }
}
