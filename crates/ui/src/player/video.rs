use dioxus::document::eval;
use dioxus::prelude::*;
use lms_core::model::{MediaEvent, VideoProvider};
use url::Url;

use super::scripts::{
    CommandTarget, PlayerCommand, command_script, file_video_script, hosted_video_script,
    media_teardown_script,
};
use super::{TrackerHandle, is_seek_key};

pub const MEDIA_ELEMENT_ID: &str = "lesson-media";

/// Evaluates `script` and feeds every event it sends into the tracker until the
/// page side goes away. Listeners are removed when the component drops.
fn use_media_events(tracker: TrackerHandle, script: String) {
    use_drop(|| {
        let _ = eval(&media_teardown_script(MEDIA_ELEMENT_ID));
    });
    use_future(move || {
        let tracker = tracker.clone();
        let script = script.clone();
        async move {
            let mut channel = eval(&script);
            loop {
                match channel.recv::<MediaEvent>().await {
                    Ok(event) => drop(tracker.0.handle_media_event(event)),
                    Err(err) => {
                        tracing::debug!(lesson = %tracker.0.lesson(), error = ?err, "media event channel closed");
                        break;
                    }
                }
            }
        }
    });
}

/// Native `<video>` without controls. Download, picture-in-picture and the context
/// menu are disabled; forward seeks are undone page-side.
#[component]
pub fn FileVideo(src: Url, tracker: TrackerHandle) -> Element {
    use_media_events(tracker.clone(), file_video_script(MEDIA_ELEMENT_ID));

    rsx! {
        div { class: "player player--video",
            video {
                id: MEDIA_ELEMENT_ID,
                class: "player__video",
                src: "{src}",
                preload: "auto",
                "playsinline": "true",
                tabindex: "0",
                "controlslist": "nodownload nofullscreen noremoteplayback noplaybackrate",
                "disablepictureinpicture": "true",
                "disableremoteplayback": "true",
                oncontextmenu: move |evt| evt.prevent_default(),
                onkeydown: move |evt| {
                    if is_seek_key(&evt.data.key()) {
                        evt.prevent_default();
                    }
                },
            }
            PlayerToolbar { tracker, target: CommandTarget::File }
        }
    }
}

/// Provider iframe embed. Progress arrives through the provider's message API.
#[component]
pub fn HostedVideo(embed_url: String, provider: VideoProvider, tracker: TrackerHandle) -> Element {
    use_media_events(tracker.clone(), hosted_video_script(MEDIA_ELEMENT_ID, provider));

    rsx! {
        div { class: "player player--video",
            iframe {
                id: MEDIA_ELEMENT_ID,
                class: "player__frame",
                src: "{embed_url}",
                title: "Lesson video",
                "allow": "autoplay; encrypted-media",
                "referrerpolicy": "strict-origin-when-cross-origin",
            }
            PlayerToolbar { tracker, target: CommandTarget::Hosted(provider) }
        }
    }
}

#[component]
fn PlayerToolbar(tracker: TrackerHandle, target: CommandTarget) -> Element {
    let run = move |command: PlayerCommand| {
        let _ = eval(&command_script(MEDIA_ELEMENT_ID, target, command));
    };
    rsx! {
        div { class: "player__toolbar",
            button { id: "player-play", class: "btn", onclick: move |_| run(PlayerCommand::Play), "Play" }
            button { id: "player-pause", class: "btn", onclick: move |_| run(PlayerCommand::Pause), "Pause" }
            button {
                id: "player-restart",
                class: "btn",
                onclick: move |_| {
                    tracker.0.restart();
                    run(PlayerCommand::Restart);
                },
                "Restart"
            }
        }
    }
}
