//! Page-side glue evaluated in the webview.
//!
//! Media scripts push `MediaEvent`s back through `dioxus.send`; the SCORM shim
//! forwards API calls the same way and keeps a value cache refreshed from Rust.

use std::collections::BTreeMap;

use lms_core::model::VideoProvider;
use lms_core::scorm::LESSON_STATUS;
use serde::Serialize;

use super::SEEK_KEYS;

/// Forward seeks further than this past the furthest watched point are undone.
const SEEK_TOLERANCE_SECS: f64 = 1.0;

fn seek_keys_js() -> String {
    serde_json::to_string(&SEEK_KEYS).unwrap_or_else(|_| "[]".to_owned())
}

pub(super) fn file_video_script(element_id: &str) -> String {
    let seek_keys = seek_keys_js();
    format!(
        r#"(function() {{
            const id = {element_id:?};
            const seekKeys = {seek_keys};
            const send = (msg) => {{
                try {{ dioxus.send(msg); }} catch (_) {{}}
            }};
            const attach = () => {{
                const el = document.getElementById(id);
                if (!el) {{
                    requestAnimationFrame(attach);
                    return;
                }}
                const state = el.__lmsTrack || (el.__lmsTrack = {{ allowed: 0, handlers: [] }});
                for (const [name, fn] of state.handlers) {{
                    el.removeEventListener(name, fn);
                }}
                const onDuration = () => {{
                    if (isFinite(el.duration) && el.duration > 0) {{
                        send({{ kind: "duration", seconds: el.duration }});
                    }}
                }};
                const onTime = () => {{
                    if (!el.seeking && el.currentTime > state.allowed) {{
                        state.allowed = el.currentTime;
                    }}
                    send({{ kind: "progress", position: el.currentTime }});
                }};
                const onSeeking = () => {{
                    if (el.currentTime > state.allowed + {SEEK_TOLERANCE_SECS:?}) {{
                        el.currentTime = state.allowed;
                    }}
                }};
                const onEnded = () => send({{ kind: "ended" }});
                const onKey = (evt) => {{
                    if (seekKeys.includes(evt.key)) evt.preventDefault();
                }};
                state.handlers = [
                    ["loadedmetadata", onDuration],
                    ["durationchange", onDuration],
                    ["timeupdate", onTime],
                    ["seeking", onSeeking],
                    ["ended", onEnded],
                    ["keydown", onKey],
                ];
                for (const [name, fn] of state.handlers) {{
                    el.addEventListener(name, fn);
                }}
                onDuration();
            }};
            attach();
        }})();"#
    )
}

/// Removes the listeners installed by the media scripts.
pub(super) fn media_teardown_script(element_id: &str) -> String {
    format!(
        r#"(function() {{
            const hosted = window.__lmsHosted;
            if (hosted && hosted.listener) {{
                window.removeEventListener("message", hosted.listener);
                hosted.listener = null;
            }}
            const el = document.getElementById({element_id:?});
            if (el && el.__lmsTrack) {{
                for (const [name, fn] of el.__lmsTrack.handlers) {{
                    el.removeEventListener(name, fn);
                }}
                el.__lmsTrack.handlers = [];
            }}
        }})();"#
    )
}

fn provider_tag(provider: VideoProvider) -> &'static str {
    match provider {
        VideoProvider::YouTube => "youtube",
        VideoProvider::Vimeo => "vimeo",
    }
}

pub(super) fn hosted_video_script(frame_id: &str, provider: VideoProvider) -> String {
    let origin = provider.message_origin();
    let provider = provider_tag(provider);
    format!(
        r#"(function() {{
            const id = {frame_id:?};
            const origin = {origin:?};
            const provider = {provider:?};
            const state = window.__lmsHosted || (window.__lmsHosted = {{ listener: null }});
            if (state.listener) {{
                window.removeEventListener("message", state.listener);
            }}
            const send = (msg) => {{
                try {{ dioxus.send(msg); }} catch (_) {{}}
            }};
            const frame = () => document.getElementById(id);
            const post = (msg) => {{
                const f = frame();
                if (f && f.contentWindow) f.contentWindow.postMessage(JSON.stringify(msg), origin);
            }};
            const subscribe = () => {{
                if (provider === "youtube") {{
                    post({{ event: "listening", id: id, channel: "widget" }});
                }} else {{
                    post({{ method: "addEventListener", value: "timeupdate" }});
                    post({{ method: "addEventListener", value: "ended" }});
                }}
            }};
            let duration = 0;
            let ended = false;
            const onDuration = (seconds) => {{
                if (typeof seconds === "number" && seconds > 0 && seconds !== duration) {{
                    duration = seconds;
                    send({{ kind: "duration", seconds: seconds }});
                }}
            }};
            const onProgress = (position) => {{
                if (typeof position !== "number") return;
                if (position < duration) ended = false;
                send({{ kind: "progress", position: position }});
            }};
            const onEnded = () => {{
                if (ended) return;
                ended = true;
                send({{ kind: "ended" }});
            }};
            state.listener = (evt) => {{
                const f = frame();
                if (evt.origin !== origin || !f || evt.source !== f.contentWindow) return;
                let data = evt.data;
                if (typeof data === "string") {{
                    try {{ data = JSON.parse(data); }} catch (_) {{ return; }}
                }}
                if (!data) return;
                if (provider === "youtube") {{
                    const info = data.info;
                    if (data.event !== "infoDelivery" || !info) return;
                    onDuration(info.duration);
                    onProgress(info.currentTime);
                    if (info.playerState === 0) onEnded();
                }} else {{
                    if (data.event === "ready") subscribe();
                    if (data.event === "timeupdate" || data.event === "playProgress") {{
                        const d = data.data || {{}};
                        onDuration(d.duration);
                        onProgress(d.seconds);
                    }}
                    if (data.event === "ended" || data.event === "finish") onEnded();
                }}
            }};
            window.addEventListener("message", state.listener);
            const attach = () => {{
                const f = frame();
                if (!f) {{
                    requestAnimationFrame(attach);
                    return;
                }}
                f.addEventListener("load", subscribe);
                subscribe();
            }};
            attach();
        }})();"#
    )
}

/// Transport commands the player toolbar can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Restart,
}

/// What the toolbar drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandTarget {
    File,
    Hosted(VideoProvider),
}

pub(super) fn command_script(element_id: &str, target: CommandTarget, command: PlayerCommand) -> String {
    match target {
        CommandTarget::File => {
            let action = match command {
                PlayerCommand::Play => "el.play().catch(() => {});",
                PlayerCommand::Pause => "el.pause();",
                PlayerCommand::Restart => {
                    "if (el.__lmsTrack) el.__lmsTrack.allowed = 0; el.currentTime = 0; el.play().catch(() => {});"
                }
            };
            format!(
                r#"(function() {{
                    const el = document.getElementById({element_id:?});
                    if (!el) return;
                    {action}
                }})();"#
            )
        }
        CommandTarget::Hosted(provider) => {
            let messages = match (provider, command) {
                (VideoProvider::YouTube, PlayerCommand::Play) => {
                    r#"[{"event":"command","func":"playVideo","args":[]}]"#
                }
                (VideoProvider::YouTube, PlayerCommand::Pause) => {
                    r#"[{"event":"command","func":"pauseVideo","args":[]}]"#
                }
                (VideoProvider::YouTube, PlayerCommand::Restart) => {
                    r#"[{"event":"command","func":"seekTo","args":[0,true]},{"event":"command","func":"playVideo","args":[]}]"#
                }
                (VideoProvider::Vimeo, PlayerCommand::Play) => r#"[{"method":"play"}]"#,
                (VideoProvider::Vimeo, PlayerCommand::Pause) => r#"[{"method":"pause"}]"#,
                (VideoProvider::Vimeo, PlayerCommand::Restart) => {
                    r#"[{"method":"setCurrentTime","value":0},{"method":"play"}]"#
                }
            };
            let origin = provider.message_origin();
            format!(
                r#"(function() {{
                    const f = document.getElementById({element_id:?});
                    if (!f || !f.contentWindow) return;
                    for (const msg of {messages}) {{
                        f.contentWindow.postMessage(JSON.stringify(msg), {origin:?});
                    }}
                }})();"#
            )
        }
    }
}

/// Tables the SCORM shim answers from without a round trip.
#[derive(Debug, Default, Serialize)]
pub(super) struct ShimTables {
    pub values: BTreeMap<&'static str, String>,
    pub errors: BTreeMap<&'static str, String>,
    pub diagnostics: BTreeMap<&'static str, String>,
}

pub(super) fn scorm_shim_script(tables: &ShimTables) -> String {
    let tables = serde_json::to_string(tables).unwrap_or_else(|_| "{}".to_owned());
    format!(
        r#"(function() {{
            const tables = {tables};
            const shim = window.__lmsScorm || (window.__lmsScorm = {{}});
            shim.values = tables.values || {{}};
            const errors = tables.errors || {{}};
            const diagnostics = tables.diagnostics || {{}};
            const send = (call) => {{
                try {{ dioxus.send(call); }} catch (_) {{}}
            }};
            shim.api = {{
                LMSInitialize: () => {{
                    send({{ method: "LMSInitialize" }});
                    return "true";
                }},
                LMSFinish: () => {{
                    send({{ method: "LMSFinish" }});
                    return "true";
                }},
                LMSGetValue: (element) => {{
                    const value = shim.values[String(element).trim()];
                    return value === undefined ? "" : String(value);
                }},
                LMSSetValue: (element, value) => {{
                    element = String(element);
                    value = String(value);
                    if (element.trim() === {LESSON_STATUS:?}) {{
                        shim.values[element.trim()] = value.trim();
                    }}
                    send({{ method: "LMSSetValue", element: element, value: value }});
                    return "true";
                }},
                LMSCommit: () => "true",
                LMSGetLastError: () => "0",
                LMSGetErrorString: (code) => errors[String(code).trim() || "0"] || "Unknown error",
                LMSGetDiagnostic: (code) => diagnostics[String(code).trim() || "0"] || "Unknown error",
            }};
            (async () => {{
                while (true) {{
                    const values = await dioxus.recv();
                    if (values) Object.assign(shim.values, values);
                }}
            }})();
        }})();"#
    )
}

pub(super) fn publish_script(name: &str) -> String {
    format!(
        r#"(function() {{
            const shim = window.__lmsScorm;
            if (shim && shim.api) window[{name:?}] = shim.api;
        }})();"#
    )
}

pub(super) fn inject_script(frame_id: &str, name: &str) -> String {
    format!(
        r#"(function() {{
            const apply = () => {{
                const f = document.getElementById({frame_id:?});
                const shim = window.__lmsScorm;
                if (!f || !shim || !shim.api) return false;
                try {{
                    f.contentWindow[{name:?}] = shim.api;
                }} catch (err) {{
                    console.debug("SCORM API not injected into frame", err);
                }}
                f.addEventListener("load", () => {{
                    try {{ f.contentWindow[{name:?}] = shim.api; }} catch (_) {{}}
                }}, {{ once: true }});
                return true;
            }};
            const retry = () => {{
                if (!apply()) requestAnimationFrame(retry);
            }};
            retry();
        }})();"#
    )
}

pub(super) fn withdraw_script(frame_id: &str, name: &str) -> String {
    format!(
        r#"(function() {{
            try {{ delete window[{name:?}]; }} catch (_) {{}}
            const f = document.getElementById({frame_id:?});
            if (f && f.contentWindow) {{
                try {{ delete f.contentWindow[{name:?}]; }} catch (_) {{}}
            }}
        }})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_video_script_snaps_forward_seeks() {
        let script = file_video_script("lesson-media");
        assert!(script.contains(r#"const id = "lesson-media";"#));
        assert!(script.contains("el.currentTime = state.allowed"));
        assert!(script.contains(r#""ArrowRight""#));
        assert!(script.contains(r#"kind: "ended""#));
    }

    #[test]
    fn hosted_script_filters_on_provider_origin() {
        let youtube = hosted_video_script("lesson-media", VideoProvider::YouTube);
        assert!(youtube.contains(r#"const origin = "https://www.youtube.com";"#));
        let vimeo = hosted_video_script("lesson-media", VideoProvider::Vimeo);
        assert!(vimeo.contains(r#"const provider = "vimeo";"#));
    }

    #[test]
    fn restart_is_the_only_seek_command() {
        let restart = command_script("v", CommandTarget::File, PlayerCommand::Restart);
        assert!(restart.contains("el.currentTime = 0"));
        let play = command_script("v", CommandTarget::File, PlayerCommand::Play);
        assert!(!play.contains("currentTime"));
        let yt = command_script(
            "v",
            CommandTarget::Hosted(VideoProvider::YouTube),
            PlayerCommand::Restart,
        );
        assert!(yt.contains(r#""func":"seekTo","args":[0,true]"#));
    }

    #[test]
    fn shim_embeds_current_values() {
        let mut tables = ShimTables::default();
        tables.values.insert(LESSON_STATUS, "incomplete".to_owned());
        let script = scorm_shim_script(&tables);
        assert!(script.contains(r#""cmi.core.lesson_status":"incomplete""#));
        assert!(script.contains("LMSSetValue"));
    }
}
