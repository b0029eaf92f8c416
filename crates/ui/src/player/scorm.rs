use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::document::{Eval, eval};
use dioxus::prelude::*;
use lms_core::scorm::{ERROR_CODES, ScormCall};
use services::{HostError, ScormBridge, ScormHost, ScormMount};
use url::{Origin, Url};

use super::TrackerHandle;
use super::scripts::{
    ShimTables, inject_script, publish_script, scorm_shim_script, withdraw_script,
};
use crate::context::AppContext;

pub const SCORM_FRAME_ID: &str = "lesson-scorm";

/// Publishes the API object by evaluating scripts in the hosting webview.
pub struct EvalHost {
    frame_id: &'static str,
    frame_origin: Option<String>,
}

impl EvalHost {
    #[must_use]
    pub fn new(frame_id: &'static str, launch_url: &Url) -> Self {
        // The desktop shell serves its page from a custom scheme; any http(s)
        // package is on another origin.
        let frame_origin = match launch_url.origin() {
            origin @ Origin::Tuple(..) => Some(origin.ascii_serialization()),
            Origin::Opaque(_) => None,
        };
        Self {
            frame_id,
            frame_origin,
        }
    }

    #[must_use]
    pub fn is_cross_origin(&self) -> bool {
        self.frame_origin.is_some()
    }
}

impl ScormHost for EvalHost {
    fn publish(&self, name: &str) -> Result<(), HostError> {
        let _ = eval(&publish_script(name));
        Ok(())
    }

    fn inject_into_child(&self, name: &str) -> Result<(), HostError> {
        if let Some(origin) = &self.frame_origin {
            return Err(HostError::CrossOrigin(origin.clone()));
        }
        let _ = eval(&inject_script(self.frame_id, name));
        Ok(())
    }

    fn withdraw(&self, name: &str) {
        let _ = eval(&withdraw_script(self.frame_id, name));
    }
}

fn shim_tables(bridge: &ScormBridge) -> ShimTables {
    let mut tables = ShimTables {
        values: bridge.readable_values(),
        ..ShimTables::default()
    };
    for code in ERROR_CODES {
        tables.errors.insert(
            code,
            bridge.dispatch(ScormCall::GetErrorString { code: code.into() }),
        );
        tables.diagnostics.insert(
            code,
            bridge.dispatch(ScormCall::GetDiagnostic { code: code.into() }),
        );
    }
    tables
}

/// Answers calls forwarded by the shim and pushes fresh values back after each.
async fn serve_calls(bridge: &ScormBridge, shim: &mut Eval) {
    loop {
        let raw = match shim.recv::<serde_json::Value>().await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(lesson = %bridge.tracker().lesson(), error = ?err, "SCORM shim channel closed");
                break;
            }
        };
        if let Err(err) = bridge.dispatch_json(&raw.to_string()) {
            tracing::warn!(lesson = %bridge.tracker().lesson(), error = %err, "ignoring SCORM call");
            continue;
        }
        if let Err(err) = shim.send(bridge.readable_values()) {
            tracing::debug!(error = ?err, "SCORM shim stopped listening");
            break;
        }
    }
}

/// SCORM package frame. The API is published before the frame is rendered so the
/// package finds it on load; unmounting withdraws it.
#[component]
pub fn ScormFrame(launch_url: Url, tracker: TrackerHandle) -> Element {
    let services = use_context::<AppContext>().player_services();
    let slot: Rc<RefCell<Option<ScormMount>>> = use_hook(|| Rc::new(RefCell::new(None)));
    let mut ready = use_signal(|| false);
    let mut mount_error = use_signal(|| None::<String>);

    use_future({
        let slot = Rc::clone(&slot);
        let launch_url = launch_url.clone();
        move || {
            let bridge = services.scorm_bridge(Arc::clone(&tracker.0));
            let registry = services.scorm_registry().clone();
            let host = Arc::new(EvalHost::new(SCORM_FRAME_ID, &launch_url));
            let slot = Rc::clone(&slot);
            async move {
                let mut shim = eval(&scorm_shim_script(&shim_tables(&bridge)));
                match registry.mount(Arc::clone(&bridge), host) {
                    Ok(mount) => {
                        *slot.borrow_mut() = Some(mount);
                        ready.set(true);
                    }
                    Err(err) => {
                        tracing::warn!(lesson = %bridge.tracker().lesson(), error = %err, "SCORM API unavailable");
                        mount_error.set(Some(err.to_string()));
                        return;
                    }
                }
                serve_calls(&bridge, &mut shim).await;
            }
        }
    });

    use_drop(move || {
        slot.borrow_mut().take();
    });

    rsx! {
        div { class: "player player--scorm",
            if let Some(message) = mount_error() {
                p { class: "player__error", role: "alert", "{message}" }
            } else if ready() {
                iframe {
                    id: SCORM_FRAME_ID,
                    class: "player__frame",
                    src: "{launch_url}",
                    title: "Course package",
                }
            } else {
                p { class: "player__loading", "Preparing course package..." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_packages_are_cross_origin() {
        let url = Url::parse("https://cdn.example.com/pkg/index.html").unwrap();
        let host = EvalHost::new(SCORM_FRAME_ID, &url);
        assert!(host.is_cross_origin());
        assert!(matches!(
            host.inject_into_child("API"),
            Err(HostError::CrossOrigin(ref origin)) if origin == "https://cdn.example.com"
        ));
    }

    #[test]
    fn local_packages_share_the_page() {
        let url = Url::parse("file:///opt/courses/pkg/index.html").unwrap();
        assert!(!EvalHost::new(SCORM_FRAME_ID, &url).is_cross_origin());
    }
}
