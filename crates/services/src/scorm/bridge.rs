use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use lms_core::scorm::{ScormCall, ScormRuntime, SetValueOutcome, error_string};

use crate::Clock;
use crate::error::ScormError;
use crate::tracker::LessonTracker;

/// The SCORM 1.2 API object handed to package content.
///
/// Calls are answered from the runtime; completion is forwarded to the tracker.
pub struct ScormBridge {
    runtime: Mutex<ScormRuntime>,
    tracker: Arc<LessonTracker>,
    clock: Clock,
}

impl ScormBridge {
    #[must_use]
    pub fn new(runtime: ScormRuntime, tracker: Arc<LessonTracker>, clock: Clock) -> Self {
        Self {
            runtime: Mutex::new(runtime),
            tracker,
            clock,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &Arc<LessonTracker> {
        &self.tracker
    }

    fn runtime(&self) -> MutexGuard<'_, ScormRuntime> {
        // Runtime state stays consistent across a panic mid-call; keep serving it.
        self.runtime
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn lesson_status(&self) -> String {
        self.runtime().lesson_status().to_owned()
    }

    /// Current value of every element the package may read, for page-side caches.
    #[must_use]
    pub fn readable_values(&self) -> BTreeMap<&'static str, String> {
        self.runtime().readable_values().into_iter().collect()
    }

    /// Answer one API call with the string SCORM content expects.
    pub fn dispatch(&self, call: ScormCall) -> String {
        tracing::trace!(lesson = %self.tracker.lesson(), ?call, "scorm call");
        match call {
            ScormCall::Initialize => self.runtime().initialize(self.clock.now()).to_owned(),
            ScormCall::Finish => self.runtime().finish(self.clock.now()).to_owned(),
            ScormCall::GetValue { element } => self.runtime().get_value(&element),
            ScormCall::SetValue { element, value } => self.set_value(&element, &value),
            ScormCall::Commit => self.runtime().commit().to_owned(),
            ScormCall::GetLastError => self.runtime().last_error().to_owned(),
            ScormCall::GetErrorString { code } => error_string(&code).to_owned(),
            ScormCall::GetDiagnostic { code } => self.runtime().diagnostic(&code),
        }
    }

    /// Decode a call forwarded as JSON by the page shim and answer it.
    ///
    /// # Errors
    ///
    /// Returns `ScormError::MalformedCall` if the payload is not a known call.
    pub fn dispatch_json(&self, raw: &str) -> Result<String, ScormError> {
        let call: ScormCall = serde_json::from_str(raw)?;
        Ok(self.dispatch(call))
    }

    fn set_value(&self, element: &str, value: &str) -> String {
        // Release the runtime before touching the tracker.
        let (result, outcome) = self.runtime().set_value(element, value);
        match outcome {
            SetValueOutcome::Completed(status) => {
                drop(self.tracker.scorm_status_changed(&status));
            }
            SetValueOutcome::StatusStored => {
                let status = self.lesson_status();
                drop(self.tracker.scorm_status_changed(&status));
            }
            SetValueOutcome::Discarded => {}
        }
        result.to_owned()
    }

    /// Close an open session so its time is counted. Called on unmount.
    pub(crate) fn close(&self) {
        let mut runtime = self.runtime();
        if runtime.is_session_open() {
            runtime.finish(self.clock.now());
        }
    }
}
