use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{HostError, ScormError};
use crate::scorm::bridge::ScormBridge;

/// Names SCORM content looks for when walking up its ancestor windows.
pub const API_GLOBAL_NAMES: [&str; 3] = ["API", "API_1484_11", "SCORM_API"];

/// The page that exposes the API object to package content.
pub trait ScormHost: Send + Sync {
    /// Expose the API under `name` on the hosting window.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the name cannot be published.
    fn publish(&self, name: &str) -> Result<(), HostError>;

    /// Expose the API under `name` inside the content frame itself.
    ///
    /// # Errors
    ///
    /// Returns `HostError::CrossOrigin` when the frame is served from another origin.
    fn inject_into_child(&self, name: &str) -> Result<(), HostError>;

    /// Remove `name` from the hosting window and, where reachable, the frame.
    fn withdraw(&self, name: &str);
}

/// Allows a single mounted SCORM bridge per process.
#[derive(Clone, Default)]
pub struct ScormRegistry {
    active: Arc<Mutex<Option<String>>>,
}

impl ScormRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, Option<String>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.active().is_some()
    }

    /// Publish `bridge` through `host` and hold the single-instance slot.
    ///
    /// A frame that cannot be injected (cross-origin) is logged and tolerated; only
    /// the hosting window's names are then reachable.
    ///
    /// # Errors
    ///
    /// Returns `ScormError::AlreadyMounted` if another bridge is live, or
    /// `ScormError::Host` if publishing on the hosting window fails.
    pub fn mount(
        &self,
        bridge: Arc<ScormBridge>,
        host: Arc<dyn ScormHost>,
    ) -> Result<ScormMount, ScormError> {
        let lesson = bridge.tracker().lesson().to_string();
        {
            let mut active = self.active();
            if let Some(current) = active.as_ref() {
                return Err(ScormError::AlreadyMounted(current.clone()));
            }
            *active = Some(lesson.clone());
        }

        // From here on the guard owns the slot; an early return drops it and withdraws.
        let mut mount = ScormMount {
            registry: self.clone(),
            bridge,
            host,
            published: Vec::with_capacity(API_GLOBAL_NAMES.len()),
        };

        for name in API_GLOBAL_NAMES {
            mount.host.publish(name)?;
            mount.published.push(name);
        }

        for name in API_GLOBAL_NAMES {
            match mount.host.inject_into_child(name) {
                Ok(()) => {}
                Err(HostError::CrossOrigin(origin)) => {
                    tracing::debug!(%lesson, %origin, name, "frame is cross-origin; API only on host window");
                    break;
                }
                Err(err) => {
                    tracing::warn!(%lesson, name, error = %err, "could not inject SCORM API into frame");
                    break;
                }
            }
        }

        tracing::info!(%lesson, "SCORM API mounted");
        Ok(mount)
    }

    fn release(&self) {
        *self.active() = None;
    }
}

/// Live SCORM registration. Dropping it withdraws every published name.
pub struct ScormMount {
    registry: ScormRegistry,
    bridge: Arc<ScormBridge>,
    host: Arc<dyn ScormHost>,
    published: Vec<&'static str>,
}

impl ScormMount {
    #[must_use]
    pub fn bridge(&self) -> &Arc<ScormBridge> {
        &self.bridge
    }

    #[must_use]
    pub fn published(&self) -> &[&'static str] {
        &self.published
    }
}

impl Drop for ScormMount {
    fn drop(&mut self) {
        for name in self.published.drain(..) {
            self.host.withdraw(name);
        }
        self.bridge.close();
        self.registry.release();
        tracing::debug!(lesson = %self.bridge.tracker().lesson(), "SCORM API withdrawn");
    }
}

/// Host that records names in memory. Can simulate a cross-origin frame.
#[derive(Clone, Default)]
pub struct InMemoryHost {
    window: Arc<Mutex<BTreeSet<String>>>,
    frame: Arc<Mutex<BTreeSet<String>>>,
    cross_origin: bool,
}

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cross_origin() -> Self {
        Self {
            cross_origin: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn window_names(&self) -> Vec<String> {
        snapshot(&self.window)
    }

    #[must_use]
    pub fn frame_names(&self) -> Vec<String> {
        snapshot(&self.frame)
    }
}

fn snapshot(names: &Mutex<BTreeSet<String>>) -> Vec<String> {
    names
        .lock()
        .map(|guard| guard.iter().cloned().collect())
        .unwrap_or_default()
}

impl ScormHost for InMemoryHost {
    fn publish(&self, name: &str) -> Result<(), HostError> {
        self.window
            .lock()
            .map_err(|e| HostError::Script(e.to_string()))?
            .insert(name.to_owned());
        Ok(())
    }

    fn inject_into_child(&self, name: &str) -> Result<(), HostError> {
        if self.cross_origin {
            return Err(HostError::CrossOrigin("https://content.example.com".into()));
        }
        self.frame
            .lock()
            .map_err(|e| HostError::Script(e.to_string()))?
            .insert(name.to_owned());
        Ok(())
    }

    fn withdraw(&self, name: &str) {
        for names in [&self.window, &self.frame] {
            if let Ok(mut guard) = names.lock() {
                guard.remove(name);
            }
        }
    }
}
