use std::sync::Arc;

use lms_core::model::{LessonContent, LessonRef};
use lms_core::scorm::{LearnerInfo, ScormRuntime};
use transport::{HttpProgressConfig, HttpProgressTransport, ProgressTransport};

use crate::Clock;
use crate::error::PlayerServicesError;
use crate::heartbeat::HeartbeatConfig;
use crate::reporter::ProgressReporter;
use crate::scorm::{ScormBridge, ScormRegistry};
use crate::tracker::{CompletionCallback, LessonTracker};

/// Assembles what a mounted lesson needs: transport, clock, heartbeat cadence and
/// the process-wide SCORM registry.
#[derive(Clone)]
pub struct PlayerServices {
    clock: Clock,
    transport: Arc<dyn ProgressTransport>,
    heartbeat: HeartbeatConfig,
    scorm: ScormRegistry,
    learner: Option<LearnerInfo>,
}

impl PlayerServices {
    #[must_use]
    pub fn new(clock: Clock, transport: Arc<dyn ProgressTransport>) -> Self {
        Self {
            clock,
            transport,
            heartbeat: HeartbeatConfig::default(),
            scorm: ScormRegistry::new(),
            learner: None,
        }
    }

    /// Build services that report to the HTTP progress endpoint.
    ///
    /// # Errors
    ///
    /// Returns `PlayerServicesError` if the endpoint or client cannot be built.
    pub fn http(clock: Clock, config: &HttpProgressConfig) -> Result<Self, PlayerServicesError> {
        let transport = HttpProgressTransport::new(config)?;
        tracing::info!(endpoint = %transport.endpoint(), "progress transport ready");
        Ok(Self::new(clock, Arc::new(transport)))
    }

    #[must_use]
    pub fn with_heartbeat(mut self, heartbeat: HeartbeatConfig) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    #[must_use]
    pub fn with_learner(mut self, learner: LearnerInfo) -> Self {
        self.learner = Some(learner);
        self
    }

    #[must_use]
    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    #[must_use]
    pub fn scorm_registry(&self) -> &ScormRegistry {
        &self.scorm
    }

    /// Fresh tracker for one lesson mount.
    #[must_use]
    pub fn tracker(
        &self,
        lesson: LessonRef,
        content: &LessonContent,
        on_complete: Option<CompletionCallback>,
    ) -> Arc<LessonTracker> {
        let reporter = ProgressReporter::new(lesson, Arc::clone(&self.transport), self.clock);
        let tracker = LessonTracker::new(content.tracking(), reporter);
        Arc::new(match on_complete {
            Some(callback) => tracker.with_completion_callback(callback),
            None => tracker,
        })
    }

    /// SCORM API object bound to `tracker`, not yet mounted.
    #[must_use]
    pub fn scorm_bridge(&self, tracker: Arc<LessonTracker>) -> Arc<ScormBridge> {
        let runtime = match self.learner.clone() {
            Some(learner) => ScormRuntime::new().with_learner(learner),
            None => ScormRuntime::new(),
        };
        Arc::new(ScormBridge::new(runtime, tracker, self.clock))
    }
}
