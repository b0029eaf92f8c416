#![forbid(unsafe_code)]

pub mod error;
pub mod heartbeat;
pub mod player_services;
pub mod reporter;
pub mod scorm;
pub mod tracker;

pub use lms_core::Clock;

pub use error::{HostError, PlayerServicesError, ScormError};
pub use heartbeat::{DEFAULT_HEARTBEAT_PERIOD, HeartbeatConfig, HeartbeatHandle, spawn_heartbeat};
pub use player_services::PlayerServices;
pub use reporter::ProgressReporter;
pub use scorm::{API_GLOBAL_NAMES, InMemoryHost, ScormBridge, ScormHost, ScormMount, ScormRegistry};
pub use tracker::{CompletionCallback, LessonTracker, TrackerSnapshot};
