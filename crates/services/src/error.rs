//! Shared error types for the services crate.

use thiserror::Error;

/// Failures of a page hosting the SCORM API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    #[error("frame is served from another origin: {0}")]
    CrossOrigin(String),
    #[error("script failed: {0}")]
    Script(String),
}

/// Errors emitted by the SCORM bridge and registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScormError {
    #[error("a SCORM player is already mounted for {0}")]
    AlreadyMounted(String),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("malformed SCORM call: {0}")]
    MalformedCall(#[from] serde_json::Error),
}

/// Errors emitted while assembling player services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerServicesError {
    #[error(transparent)]
    Transport(#[from] transport::TransportError),
}
