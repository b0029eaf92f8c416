use async_trait::async_trait;
use lms_core::model::ProgressReport;
use thiserror::Error;

/// Errors surfaced by progress transports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("progress endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid progress endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Outbound port for lesson progress.
///
/// One call is one attempt; callers decide what to do with failures.
#[async_trait]
pub trait ProgressTransport: Send + Sync {
    /// Deliver a single progress report.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the report could not be delivered.
    async fn send_progress(&self, report: &ProgressReport) -> Result<(), TransportError>;
}
