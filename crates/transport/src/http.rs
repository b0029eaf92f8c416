use std::env;
use std::time::Duration;

use async_trait::async_trait;
use lms_core::model::ProgressReport;
use reqwest::Client;
use url::Url;

use crate::port::{ProgressTransport, TransportError};

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

#[derive(Clone, Debug)]
pub struct HttpProgressConfig {
    pub api_base: String,
    pub token: Option<String>,
    /// Per-request timeout. `None` leaves hung requests to be abandoned by the caller.
    pub timeout: Option<Duration>,
}

impl Default for HttpProgressConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            token: None,
            timeout: None,
        }
    }
}

impl HttpProgressConfig {
    /// Reads `LMS_API_BASE`, `LMS_API_TOKEN` and `LMS_API_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_base = env::var("LMS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        let token = env::var("LMS_API_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let timeout = env::var("LMS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self {
            api_base,
            token,
            timeout,
        }
    }

    /// Absolute URL of the progress endpoint.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidEndpoint` if the base URL does not parse.
    pub fn progress_url(&self) -> Result<Url, TransportError> {
        let raw = format!("{}/progress", self.api_base.trim().trim_end_matches('/'));
        Url::parse(&raw).map_err(|_| TransportError::InvalidEndpoint(raw))
    }
}

/// Sends reports to `POST {api_base}/progress` as JSON.
#[derive(Clone)]
pub struct HttpProgressTransport {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpProgressTransport {
    /// # Errors
    ///
    /// Returns `TransportError` if the endpoint is invalid or the client cannot be built.
    pub fn new(config: &HttpProgressConfig) -> Result<Self, TransportError> {
        let endpoint = config.progress_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
            token: config.token.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProgressTransport for HttpProgressTransport {
    async fn send_progress(&self, report: &ProgressReport) -> Result<(), TransportError> {
        let mut request = self.client.post(self.endpoint.clone()).json(report);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TransportError::HttpStatus(response.status()));
        }

        tracing::trace!(
            lesson = %report.lesson_id,
            sequence = report.sequence,
            "progress delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_url_appends_segment() {
        let config = HttpProgressConfig {
            api_base: "https://lms.example.com/api/v1/".into(),
            ..HttpProgressConfig::default()
        };
        assert_eq!(
            config.progress_url().unwrap().as_str(),
            "https://lms.example.com/api/v1/progress"
        );
    }

    #[test]
    fn rejects_unparsable_base() {
        let config = HttpProgressConfig {
            api_base: "no scheme here".into(),
            ..HttpProgressConfig::default()
        };
        assert!(matches!(
            config.progress_url(),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn builds_transport_for_default_base() {
        let transport = HttpProgressTransport::new(&HttpProgressConfig::default()).unwrap();
        assert_eq!(transport.endpoint().path(), "/api/progress");
    }
}
