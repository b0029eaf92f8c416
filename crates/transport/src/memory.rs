use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lms_core::model::ProgressReport;

use crate::port::{ProgressTransport, TransportError};

/// Records delivered reports in memory. Can be switched to fail every call.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    reports: Arc<Mutex<Vec<ProgressReport>>>,
    attempts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl InMemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails with a connection error.
    #[must_use]
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Reports delivered so far, in arrival order.
    #[must_use]
    pub fn reports(&self) -> Vec<ProgressReport> {
        self.reports
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of send attempts, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressTransport for InMemoryTransport {
    async fn send_progress(&self, report: &ProgressReport) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Connection("transport offline".to_string()));
        }
        let mut guard = self
            .reports
            .lock()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        guard.push(report.clone());
        Ok(())
    }
}
