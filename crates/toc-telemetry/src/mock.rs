//! Test transports.
//!
//! Useful for exercising `RemoteLogger` without a network.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{LogTransport, TransportResponse};
use crate::TelemetryError;

/// Transport that fails every request, like an offline browser.
#[derive(Debug)]
pub struct FailingTransport {
    reason: String,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self::with_reason("network unreachable")
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogTransport for FailingTransport {
    async fn post(&self, _body: String) -> Result<TransportResponse, TelemetryError> {
        Err(TelemetryError::Transport(self.reason.clone()))
    }
}

/// Transport that keeps every body and answers with a fixed status.
#[derive(Debug)]
pub struct RecordingTransport {
    status: u16,
    bodies: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_status(200)
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            bodies: Mutex::new(Vec::new()),
        }
    }

    /// Bodies posted so far, oldest first.
    pub fn bodies(&self) -> Vec<String> {
        self.bodies
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogTransport for RecordingTransport {
    async fn post(&self, body: String) -> Result<TransportResponse, TelemetryError> {
        if let Ok(mut bodies) = self.bodies.lock() {
            bodies.push(body);
        }
        Ok(TransportResponse::with_status(self.status))
    }
}

/// Transport that answers only after a delay, like a slow sink.
#[derive(Debug)]
pub struct SlowTransport {
    delay: Duration,
    inner: RecordingTransport,
}

impl SlowTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingTransport::new(),
        }
    }

    /// Bodies that reached the sink so far.
    pub fn bodies(&self) -> Vec<String> {
        self.inner.bodies()
    }
}

#[async_trait]
impl LogTransport for SlowTransport {
    async fn post(&self, body: String) -> Result<TransportResponse, TelemetryError> {
        tokio::time::sleep(self.delay).await;
        self.inner.post(body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_transport() {
        let transport = FailingTransport::with_reason("offline");
        let err = transport.post("{}".to_string()).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn test_recording_transport() {
        let transport = RecordingTransport::with_status(500);
        let response = transport.post("{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(transport.bodies(), vec!["{\"a\":1}".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_transport_waits() {
        let transport = SlowTransport::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        let response = transport.post("{}".to_string()).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(transport.bodies().len(), 1);
    }
}
