//! Error types for remote logging.

use thiserror::Error;

/// Error type for telemetry operations.
///
/// These never reach callers of `send_log`; they surface only from logger
/// construction and inside diagnostics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("api_key missing".to_string());
        assert!(err.to_string().contains("Invalid configuration"));

        let err = TelemetryError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
