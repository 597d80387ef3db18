//! Error types for the scheduler crate.

use thiserror::Error;

/// Errors that can occur when setting up scheduling.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Debouncers spawn their timers on a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    /// Invalid debounce delay
    #[error("Invalid delay: {0}")]
    InvalidDelay(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchedulerError::NoRuntime("not inside a runtime".to_string());
        assert!(err.to_string().contains("No tokio runtime"));

        let err = SchedulerError::InvalidDelay("delay_ms must be > 0".to_string());
        assert!(err.to_string().contains("Invalid delay"));
    }
}
