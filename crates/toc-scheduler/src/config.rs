//! Debounce configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SchedulerError;

/// Configuration for a debouncer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period before the callback fires (milliseconds).
    /// Defaults to 250.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    250
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

impl DebounceConfig {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    /// Quiet period as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.delay_ms == 0 {
            return Err(SchedulerError::InvalidDelay(
                "delay_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
