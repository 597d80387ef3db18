//! Fire-and-forget remote logger.
//!
//! `send_log` returns immediately. Delivery runs on a background task whose
//! only effect, besides the request itself, is one diagnostic. Deliveries
//! still in flight can be awaited with `shutdown` before the runtime goes away.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use toc_types::TelemetrySettings;

use crate::transport::{HttpTransport, LogTransport, RemoteLoggerConfig};
use crate::TelemetryError;

/// Outcome of one `send_log` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The sink answered, with any status
    Sent { status: u16 },

    /// Nothing was delivered
    Failed { reason: String },
}

/// Callback receiving every diagnostic.
pub type DiagnosticObserver = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Best-effort logger: never retries, never surfaces errors.
#[derive(Clone)]
pub struct RemoteLogger {
    transport: Option<Arc<dyn LogTransport>>,
    observer: Option<DiagnosticObserver>,
    tasks: TaskTracker,
}

impl RemoteLogger {
    /// Create a logger posting over HTTP.
    pub fn new(config: RemoteLoggerConfig) -> Result<Self, TelemetryError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a logger using a custom transport.
    pub fn with_transport(transport: Arc<dyn LogTransport>) -> Self {
        Self {
            transport: Some(transport),
            observer: None,
            tasks: TaskTracker::new(),
        }
    }

    /// Logger that drops every record.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            observer: None,
            tasks: TaskTracker::new(),
        }
    }

    /// HTTP logger when telemetry is enabled, otherwise a disabled one.
    pub fn from_settings(settings: &TelemetrySettings) -> Result<Self, TelemetryError> {
        if !settings.enabled {
            return Ok(Self::disabled());
        }
        Self::new(RemoteLoggerConfig::from_settings(settings)?)
    }

    /// Also hand every diagnostic to `observer`.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Number of deliveries still in flight, across all clones.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Serialize `payload` and post it in the background.
    ///
    /// Produces exactly one diagnostic per call on an enabled logger. Must be
    /// called from within a tokio runtime for the record to be sent.
    pub fn send_log<T>(&self, payload: &T)
    where
        T: Serialize + ?Sized,
    {
        let Some(transport) = self.transport.clone() else {
            debug!("Telemetry disabled, dropping log record");
            return;
        };

        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                self.report(Diagnostic::Failed {
                    reason: TelemetryError::from(e).to_string(),
                });
                return;
            }
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.report(Diagnostic::Failed {
                    reason: format!("no runtime to send on: {e}"),
                });
                return;
            }
        };

        let logger = self.clone();
        self.tasks.spawn_on(
            async move {
                match transport.post(body).await {
                    Ok(response) => {
                        info!(
                            status = response.status,
                            headers = ?response.headers,
                            "sent log to logflare"
                        );
                        logger.notify(&Diagnostic::Sent {
                            status: response.status,
                        });
                    }
                    Err(e) => logger.report(Diagnostic::Failed {
                        reason: e.to_string(),
                    }),
                }
            },
            &handle,
        );
    }

    /// Wait up to `timeout` for deliveries started by this logger or its clones.
    ///
    /// Returns false if some were still running when the timeout hit; those are
    /// abandoned without a diagnostic once the runtime shuts down.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tasks.close();
        let pending = self.tasks.len();
        if pending > 0 {
            debug!(pending, "Waiting for in-flight log records");
        }

        let drained = tokio::time::timeout(timeout, self.tasks.wait()).await.is_ok();
        if !drained {
            warn!(
                pending = self.tasks.len(),
                timeout_ms = timeout.as_millis() as u64,
                "Abandoning in-flight log records"
            );
        }
        drained
    }

    fn report(&self, diagnostic: Diagnostic) {
        if let Diagnostic::Failed { reason } = &diagnostic {
            warn!(reason = %reason, "exception in logflare");
        }
        self.notify(&diagnostic);
    }

    fn notify(&self, diagnostic: &Diagnostic) {
        if let Some(observer) = &self.observer {
            observer(diagnostic);
        }
    }
}

impl std::fmt::Debug for RemoteLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLogger")
            .field("enabled", &self.is_enabled())
            .field("observer", &self.observer.is_some())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
