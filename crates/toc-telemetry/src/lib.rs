//! Remote logging for essential-toc.
//!
//! Sends JSON records to a log ingestion endpoint without ever blocking or
//! failing the caller. Outcomes are reported as diagnostics only.

mod error;
pub mod logger;
pub mod mock;
pub mod transport;

pub use error::TelemetryError;
pub use logger::{Diagnostic, DiagnosticObserver, RemoteLogger};
pub use transport::{
    HttpTransport, LogTransport, RemoteLoggerConfig, TransportResponse, JSON_CONTENT_TYPE,
};
