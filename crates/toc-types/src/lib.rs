//! # toc-types
//!
//! Shared domain types for essential-toc.
//!
//! - TOC entries: the flat, parent-linked outline a book ships with
//! - `TocItems`: read access to that outline by index
//! - Settings: layered configuration
//! - Errors

pub mod config;
pub mod entry;
pub mod error;

pub use config::{Settings, TelemetrySettings};
pub use entry::{TocEntry, TocItems, NO_INDEX};
pub use error::TocError;
