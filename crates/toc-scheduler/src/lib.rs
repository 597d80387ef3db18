//! Callback scheduling for essential-toc.
//!
//! UI code calls into the outline far more often than it needs to redraw:
//! keystrokes in the search box, scroll and resize events. The debouncer
//! collapses each burst into a single callback after a quiet period.
//!
//! # Example
//!
//! ```ignore
//! use toc_scheduler::make_debouncer;
//!
//! let debouncer = make_debouncer(250)?;
//! debouncer.schedule(|| rerun_search());
//! ```

mod config;
mod debounce;
mod error;

pub use config::DebounceConfig;
pub use debounce::{make_debouncer, Debouncer};
pub use error::SchedulerError;
