//! TOC navigation library for essential-toc.
//!
//! Provides:
//! - Page identity from the current location (`location`)
//! - Expansion of the entry matching that location and its ancestors (`tracker`)
//! - The shared selected-entry cell (`selection`)
//! - Loading and emitting the shipped TOC data (`loader`)
//! - Building that data from a book outline (`builder`)

pub mod builder;
pub mod loader;
pub mod location;
pub mod selection;
pub mod tracker;

pub use builder::{ArticleOutline, BookOutline, ChapterOutline, HeadingOutline, TocBuilder};
pub use loader::Toc;
pub use location::{path_tail, Location};
pub use selection::SelectionStore;
pub use tracker::{find_index_for_current_url, ExpansionTracker, TrackerConfig};
