//! TOC expansion for the current location.
//!
//! Finding the entry for the displayed page and expanding every ancestor so
//! that entry is visible in the outline.

use std::collections::HashSet;

use tracing::{debug, warn};

use toc_types::TocItems;

use crate::location::Location;
use crate::selection::SelectionStore;

/// Configuration for the expansion tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum number of entries expanded for one match (the match included)
    pub max_depth: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Index of the first entry whose url equals the location's tail and fragment.
pub fn find_index_for_current_url<I>(location: &Location, items: &I) -> Option<usize>
where
    I: TocItems + ?Sized,
{
    let current = location.path_tail_with_fragment();
    (0..items.len()).find(|&idx| items.url(idx) == Some(current.as_str()))
}

/// Tracks which TOC entries are expanded.
///
/// Owned by whatever renders the outline; each rendering owns its own tracker.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    config: TrackerConfig,
    /// Expanded indices, matched entry first, root last
    expanded: Vec<usize>,
}

impl ExpansionTracker {
    /// Create a tracker with nothing expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            expanded: Vec::new(),
        }
    }

    /// Re-resolve expansion for `location`.
    ///
    /// Clears the expanded set, then, if an entry matches, selects it and
    /// expands it and all of its ancestors. Returns the matched index, or
    /// `None` (with nothing expanded and the selection left alone) when no
    /// entry matches.
    pub fn expand_for_current_url<I>(
        &mut self,
        location: &Location,
        items: &I,
        selection: &SelectionStore,
    ) -> Option<usize>
    where
        I: TocItems + ?Sized,
    {
        self.expanded.clear();

        let Some(idx) = find_index_for_current_url(location, items) else {
            debug!(location = %location, "No TOC entry for location");
            return None;
        };

        selection.set(idx);
        self.expand_upwards(idx, items);

        debug!(
            location = %location,
            idx,
            expanded = self.expanded.len(),
            "Expanded TOC for location"
        );

        Some(idx)
    }

    /// Expand `idx` and each ancestor, stopping at a root, a revisited index,
    /// an index outside `items`, or the depth cap.
    fn expand_upwards<I>(&mut self, idx: usize, items: &I)
    where
        I: TocItems + ?Sized,
    {
        let mut visited = HashSet::new();
        let mut current = Some(idx);

        while let Some(idx) = current {
            if idx >= items.len() {
                warn!(idx, len = items.len(), "TOC parent index out of range");
                break;
            }
            if !visited.insert(idx) {
                warn!(idx, "Cycle in TOC parent links");
                break;
            }
            if self.expanded.len() >= self.config.max_depth {
                warn!(idx, max_depth = self.config.max_depth, "TOC ascent depth cap reached");
                break;
            }

            self.expanded.push(idx);
            current = items.parent_idx(idx);
        }
    }

    /// True if `idx` is expanded.
    pub fn is_expanded(&self, idx: usize) -> bool {
        self.expanded.contains(&idx)
    }

    /// Expanded indices in the order they were expanded.
    pub fn expanded(&self) -> &[usize] {
        &self.expanded
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}
