//! Shared "currently selected TOC entry" cell.
//!
//! The tracker writes it; rendering code reads it or subscribes to changes.

use std::sync::Arc;

use tokio::sync::watch;

/// Settable, observable cell holding the selected TOC index.
///
/// Clones share the same cell.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    sender: Arc<watch::Sender<Option<usize>>>,
}

impl SelectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Currently selected index.
    pub fn get(&self) -> Option<usize> {
        *self.sender.borrow()
    }

    /// Select `idx`, notifying subscribers.
    pub fn set(&self, idx: usize) {
        self.sender.send_replace(Some(idx));
    }

    /// Clear the selection.
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// Receiver that observes every later change.
    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.sender.subscribe()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}
