//! Loading and emitting the TOC data file.
//!
//! Books ship their outline as a script assigning a JSON array:
//!
//! ```text
//! gBookToc = [[false,"1-basics",-1,1,"Basics"], ...];
//! ```
//!
//! A plain JSON array is accepted as well.

use std::path::Path;

use tracing::debug;

use toc_types::{TocEntry, TocError, TocItems};

/// Variable the generated script assigns.
pub const TOC_VARIABLE: &str = "gBookToc";

/// A loaded, validated TOC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    entries: Vec<TocEntry>,
}

impl Toc {
    /// Wrap entries after checking their indices.
    pub fn new(entries: Vec<TocEntry>) -> Result<Self, TocError> {
        let toc = Self { entries };
        toc.validate()?;
        Ok(toc)
    }

    /// Parse a `name = [...];` script or a bare JSON array.
    pub fn from_script(source: &str) -> Result<Self, TocError> {
        let json = strip_assignment(source);
        let entries: Vec<TocEntry> = serde_json::from_str(json)?;
        debug!(entries = entries.len(), "Parsed TOC data");
        Self::new(entries)
    }

    /// Read and parse a TOC file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TocError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_script(&source)
    }

    /// Render as a `gBookToc = [...];` script.
    pub fn to_script(&self, minify: bool) -> Result<String, TocError> {
        let json = if minify {
            serde_json::to_string(&self.entries)?
        } else {
            serde_json::to_string_pretty(&self.entries)?
        };
        Ok(format!("{TOC_VARIABLE} = {json};"))
    }

    /// Write the script to `path`.
    pub fn save(&self, path: impl AsRef<Path>, minify: bool) -> Result<(), TocError> {
        std::fs::write(path.as_ref(), self.to_script(minify)?)?;
        Ok(())
    }

    /// Check that every parent and first-child index points inside the TOC.
    pub fn validate(&self) -> Result<(), TocError> {
        let len = self.entries.len();
        for (idx, entry) in self.entries.iter().enumerate() {
            if let Some(parent) = entry.parent_idx.filter(|&p| p >= len) {
                return Err(TocError::InvalidToc(format!(
                    "entry {idx} has parent {parent}, but only {len} entries exist"
                )));
            }
            if let Some(child) = entry.first_child_idx.filter(|&c| c >= len) {
                return Err(TocError::InvalidToc(format!(
                    "entry {idx} has first child {child}, but only {len} entries exist"
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, idx: usize) -> Option<&TocEntry> {
        self.entries.get(idx)
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TocEntry> {
        self.entries
    }

    /// Indices of the direct children of `idx`, in order.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.parent_idx == Some(idx))
            .map(|(i, _)| i)
    }
}

impl TocItems for Toc {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn url(&self, idx: usize) -> Option<&str> {
        TocItems::url(self.entries.as_slice(), idx)
    }

    fn parent_idx(&self, idx: usize) -> Option<usize> {
        TocItems::parent_idx(self.entries.as_slice(), idx)
    }

    fn title(&self, idx: usize) -> Option<&str> {
        TocItems::title(self.entries.as_slice(), idx)
    }
}

/// Drop a leading `ident =` and trailing `;` around the JSON payload.
fn strip_assignment(source: &str) -> &str {
    let trimmed = source.trim();
    let body = match trimmed.find('=') {
        Some(eq) if is_identifier(trimmed[..eq].trim()) => &trimmed[eq + 1..],
        _ => trimmed,
    };
    body.trim().trim_end_matches(';').trim_end()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
}
