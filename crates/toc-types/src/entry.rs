//! Table of Contents (TOC) entry types.
//!
//! The TOC shipped with a book is a flat, index-addressed array. Each entry is
//! one chapter, article or heading and points at its parent by index:
//!
//! ```text
//! [is_expanded, url, parent_idx, first_child_idx, title, synonym, synonym, ...]
//! ```
//!
//! Missing indices are encoded as `-1` on the wire and as `None` in Rust.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire value meaning "no index".
pub const NO_INDEX: i64 = -1;

/// A single entry of the flat TOC array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Initial expansion flag shipped with the data
    pub is_expanded: bool,

    /// Last path element of the page, plus `#anchor` for headings
    pub url: String,

    /// Index of the parent entry, `None` for top-level chapters
    pub parent_idx: Option<usize>,

    /// Index of the first entry whose parent is this one
    pub first_child_idx: Option<usize>,

    /// Display title
    pub title: String,

    /// Alternative search terms
    pub synonyms: Vec<String>,
}

impl TocEntry {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            is_expanded: false,
            url: url.into(),
            parent_idx: None,
            first_child_idx: None,
            title: title.into(),
            synonyms: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_idx: usize) -> Self {
        self.parent_idx = Some(parent_idx);
        self
    }

    pub fn with_synonyms(mut self, synonyms: Vec<String>) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// True for top-level entries.
    pub fn is_root(&self) -> bool {
        self.parent_idx.is_none()
    }
}

fn index_to_wire(idx: Option<usize>) -> i64 {
    idx.map(|i| i as i64).unwrap_or(NO_INDEX)
}

fn index_from_wire<E: de::Error>(value: i64) -> Result<Option<usize>, E> {
    match value {
        NO_INDEX => Ok(None),
        v if v >= 0 => Ok(Some(v as usize)),
        v => Err(E::custom(format!("invalid TOC index {v}"))),
    }
}

impl Serialize for TocEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(5 + self.synonyms.len()))?;
        seq.serialize_element(&self.is_expanded)?;
        seq.serialize_element(&self.url)?;
        seq.serialize_element(&index_to_wire(self.parent_idx))?;
        seq.serialize_element(&index_to_wire(self.first_child_idx))?;
        seq.serialize_element(&self.title)?;
        for synonym in &self.synonyms {
            seq.serialize_element(synonym)?;
        }
        seq.end()
    }
}

struct TocEntryVisitor;

impl<'de> Visitor<'de> for TocEntryVisitor {
    type Value = TocEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array [is_expanded, url, parent_idx, first_child_idx, title, synonyms...]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TocEntry, A::Error> {
        let is_expanded: bool = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let url: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let parent: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        let first_child: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(3, &self))?;
        let title: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(4, &self))?;

        let mut synonyms = Vec::new();
        while let Some(synonym) = seq.next_element::<String>()? {
            synonyms.push(synonym);
        }

        Ok(TocEntry {
            is_expanded,
            url,
            parent_idx: index_from_wire(parent)?,
            first_child_idx: index_from_wire(first_child)?,
            title,
            synonyms,
        })
    }
}

impl<'de> Deserialize<'de> for TocEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(TocEntryVisitor)
    }
}

/// Read access to an index-addressed TOC.
///
/// The tracker only needs this capability; ownership of the entries stays with
/// whoever loaded them. Out-of-range indices return `None`.
pub trait TocItems {
    /// Number of entries.
    fn len(&self) -> usize;

    /// URL of the entry at `idx`.
    fn url(&self, idx: usize) -> Option<&str>;

    /// Parent index of the entry at `idx`, `None` for roots and bad indices.
    fn parent_idx(&self, idx: usize) -> Option<usize>;

    /// Title of the entry at `idx`.
    fn title(&self, _idx: usize) -> Option<&str> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TocItems for [TocEntry] {
    fn len(&self) -> usize {
        <[TocEntry]>::len(self)
    }

    fn url(&self, idx: usize) -> Option<&str> {
        self.get(idx).map(|e| e.url.as_str())
    }

    fn parent_idx(&self, idx: usize) -> Option<usize> {
        self.get(idx).and_then(|e| e.parent_idx)
    }

    fn title(&self, idx: usize) -> Option<&str> {
        self.get(idx).map(|e| e.title.as_str())
    }
}

impl TocItems for Vec<TocEntry> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn url(&self, idx: usize) -> Option<&str> {
        TocItems::url(self.as_slice(), idx)
    }

    fn parent_idx(&self, idx: usize) -> Option<usize> {
        TocItems::parent_idx(self.as_slice(), idx)
    }

    fn title(&self, idx: usize) -> Option<&str> {
        TocItems::title(self.as_slice(), idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let entry = TocEntry::new("intro", "Introduction")
            .with_parent(3)
            .with_synonyms(vec!["start".to_string()]);

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"[false,"intro",3,-1,"Introduction","start"]"#);
    }

    #[test]
    fn test_entry_from_generated_data() {
        let json = r#"[false, "5-strings#trimming", 12, -1, "Trimming", "strip", "trim space"]"#;
        let entry: TocEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.url, "5-strings#trimming");
        assert_eq!(entry.parent_idx, Some(12));
        assert_eq!(entry.first_child_idx, None);
        assert_eq!(entry.synonyms, vec!["strip", "trim space"]);
        assert!(!entry.is_root());
    }

    #[test]
    fn test_entry_rejects_short_array() {
        let result = serde_json::from_str::<TocEntry>(r#"[false, "intro", -1]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_entry_rejects_negative_index() {
        let result = serde_json::from_str::<TocEntry>(r#"[false, "intro", -5, -1, "Intro"]"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid TOC index -5"), "got: {err}");
    }

    #[test]
    fn test_toc_items_accessors() {
        let items = vec![
            TocEntry::new("basics", "Basics"),
            TocEntry::new("basics#vars", "Variables").with_parent(0),
        ];

        assert_eq!(TocItems::len(&items), 2);
        assert_eq!(items.url(1), Some("basics#vars"));
        assert_eq!(items.parent_idx(1), Some(0));
        assert_eq!(items.parent_idx(0), None);
        assert_eq!(items.title(0), Some("Basics"));
        assert_eq!(items.url(9), None);
        assert_eq!(items.parent_idx(9), None);
    }
}
