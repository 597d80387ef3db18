//! End-to-end test infrastructure for essential-toc.
//!
//! Provides a shared TestHarness that builds a small book, writes its TOC
//! data to disk and loads it back the way the site does.

use std::path::PathBuf;

use toc_nav::{BookOutline, Toc, TocBuilder};

/// Outline of a two-chapter book with articles and headings.
pub const SAMPLE_OUTLINE: &str = r#"{
  "title": "Essential Go",
  "chapters": [
    {
      "title": "Getting started",
      "url": "1-getting-started",
      "headings": [{ "text": "Installing", "id": "installing" }],
      "articles": [
        {
          "title": "Hello, world",
          "url": "2-hello-world",
          "search": ["first program"],
          "headings": [
            { "text": "Running", "id": "running" },
            { "text": "Compiling", "id": "compiling" }
          ]
        },
        { "title": "Tooling", "url": "3-tooling" }
      ]
    },
    {
      "title": "Strings",
      "url": "4-strings",
      "articles": [
        {
          "title": "Trimming",
          "url": "5-trimming",
          "headings": [{ "text": "TrimSpace", "id": "trimspace" }]
        }
      ]
    }
  ]
}"#;

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Generated `toc_search.js`
    pub toc_path: PathBuf,
    /// TOC loaded back from `toc_path`
    pub toc: Toc,
}

impl TestHarness {
    /// Build the sample book and load its TOC from disk.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let toc_path = temp_dir.path().join("toc_search.js");

        let outline = BookOutline::from_json(SAMPLE_OUTLINE).expect("Failed to parse outline");
        TocBuilder::build(&outline)
            .expect("Failed to build TOC")
            .save(&toc_path, false)
            .expect("Failed to write TOC");

        let toc = Toc::load(&toc_path).expect("Failed to load TOC");

        Self {
            _temp_dir: temp_dir,
            toc_path,
            toc,
        }
    }

    /// Index of the entry with `url`.
    pub fn index_of(&self, url: &str) -> usize {
        self.toc
            .entries()
            .iter()
            .position(|e| e.url == url)
            .unwrap_or_else(|| panic!("No entry with url {url}"))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
