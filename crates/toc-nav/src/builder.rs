//! TOC builder.
//!
//! Flattens a book outline (chapters, articles, headings) into the
//! index-addressed TOC the site ships. Order is depth-first:
//! chapter, chapter headings, then each article followed by its headings.

use serde::{Deserialize, Serialize};
use tracing::info;

use toc_types::{TocEntry, TocError};

use crate::loader::Toc;

/// An in-page heading with an optional anchor id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingOutline {
    pub text: String,

    /// Anchor id; headings without one get an empty url
    #[serde(default)]
    pub id: String,
}

/// An article page inside a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleOutline {
    pub title: String,

    /// Last path element of the article page
    pub url: String,

    /// Extra search terms
    #[serde(default, alias = "search")]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub headings: Vec<HeadingOutline>,
}

/// A chapter page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterOutline {
    pub title: String,

    /// Last path element of the chapter page
    pub url: String,

    #[serde(default)]
    pub headings: Vec<HeadingOutline>,

    #[serde(default)]
    pub articles: Vec<ArticleOutline>,
}

/// Outline of a whole book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookOutline {
    #[serde(default)]
    pub title: String,

    pub chapters: Vec<ChapterOutline>,
}

impl BookOutline {
    /// Parse an outline from JSON.
    pub fn from_json(json: &str) -> Result<Self, TocError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for the flat TOC.
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: Vec<TocEntry>,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the TOC for `book`.
    pub fn build(book: &BookOutline) -> Result<Toc, TocError> {
        let mut builder = Self::new();
        for chapter in &book.chapters {
            builder.add_chapter(chapter);
        }
        let toc = builder.finish()?;

        info!(
            book = %book.title,
            chapters = book.chapters.len(),
            entries = toc.entries().len(),
            "Built TOC"
        );
        Ok(toc)
    }

    /// Append a chapter with its headings and articles.
    pub fn add_chapter(&mut self, chapter: &ChapterOutline) -> usize {
        let chapter_idx = self.push(TocEntry::new(chapter.url.as_str(), chapter.title.trim()));
        self.add_headings(&chapter.url, &chapter.headings, chapter_idx);

        for article in &chapter.articles {
            let article_idx = self.push(
                TocEntry::new(article.url.as_str(), article.title.trim())
                    .with_parent(chapter_idx)
                    .with_synonyms(article.synonyms.clone()),
            );
            self.add_headings(&article.url, &article.headings, article_idx);
        }

        chapter_idx
    }

    fn add_headings(&mut self, page_url: &str, headings: &[HeadingOutline], parent_idx: usize) {
        for heading in headings {
            let url = if heading.id.is_empty() {
                String::new()
            } else {
                format!("{page_url}#{}", heading.id)
            };
            self.push(TocEntry::new(url, heading.text.as_str()).with_parent(parent_idx));
        }
    }

    fn push(&mut self, entry: TocEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Link each parent to its first child and validate.
    pub fn finish(mut self) -> Result<Toc, TocError> {
        link_first_children(&mut self.entries);
        Toc::new(self.entries)
    }
}

/// Set `first_child_idx` on every parent to the lowest index pointing at it.
pub fn link_first_children(entries: &mut [TocEntry]) {
    for idx in 0..entries.len() {
        let Some(parent) = entries[idx].parent_idx else {
            continue;
        };
        if let Some(parent_entry) = entries.get_mut(parent) {
            if parent_entry.first_child_idx.is_none() {
                parent_entry.first_child_idx = Some(idx);
            }
        }
    }
}
