//! Page identity derived from the current location.
//!
//! TOC entries are keyed by the last element of the page path, optionally
//! followed by the `#anchor` of a heading on that page.

use std::fmt;
use std::str::FromStr;

use toc_types::TocError;
use url::Url;

/// Path and fragment of the page being displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    /// Empty, or the fragment including its leading `#`
    fragment: String,
}

impl Location {
    /// Build a location from a path and a fragment.
    ///
    /// The fragment may be given with or without its leading `#`. A bare `#`
    /// counts as no fragment.
    pub fn new(path: impl Into<String>, fragment: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            fragment: normalize_fragment(fragment.as_ref()),
        }
    }

    /// Location without a fragment.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self::new(path, "")
    }

    /// Parse an absolute URL such as `https://host/essential/go/5-strings#trim`.
    pub fn parse(input: &str) -> Result<Self, TocError> {
        let url = Url::parse(input).map_err(|e| TocError::InvalidUrl(format!("{input}: {e}")))?;
        Ok(Self::new(url.path(), url.fragment().unwrap_or_default()))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fragment including the leading `#`, or `""`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Last element of the path.
    pub fn path_tail(&self) -> &str {
        path_tail(&self.path)
    }

    /// Last element of the path followed by the fragment.
    ///
    /// This is the key TOC entries are matched against.
    pub fn path_tail_with_fragment(&self) -> String {
        format!("{}{}", self.path_tail(), self.fragment)
    }
}

fn normalize_fragment(fragment: &str) -> String {
    match fragment.strip_prefix('#').unwrap_or(fragment) {
        "" => String::new(),
        rest => format!("#{rest}"),
    }
}

/// Final `/`-separated element of `path`; empty when `path` ends with `/`.
pub fn path_tail(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

impl FromStr for Location {
    type Err = TocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.fragment)
    }
}
