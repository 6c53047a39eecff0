//! Extraction options and page ranges.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Subtype;

/// Options for collecting annotations from documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Subtypes kept during aggregation; everything else is dropped silently
    pub accepted_subtypes: BTreeSet<Subtype>,

    /// Subtypes whose quads are resolved to highlighted text
    pub highlight_subtypes: BTreeSet<Subtype>,

    /// Pages to scan in each document
    pub pages: PageRange,

    /// Whether to stitch pages of a document on the rayon pool
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted subtypes.
    pub fn with_subtypes<I, S>(mut self, subtypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Subtype>,
    {
        self.accepted_subtypes = subtypes.into_iter().map(Into::into).collect();
        self
    }

    /// Accept one more subtype.
    pub fn accept(mut self, subtype: impl Into<Subtype>) -> Self {
        self.accepted_subtypes.insert(subtype.into());
        self
    }

    /// Replace the subtypes treated as highlights.
    pub fn with_highlight_subtypes<I, S>(mut self, subtypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Subtype>,
    {
        self.highlight_subtypes = subtypes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the page range.
    pub fn with_pages(mut self, pages: PageRange) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel stitching.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel stitching.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Whether annotations of this subtype are kept.
    pub fn accepts(&self, subtype: &Subtype) -> bool {
        self.accepted_subtypes.contains(subtype)
    }

    /// Whether annotations of this subtype get highlighted text.
    pub fn treats_as_highlight(&self, subtype: &Subtype) -> bool {
        self.highlight_subtypes.contains(subtype)
    }

    /// Reject option sets that can never produce output.
    pub fn validate(&self) -> Result<()> {
        if self.accepted_subtypes.is_empty() {
            return Err(Error::Config(
                "accepted_subtypes must name at least one subtype".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            accepted_subtypes: [
                Subtype::Text,
                Subtype::Highlight,
                Subtype::Underline,
                Subtype::Squiggly,
                Subtype::FreeText,
            ]
            .into_iter()
            .collect(),
            highlight_subtypes: [Subtype::Highlight, Subtype::Underline, Subtype::Squiggly]
                .into_iter()
                .collect(),
            pages: PageRange::All,
            parallel: true,
        }
    }
}

/// Requested page range, 1-indexed and inclusive.
///
/// Serialized as `[min, max]` where `[0, 0]` means the entire document; the
/// strings `"all"`, `"N"` and `"N-M"` are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "PageRangeSpec", into = "[u32; 2]")]
pub enum PageRange {
    /// Every page
    #[default]
    All,
    /// Pages `min..=max`, clamped to the document when resolved
    Span { min: u32, max: u32 },
}

impl PageRange {
    /// Build a range from its `[min, max]` form; `(0, 0)` is the entire document.
    pub fn new(min: u32, max: u32) -> Self {
        if min == 0 && max == 0 {
            PageRange::All
        } else {
            PageRange::Span { min, max }
        }
    }

    /// A single page.
    pub fn single(page: u32) -> Self {
        Self::new(page, page)
    }

    /// Parse `"all"`, `"N"` or `"N-M"`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidPageRange(s.to_string());

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageRange::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end.trim().parse().map_err(|_| invalid())?;
            return Ok(PageRange::new(start, end));
        }

        let page: u32 = s.parse().map_err(|_| invalid())?;
        Ok(PageRange::single(page))
    }

    /// Clamp against a document's page count.
    ///
    /// Both bounds are clamped to `[1, total_pages]` and swapped if reversed.
    /// A document without pages resolves to an empty range.
    pub fn resolve(&self, total_pages: u32) -> ResolvedPages {
        match *self {
            PageRange::All => ResolvedPages {
                first: 1,
                last: total_pages,
                entire_document: true,
            },
            PageRange::Span { .. } if total_pages == 0 => ResolvedPages {
                first: 1,
                last: 0,
                entire_document: false,
            },
            PageRange::Span { min, max } => {
                let lo = min.clamp(1, total_pages);
                let hi = max.clamp(1, total_pages);
                ResolvedPages {
                    first: lo.min(hi),
                    last: lo.max(hi),
                    entire_document: false,
                }
            }
        }
    }
}

impl FromStr for PageRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PageRange::parse(s)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRange::All => f.write_str("all"),
            PageRange::Span { min, max } if min == max => write!(f, "{}", min),
            PageRange::Span { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRangeSpec {
    Pair([u32; 2]),
    Text(String),
}

impl TryFrom<PageRangeSpec> for PageRange {
    type Error = Error;

    fn try_from(spec: PageRangeSpec) -> Result<Self> {
        match spec {
            PageRangeSpec::Pair([min, max]) => Ok(PageRange::new(min, max)),
            PageRangeSpec::Text(s) => s.parse(),
        }
    }
}

impl From<PageRange> for [u32; 2] {
    fn from(range: PageRange) -> Self {
        match range {
            PageRange::All => [0, 0],
            PageRange::Span { min, max } => [min, max],
        }
    }
}

/// The effective page range after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPages {
    /// First page scanned (1-indexed)
    pub first: u32,

    /// Last page scanned, inclusive
    pub last: u32,

    /// Whether the whole document was requested
    pub entire_document: bool,
}

impl ResolvedPages {
    /// Page numbers to scan.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// Number of pages to scan.
    pub fn len(&self) -> u32 {
        (self.last + 1).saturating_sub(self.first)
    }

    /// Whether no page will be scanned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
