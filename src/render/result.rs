//! Rendering result with statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::Level;

/// Result of rendering a batch of annotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderResult {
    /// The complete rendered document
    pub content: String,

    /// Condensed entries of every group, without headers
    pub condensed: String,

    /// Detailed entries of every group, without headers
    pub detailed: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counters collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Rendered entries per level
    pub entries: BTreeMap<Level, u32>,

    /// Entries left out by the level filter
    pub skipped: u32,

    /// Document (or folder) groups
    pub groups: u32,

    /// Topic headers
    pub topics: u32,

    /// Page markers
    pub pages: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a rendered entry.
    pub fn add_entry(&mut self, level: Level) {
        *self.entries.entry(level).or_insert(0) += 1;
    }

    /// Entries rendered at a level.
    pub fn entries_at(&self, level: Level) -> u32 {
        self.entries.get(&level).copied().unwrap_or(0)
    }

    /// Total rendered entries.
    pub fn total_entries(&self) -> u32 {
        self.entries.values().sum()
    }
}

/// Counters collected while extracting annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Documents collected successfully
    pub documents: u32,

    /// Documents that failed
    pub failed_documents: u32,

    /// Pages scanned
    pub pages_scanned: u32,

    /// Annotations delivered by the source
    pub annotations_seen: u32,

    /// Annotations of accepted subtypes
    pub annotations_kept: u32,

    /// Annotations dropped for their subtype
    pub filtered_out: u32,

    /// Highlights whose quads covered some text
    pub highlights_resolved: u32,

    /// Highlights whose quads covered no text
    pub geometry_misses: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.documents += other.documents;
        self.failed_documents += other.failed_documents;
        self.pages_scanned += other.pages_scanned;
        self.annotations_seen += other.annotations_seen;
        self.annotations_kept += other.annotations_kept;
        self.filtered_out += other.filtered_out;
        self.highlights_resolved += other.highlights_resolved;
        self.geometry_misses += other.geometry_misses;
    }
}
