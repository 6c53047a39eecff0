//! # pdfnotes
//!
//! Turn PDF highlights, underlines and sticky notes into structured Markdown
//! notes.
//!
//! A document parser supplies positioned text runs and raw annotations per
//! page through [`DocumentSource`]. The library recovers the text under each
//! highlight, classifies every annotation by color, and assembles the result
//! into a note document, a mindmap, or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfnotes::{source, Notes};
//!
//! # async fn run() -> pdfnotes::Result<()> {
//! // Page dumps written by a PDF parser
//! let documents = vec![source::memory::load_document("papers/attention.pdf.json")?];
//!
//! let notes = Notes::new().essentials().collect(&documents).await;
//! println!("{}", notes.to_markdown());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Text recovery**: glyph-width aware clipping of text runs to highlight quads
//! - **Line stitching**: multi-line highlights joined with de-hyphenation
//! - **Color levels**: titles, bullets, sub-bullets, summaries and important marks
//! - **Multiple layouts**: notes, mindmap, external mindmap outline, JSON
//! - **Concurrent collection**: documents fetched concurrently, pages stitched with Rayon

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use classify::{ClassifierConfig, ColorClassifier, Level, LevelColors, Rgb};
pub use config::NotesConfig;
pub use error::{Error, Result};
pub use extract::{
    AnnotationAggregator, BatchOutcome, DocumentFailure, ExtractOptions, PageRange,
};
pub use model::{Annotation, AnnotationRecord, Provenance, Subtype, TextToken};
pub use render::{
    DocumentAssembler, ExtractionStats, JsonFormat, Layout, RenderOptions, RenderResult,
};
pub use source::{load_documents, DocumentHandle, DocumentSource, LoadedDocuments, PageSource};

use std::path::Path;

/// Collect annotations from page dumps and render them as Markdown notes.
///
/// Dumps that fail to load or collect are logged and left out.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> pdfnotes::Result<()> {
/// let markdown = pdfnotes::to_markdown(&["paper.pdf.json"]).await?;
/// std::fs::write("paper.md", markdown)?;
/// # Ok(())
/// # }
/// ```
pub async fn to_markdown<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    to_markdown_with_config(paths, &NotesConfig::default()).await
}

/// Like [`to_markdown`], with explicit settings.
pub async fn to_markdown_with_config<P: AsRef<Path>>(
    paths: &[P],
    config: &NotesConfig,
) -> Result<String> {
    config.validate()?;
    let notes = Notes::from_config(config.clone())
        .collect_files(paths)
        .await;
    Ok(notes.to_markdown())
}

/// Collect annotations from page dumps and render them as JSON.
pub async fn to_json<P: AsRef<Path>>(paths: &[P], format: JsonFormat) -> Result<String> {
    Notes::new().collect_files(paths).await.to_json(format)
}

/// Builder for collecting and rendering annotations.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::{Layout, Notes, PageRange};
///
/// # async fn run(documents: Vec<pdfnotes::DocumentHandle>) {
/// let markdown = Notes::new()
///     .with_layout(Layout::Mindmap)
///     .with_pages(PageRange::new(1, 20))
///     .with_topics()
///     .collect(&documents)
///     .await
///     .to_markdown();
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Notes {
    extract_options: ExtractOptions,
    render_options: RenderOptions,
}

impl Notes {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a loaded configuration.
    pub fn from_config(config: NotesConfig) -> Self {
        Self {
            extract_options: config.extract,
            render_options: config.render,
        }
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Replace the rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the output layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.render_options = self.render_options.with_layout(layout);
        self
    }

    /// Restrict collection to a page range.
    pub fn with_pages(mut self, pages: PageRange) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// Group entries under topic headers.
    pub fn with_topics(mut self) -> Self {
        self.render_options = self.render_options.with_topics(true);
        self
    }

    /// Group documents by containing folder.
    pub fn by_folder(mut self) -> Self {
        self.render_options = self.render_options.with_folder_grouping(true);
        self
    }

    /// Render only titles, summaries and important entries.
    pub fn essentials(mut self) -> Self {
        self.render_options = self.render_options.essentials();
        self
    }

    /// Leave out low-importance entries.
    pub fn without_low(mut self) -> Self {
        let include_normal = self.render_options.include_normal;
        self.render_options = self.render_options.with_levels(include_normal, false);
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Collect annotations from every document.
    ///
    /// Failing documents are reported in the result, never aborting the batch.
    pub async fn collect(self, documents: &[DocumentHandle]) -> NotesResult {
        let outcome = extract::collect(documents, &self.extract_options).await;
        NotesResult {
            outcome,
            render_options: self.render_options,
        }
    }

    /// Load page dumps and collect annotations from the ones that load.
    ///
    /// Dumps that cannot be read or parsed are reported in
    /// [`NotesResult::failures`] next to documents that failed collection.
    pub async fn collect_files<P: AsRef<Path>>(self, paths: &[P]) -> NotesResult {
        let loaded = load_documents(paths);
        self.collect_loaded(loaded).await
    }

    /// Collect from already loaded dumps, carrying over their load failures.
    pub async fn collect_loaded(self, loaded: LoadedDocuments) -> NotesResult {
        let mut result = self.collect(&loaded.documents).await;
        result.outcome.add_failures(loaded.failures);
        result
    }
}

/// Collected annotations, ready for rendering.
#[derive(Debug)]
pub struct NotesResult {
    /// What the batch produced
    pub outcome: BatchOutcome,
    /// Render options to use
    render_options: RenderOptions,
}

impl NotesResult {
    /// Sort and render with statistics.
    pub fn render(&self) -> RenderResult {
        render::render(self.outcome.annotations.clone(), &self.render_options)
    }

    /// Sort and render as Markdown.
    pub fn to_markdown(&self) -> String {
        self.render().content
    }

    /// Sort and render as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let sorted = render::prepare(self.outcome.annotations.clone(), &self.render_options);
        render::to_json(&sorted, &self.render_options, format)
    }

    /// Kept annotations, unsorted.
    pub fn annotations(&self) -> &[Annotation] {
        &self.outcome.annotations
    }

    /// Documents that could not be collected.
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.outcome.failures
    }

    /// Extraction counters over the whole batch.
    pub fn stats(&self) -> &ExtractionStats {
        &self.outcome.stats
    }
}
