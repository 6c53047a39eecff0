//! Document source abstraction.
//!
//! The library never parses PDF files itself. A document parser provides page
//! data through [`DocumentSource`] and [`PageSource`]; the aggregator only
//! talks to these traits. [`memory`] implements them over JSON page dumps.

pub mod memory;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AnnotationRecord, Provenance, TextToken};

pub use memory::{load_documents, DocumentDump, LoadedDocuments, PageDump};

/// Data for one page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Positioned text runs, in parser order.
    async fn text_tokens(&self) -> Result<Vec<TextToken>>;

    /// Raw annotations, unfiltered, in parser order.
    async fn annotations(&self) -> Result<Vec<AnnotationRecord>>;
}

/// Page access for one document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Open a page (1-indexed).
    async fn page(&self, number: u32) -> Result<Box<dyn PageSource>>;
}

/// A document together with where it came from.
#[derive(Clone)]
pub struct DocumentHandle {
    source: Arc<dyn DocumentSource>,
    provenance: Provenance,
}

impl DocumentHandle {
    /// Wrap a source with its provenance.
    pub fn new(source: impl DocumentSource + 'static, provenance: Provenance) -> Self {
        Self {
            source: Arc::new(source),
            provenance,
        }
    }

    /// The page source.
    pub fn source(&self) -> &dyn DocumentSource {
        self.source.as_ref()
    }

    /// Where the document came from.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Document file name.
    pub fn name(&self) -> &str {
        &self.provenance.document
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("provenance", &self.provenance)
            .field("page_count", &self.source.page_count())
            .finish()
    }
}

/// Provenance for a document stored at `path`.
///
/// The document name is the file name and the folder is the name of the
/// directory containing it; both are empty when the path has none.
pub fn provenance_for(path: impl AsRef<Path>) -> Provenance {
    let path = path.as_ref();
    let document = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Provenance::new(document, path.display().to_string(), folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_for_path() {
        let p = provenance_for("/library/papers/attention.pdf");
        assert_eq!(p.document, "attention.pdf");
        assert_eq!(p.folder, "papers");
        assert_eq!(p.path, "/library/papers/attention.pdf");
    }

    #[test]
    fn test_provenance_for_bare_name() {
        let p = provenance_for("notes.pdf");
        assert_eq!(p.document, "notes.pdf");
        assert_eq!(p.folder, "");
    }

    #[test]
    fn test_handle_debug_shows_provenance() {
        let handle = DocumentHandle::new(
            DocumentDump::default(),
            Provenance::new("a.pdf", "a.pdf", ""),
        );
        let debug = format!("{:?}", handle);
        assert!(debug.contains("a.pdf"));
        assert!(debug.contains("page_count: 0"));
        assert_eq!(handle.name(), "a.pdf");
    }
}
