//! In-memory documents loaded from JSON page dumps.
//!
//! A dump is what an external PDF parser writes out per document:
//!
//! ```json
//! { "pages": [ { "tokens": [...], "annotations": [...] } ] }
//! ```
//!
//! Tokens may use the `{text, x, y, width}` shape or pdf.js text items.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{provenance_for, DocumentHandle, DocumentSource, PageSource};
use crate::error::{Error, Result};
use crate::extract::DocumentFailure;
use crate::model::{AnnotationRecord, TextToken};

/// Text and annotations of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDump {
    #[serde(default)]
    pub tokens: Vec<TextToken>,

    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}

impl PageDump {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text token.
    pub fn with_token(mut self, token: TextToken) -> Self {
        self.tokens.push(token);
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: AnnotationRecord) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// All pages of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDump {
    pub pages: Vec<PageDump>,
}

impl DocumentDump {
    /// Create a document from its pages.
    pub fn new(pages: Vec<PageDump>) -> Self {
        Self { pages }
    }

    /// Parse a dump from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dump file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::upstream(path.display().to_string(), e.to_string()))
    }
}

#[async_trait]
impl DocumentSource for DocumentDump {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn page(&self, number: u32) -> Result<Box<dyn PageSource>> {
        let count = self.page_count();
        if number == 0 || number > count {
            return Err(Error::PageOutOfRange(number, count));
        }
        let page = self.pages[(number - 1) as usize].clone();
        Ok(Box::new(page))
    }
}

#[async_trait]
impl PageSource for PageDump {
    async fn text_tokens(&self) -> Result<Vec<TextToken>> {
        Ok(self.tokens.clone())
    }

    async fn annotations(&self) -> Result<Vec<AnnotationRecord>> {
        Ok(self.annotations.clone())
    }
}

/// Load a dump file as a document handle.
///
/// The handle is named after the dump file with a trailing `.json` removed, so
/// `papers/attention.pdf.json` is reported as `attention.pdf` in folder `papers`.
pub fn load_document(path: impl AsRef<Path>) -> Result<DocumentHandle> {
    let path = path.as_ref();
    let dump = DocumentDump::from_file(path)?;
    log::debug!(
        "Loaded {} page(s) from {}",
        dump.page_count(),
        path.display()
    );
    Ok(DocumentHandle::new(dump, provenance_for(document_path(path))))
}

/// Dump files split into loaded documents and the ones that failed.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<DocumentHandle>,
    pub failures: Vec<DocumentFailure>,
}

impl LoadedDocuments {
    /// Load one more dump file, recording a failure instead of returning it.
    pub fn push(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match load_document(path) {
            Ok(document) => self.documents.push(document),
            Err(error) => {
                log::warn!("Skipping {}: {}", path.display(), error);
                self.failures.push(DocumentFailure {
                    provenance: provenance_for(document_path(path)),
                    error,
                });
            }
        }
    }
}

/// Load every dump file.
///
/// A missing or malformed dump is reported in [`LoadedDocuments::failures`]
/// and the remaining files still load.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> LoadedDocuments {
    let mut loaded = LoadedDocuments::default();
    for path in paths {
        loaded.push(path);
    }
    loaded
}

fn document_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subtype;

    const DUMP: &str = r#"{
        "pages": [
            {
                "tokens": [{"text": "Hello", "x": 10, "y": 10, "width": 50}],
                "annotations": [{"subtype": "Text", "rect": [0, 0, 5, 5], "contents": "hi"}]
            },
            {}
        ]
    }"#;

    #[test]
    fn test_parse_dump() {
        let dump = DocumentDump::from_json_str(DUMP).unwrap();
        assert_eq!(dump.page_count(), 2);
        assert_eq!(dump.pages[0].tokens[0].text, "Hello");
        assert_eq!(dump.pages[0].annotations[0].subtype, Subtype::Text);
        assert!(dump.pages[1].tokens.is_empty());
    }

    #[test]
    fn test_malformed_dump() {
        assert!(matches!(
            DocumentDump::from_json_str("{\"pages\": 3}"),
            Err(Error::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_page_access() {
        let dump = DocumentDump::from_json_str(DUMP).unwrap();
        let page = dump.page(1).await.unwrap();
        assert_eq!(page.text_tokens().await.unwrap().len(), 1);
        assert_eq!(page.annotations().await.unwrap()[0].body, "hi");

        assert!(matches!(
            dump.page(3).await,
            Err(Error::PageOutOfRange(3, 2))
        ));
        assert!(dump.page(0).await.is_err());
    }

    #[test]
    fn test_load_document_names() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("papers");
        fs::create_dir(&folder).unwrap();
        let file = folder.join("attention.pdf.json");
        fs::write(&file, DUMP).unwrap();

        let handle = load_document(&file).unwrap();
        assert_eq!(handle.name(), "attention.pdf");
        assert_eq!(handle.provenance().folder, "papers");
        assert_eq!(handle.source().page_count(), 2);
    }

    #[test]
    fn test_load_documents_keeps_going_past_bad_dump() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf.json");
        let bad = dir.path().join("bad.pdf.json");
        fs::write(&good, DUMP).unwrap();
        fs::write(&bad, r#"{"pages": 3}"#).unwrap();

        let loaded = load_documents(&[&bad, &good]);
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].name(), "good.pdf");
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].provenance.document, "bad.pdf");
        assert!(matches!(loaded.failures[0].error, Error::Source { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_document("/definitely/not/here.json"),
            Err(Error::Io(_))
        ));
    }
}
