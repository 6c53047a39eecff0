//! Walk documents page by page and collect enriched annotations.
//!
//! Page data is fetched with `.await` from the [`DocumentSource`]; once every
//! requested page of a document is in memory, stitching runs as plain CPU work
//! (on the rayon pool when [`ExtractOptions::parallel`] is set). Documents of a
//! batch are driven concurrently and report back over a channel, so a failing
//! document never stops the others.

use futures::future::join_all;
use rayon::prelude::*;

use super::options::{ExtractOptions, ResolvedPages};
use super::stitcher::stitch;
use super::text_layer::TextLayerIndex;
use crate::error::{Error, Result};
use crate::model::{Annotation, AnnotationRecord, Provenance, TextToken};
use crate::render::ExtractionStats;
use crate::source::DocumentHandle;

/// Annotations collected from one document.
#[derive(Debug, Clone)]
pub struct DocumentAnnotations {
    /// Where the document came from
    pub provenance: Provenance,

    /// Pages that were scanned
    pub pages: ResolvedPages,

    /// Kept annotations, in page order then parser order
    pub annotations: Vec<Annotation>,

    /// Counters for this document
    pub stats: ExtractionStats,
}

/// Summary of a document that was collected successfully.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub provenance: Provenance,
    pub pages: ResolvedPages,
    pub stats: ExtractionStats,
}

/// A document that could not be collected.
#[derive(Debug)]
pub struct DocumentFailure {
    pub provenance: Provenance,
    pub error: Error,
}

/// Everything a batch produced.
///
/// `annotations` holds the kept annotations of every successful document in
/// no particular order; sort them before rendering.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub annotations: Vec<Annotation>,
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    pub stats: ExtractionStats,
}

impl BatchOutcome {
    /// Whether every document was collected.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Add documents that failed before collection started, such as dumps
    /// that could not be loaded.
    pub fn add_failures(&mut self, failures: impl IntoIterator<Item = DocumentFailure>) {
        for failure in failures {
            self.stats.failed_documents += 1;
            self.failures.push(failure);
        }
        self.failures
            .sort_by(|a, b| a.provenance.path.cmp(&b.provenance.path));
    }
}

/// Raw data of one page, fetched and ready for stitching.
struct FetchedPage {
    number: u32,
    tokens: Vec<TextToken>,
    records: Vec<AnnotationRecord>,
}

struct PageAnnotations {
    annotations: Vec<Annotation>,
    stats: ExtractionStats,
}

/// Collects annotations from documents according to [`ExtractOptions`].
#[derive(Debug, Clone, Default)]
pub struct AnnotationAggregator {
    options: ExtractOptions,
}

impl AnnotationAggregator {
    /// Create an aggregator with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Collect the annotations of one document.
    ///
    /// Any page that fails to load fails the whole document with
    /// [`Error::Source`].
    pub async fn collect_document(&self, document: &DocumentHandle) -> Result<DocumentAnnotations> {
        let provenance = document.provenance();
        let total = document.source().page_count();
        let pages = self.options.pages.resolve(total);

        log::debug!(
            "Collecting {}: pages {}-{} of {}",
            provenance.document,
            pages.first,
            pages.last,
            total
        );

        let mut fetched = Vec::with_capacity(pages.len() as usize);
        for number in pages.pages() {
            fetched.push(fetch_page(document, number).await?);
        }

        let processed: Vec<PageAnnotations> = if self.options.parallel {
            fetched
                .into_par_iter()
                .map(|page| self.process_page(page, provenance))
                .collect()
        } else {
            fetched
                .into_iter()
                .map(|page| self.process_page(page, provenance))
                .collect()
        };

        let mut stats = ExtractionStats::new();
        stats.documents = 1;
        let mut annotations = Vec::new();
        for page in processed {
            stats.merge(&page.stats);
            annotations.extend(page.annotations);
        }

        if stats.filtered_out > 0 {
            log::debug!(
                "{}: {} annotation(s) of unaccepted subtypes skipped",
                provenance.document,
                stats.filtered_out
            );
        }

        Ok(DocumentAnnotations {
            provenance: provenance.clone(),
            pages,
            annotations,
            stats,
        })
    }

    /// Collect a batch of documents concurrently.
    ///
    /// Results are appended as documents finish; a failed document is
    /// reported in [`BatchOutcome::failures`] and the rest continue.
    pub async fn collect_batch(&self, documents: &[DocumentHandle]) -> BatchOutcome {
        let (tx, rx) = crossbeam_channel::unbounded();

        let tasks = documents.iter().map(|document| {
            let tx = tx.clone();
            async move {
                let result = self.collect_document(document).await;
                // the receiver outlives every task
                let _ = tx.send((document.provenance().clone(), result));
            }
        });
        join_all(tasks).await;
        drop(tx);

        let mut outcome = BatchOutcome::default();
        for (provenance, result) in rx.iter() {
            match result {
                Ok(collected) => {
                    outcome.stats.merge(&collected.stats);
                    outcome.annotations.extend(collected.annotations);
                    outcome.documents.push(DocumentReport {
                        provenance: collected.provenance,
                        pages: collected.pages,
                        stats: collected.stats,
                    });
                }
                Err(error) => {
                    log::warn!("Skipping {}: {}", provenance.document, error);
                    outcome.stats.failed_documents += 1;
                    outcome.failures.push(DocumentFailure { provenance, error });
                }
            }
        }

        outcome
            .documents
            .sort_by(|a, b| a.provenance.path.cmp(&b.provenance.path));
        outcome
            .failures
            .sort_by(|a, b| a.provenance.path.cmp(&b.provenance.path));
        outcome
    }

    fn process_page(&self, page: FetchedPage, provenance: &Provenance) -> PageAnnotations {
        let mut stats = ExtractionStats::new();
        stats.pages_scanned = 1;
        stats.annotations_seen = page.records.len() as u32;

        let (kept, dropped): (Vec<_>, Vec<_>) = page
            .records
            .into_iter()
            .partition(|record| self.options.accepts(&record.subtype));
        stats.filtered_out = dropped.len() as u32;

        let needs_text = kept
            .iter()
            .any(|record| self.options.treats_as_highlight(&record.subtype));
        let index = if needs_text {
            TextLayerIndex::new(page.tokens)
        } else {
            TextLayerIndex::default()
        };

        let annotations = kept
            .into_iter()
            .map(|record| {
                let highlighted = if self.options.treats_as_highlight(&record.subtype) {
                    let text = stitch(&record.regions(), index.tokens());
                    if text.is_empty() {
                        stats.geometry_misses += 1;
                        log::debug!(
                            "No highlighted text found for {} {} on page {} of {}",
                            record.subtype,
                            record.id,
                            page.number,
                            provenance.document
                        );
                    } else {
                        stats.highlights_resolved += 1;
                    }
                    Some(text)
                } else {
                    None
                };
                stats.annotations_kept += 1;
                record.into_annotation(provenance, page.number, highlighted)
            })
            .collect();

        PageAnnotations { annotations, stats }
    }
}

async fn fetch_page(document: &DocumentHandle, number: u32) -> Result<FetchedPage> {
    let wrap = |e: Error| match e {
        Error::Source { .. } => e,
        other => Error::upstream(document.name(), format!("page {}: {}", number, other)),
    };

    let page = document.source().page(number).await.map_err(wrap)?;
    let tokens = page.text_tokens().await.map_err(wrap)?;
    let records = page.annotations().await.map_err(wrap)?;
    Ok(FetchedPage {
        number,
        tokens,
        records,
    })
}

/// Collect a batch with the given options.
pub async fn collect(documents: &[DocumentHandle], options: &ExtractOptions) -> BatchOutcome {
    AnnotationAggregator::new(options.clone())
        .collect_batch(documents)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PageRange;
    use crate::model::{QuadPoints, Subtype};
    use crate::source::{DocumentDump, PageDump};

    fn highlight(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> AnnotationRecord {
        AnnotationRecord::new(Subtype::Highlight)
            .with_quads(QuadPoints::Flat(vec![
                min_x, max_y, max_x, max_y, min_x, min_y, max_x, min_y,
            ]))
            .with_rect([min_x, min_y, max_x, max_y])
    }

    fn page_with_hello() -> PageDump {
        PageDump::new()
            .with_token(TextToken::new("World", 60.0, 10.0, 50.0))
            .with_token(TextToken::new("Hello", 10.0, 10.0, 50.0))
            .with_annotation(highlight(10.0, 10.0, 110.0, 20.0).with_id("h1"))
            .with_annotation(AnnotationRecord::new(Subtype::Text).with_body("a note"))
            .with_annotation(AnnotationRecord::new("Ink"))
    }

    fn handle(name: &str, pages: Vec<PageDump>) -> DocumentHandle {
        DocumentHandle::new(
            DocumentDump::new(pages),
            Provenance::new(name, format!("/lib/{}", name), "lib"),
        )
    }

    #[tokio::test]
    async fn test_collect_document_resolves_and_filters() {
        let aggregator = AnnotationAggregator::default();
        let doc = handle("a.pdf", vec![page_with_hello()]);
        let collected = aggregator.collect_document(&doc).await.unwrap();

        assert_eq!(collected.annotations.len(), 2);
        let h = &collected.annotations[0];
        assert_eq!(h.highlighted_text.as_deref(), Some("Hello World"));
        assert_eq!(h.page_number, 1);
        assert_eq!(h.source.document, "a.pdf");
        assert_eq!(h.source.folder, "lib");

        let note = &collected.annotations[1];
        assert_eq!(note.highlighted_text, None);
        assert_eq!(note.body, "a note");

        assert_eq!(collected.stats.filtered_out, 1);
        assert_eq!(collected.stats.annotations_seen, 3);
        assert_eq!(collected.stats.highlights_resolved, 1);
        assert!(collected.pages.entire_document);
    }

    #[tokio::test]
    async fn test_geometry_miss_is_not_an_error() {
        let page = PageDump::new()
            .with_token(TextToken::new("far away", 400.0, 400.0, 80.0))
            .with_annotation(highlight(10.0, 10.0, 110.0, 20.0));
        let doc = handle("miss.pdf", vec![page]);
        let collected = AnnotationAggregator::default()
            .collect_document(&doc)
            .await
            .unwrap();
        assert_eq!(collected.annotations[0].highlighted_text.as_deref(), Some(""));
        assert_eq!(collected.stats.geometry_misses, 1);
    }

    #[tokio::test]
    async fn test_page_range_restricts_pages() {
        let pages = vec![page_with_hello(), page_with_hello(), page_with_hello()];
        let doc = handle("three.pdf", pages);
        let options = ExtractOptions::new().with_pages(PageRange::new(2, 9)).sequential();
        let collected = AnnotationAggregator::new(options)
            .collect_document(&doc)
            .await
            .unwrap();

        assert_eq!((collected.pages.first, collected.pages.last), (2, 3));
        assert!(!collected.pages.entire_document);
        assert_eq!(collected.stats.pages_scanned, 2);
        assert!(collected.annotations.iter().all(|a| a.page_number >= 2));
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let pages = vec![page_with_hello(), page_with_hello()];
        let doc = handle("p.pdf", pages);
        let par = AnnotationAggregator::new(ExtractOptions::new().with_parallel(true))
            .collect_document(&doc)
            .await
            .unwrap();
        let seq = AnnotationAggregator::new(ExtractOptions::new().sequential())
            .collect_document(&doc)
            .await
            .unwrap();
        assert_eq!(par.annotations, seq.annotations);
    }

    #[tokio::test]
    async fn test_batch_merges_documents() {
        let docs = vec![
            handle("a.pdf", vec![page_with_hello()]),
            handle("b.pdf", vec![page_with_hello(), PageDump::new()]),
        ];
        let outcome = collect(&docs, &ExtractOptions::default()).await;
        assert!(outcome.is_complete());
        assert_eq!(outcome.annotations.len(), 4);
        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.documents[0].provenance.document, "a.pdf");
        assert_eq!(outcome.stats.documents, 2);
        assert_eq!(outcome.stats.pages_scanned, 3);
    }
}
