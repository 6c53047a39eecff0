//! Integration tests for batch collection.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pdfnotes::error::{Error, Result};
use pdfnotes::extract::{AnnotationAggregator, ExtractOptions, PageRange};
use pdfnotes::model::{AnnotationRecord, Provenance, QuadPoints, Subtype, TextToken};
use pdfnotes::source::{DocumentDump, DocumentHandle, DocumentSource, PageDump, PageSource};

fn highlight_over(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> AnnotationRecord {
    AnnotationRecord::new(Subtype::Highlight)
        .with_quads(QuadPoints::Flat(vec![
            min_x, max_y, max_x, max_y, min_x, min_y, max_x, min_y,
        ]))
        .with_rect([min_x, min_y, max_x, max_y])
}

fn page(text: &str) -> PageDump {
    PageDump::new()
        .with_token(TextToken::new(text, 10.0, 100.0, 80.0))
        .with_annotation(highlight_over(10.0, 100.0, 90.0, 110.0).with_id(text))
}

fn handle(name: &str, pages: Vec<PageDump>) -> DocumentHandle {
    DocumentHandle::new(
        DocumentDump::new(pages),
        Provenance::new(name, format!("/docs/{}", name), "docs"),
    )
}

/// A source whose pages fail from `fail_from` onwards.
struct BrokenSource {
    pages: u32,
    fail_from: u32,
    opened: Arc<AtomicU32>,
}

struct SlowPage {
    inner: PageDump,
}

#[async_trait]
impl PageSource for SlowPage {
    async fn text_tokens(&self) -> Result<Vec<TextToken>> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(self.inner.tokens.clone())
    }

    async fn annotations(&self) -> Result<Vec<AnnotationRecord>> {
        Ok(self.inner.annotations.clone())
    }
}

#[async_trait]
impl DocumentSource for BrokenSource {
    fn page_count(&self) -> u32 {
        self.pages
    }

    async fn page(&self, number: u32) -> Result<Box<dyn PageSource>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if number >= self.fail_from {
            return Err(Error::Other("corrupt content stream".to_string()));
        }
        Ok(Box::new(SlowPage {
            inner: page("fine"),
        }))
    }
}

// ==================== Failure Isolation ====================

#[tokio::test]
async fn test_failing_document_does_not_abort_batch() {
    let opened = Arc::new(AtomicU32::new(0));
    let broken = DocumentHandle::new(
        BrokenSource {
            pages: 3,
            fail_from: 2,
            opened: opened.clone(),
        },
        Provenance::new("broken.pdf", "/docs/broken.pdf", "docs"),
    );
    let good = handle("good.pdf", vec![page("first"), page("second")]);

    let outcome = AnnotationAggregator::new(ExtractOptions::default())
        .collect_batch(&[broken, good])
        .await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.documents.len(), 1);
    assert_eq!(outcome.documents[0].provenance.document, "good.pdf");
    assert_eq!(outcome.stats.documents, 1);
    assert_eq!(outcome.stats.failed_documents, 1);

    // nothing from the broken document leaks into the batch
    assert_eq!(outcome.annotations.len(), 2);
    assert!(outcome
        .annotations
        .iter()
        .all(|a| a.source.document == "good.pdf"));

    let failure = &outcome.failures[0];
    assert_eq!(failure.provenance.document, "broken.pdf");
    match &failure.error {
        Error::Source { document, message } => {
            assert_eq!(document, "broken.pdf");
            assert!(message.contains("page 2"));
            assert!(message.contains("corrupt content stream"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // pages after the failing one are never requested
    assert_eq!(opened.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_awaits_slow_pages_before_returning() {
    let opened = Arc::new(AtomicU32::new(0));
    let slow = DocumentHandle::new(
        BrokenSource {
            pages: 4,
            fail_from: u32::MAX,
            opened: opened.clone(),
        },
        Provenance::new("slow.pdf", "/docs/slow.pdf", "docs"),
    );

    let outcome = AnnotationAggregator::new(ExtractOptions::default())
        .collect_batch(&[slow])
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.annotations.len(), 4);
    assert!(outcome
        .annotations
        .iter()
        .all(|a| a.highlighted_text.as_deref() == Some("fine")));
    assert_eq!(opened.load(Ordering::SeqCst), 4);
}

// ==================== Page Ranges ====================

#[tokio::test]
async fn test_page_range_limits_collection() {
    let doc = handle(
        "paper.pdf",
        vec![page("one"), page("two"), page("three"), page("four")],
    );
    let options = ExtractOptions::default().with_pages(PageRange::new(2, 3));

    let collected = AnnotationAggregator::new(options)
        .collect_document(&doc)
        .await
        .unwrap();

    let texts: Vec<&str> = collected
        .annotations
        .iter()
        .map(|a| a.highlighted_text.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(texts, ["two", "three"]);
    assert_eq!(collected.annotations[0].page_number, 2);
    assert_eq!(collected.stats.pages_scanned, 2);
    assert!(!collected.pages.entire_document);
}

#[tokio::test]
async fn test_page_range_clamped_to_document() {
    let doc = handle("short.pdf", vec![page("only")]);
    let options = ExtractOptions::default().with_pages(PageRange::parse("1-50").unwrap());

    let collected = AnnotationAggregator::new(options)
        .collect_document(&doc)
        .await
        .unwrap();

    assert_eq!(collected.pages.first, 1);
    assert_eq!(collected.pages.last, 1);
    assert_eq!(collected.annotations.len(), 1);
}

// ==================== Subtype Filtering ====================

#[tokio::test]
async fn test_accepted_subtypes() {
    let doc = handle(
        "mixed.pdf",
        vec![page("marked")
            .with_annotation(AnnotationRecord::new(Subtype::Text).with_body("a thought"))
            .with_annotation(AnnotationRecord::new("Link"))],
    );
    let options = ExtractOptions::default().with_subtypes([Subtype::Text]);

    let outcome = AnnotationAggregator::new(options)
        .collect_batch(&[doc])
        .await;

    assert_eq!(outcome.annotations.len(), 1);
    assert_eq!(outcome.annotations[0].body, "a thought");
    assert_eq!(outcome.annotations[0].highlighted_text, None);
    assert_eq!(outcome.stats.filtered_out, 2);
    assert_eq!(outcome.stats.annotations_seen, 3);
}

#[tokio::test]
async fn test_empty_batch() {
    let outcome = pdfnotes::extract::collect(&[], &ExtractOptions::default()).await;
    assert!(outcome.is_complete());
    assert!(outcome.annotations.is_empty());
    assert_eq!(outcome.stats.documents, 0);
}
