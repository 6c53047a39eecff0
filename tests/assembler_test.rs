//! Integration tests for classification, ordering and document assembly.

use chrono::NaiveDate;
use pdfnotes::classify::{classify, ClassifierConfig, Level, Rgb};
use pdfnotes::model::{Annotation, AnnotationRecord, Provenance, Subtype};
use pdfnotes::render::{
    render, sort_annotations, to_json, to_markdown, DocumentAssembler, JsonFormat, Layout,
    RenderOptions,
};

const YELLOW: Rgb = Rgb::new(255, 255, 0);
const ORANGE: Rgb = Rgb::new(255, 173, 91);
const RED: Rgb = Rgb::new(252, 54, 54);

const MINDMAP_HEAD: &str = "---\n\nmindmap-plugin: basic\n\n---\n";

fn options() -> RenderOptions {
    let date = NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|d| d.and_hms_opt(9, 26, 0))
        .unwrap();
    RenderOptions::new().with_date_time(date)
}

fn mark(doc: &str, folder: &str, page: u32, x: f64, y: f64, color: Rgb, text: &str) -> Annotation {
    AnnotationRecord::new(Subtype::Highlight)
        .with_id(text)
        .with_rect([x, y, x + 100.0, y + 10.0])
        .with_color(color)
        .into_annotation(
            &Provenance::new(doc, format!("/library/{}/{}", folder, doc), folder),
            page,
            Some(text.to_string()),
        )
}

// ==================== Classification ====================

#[test]
fn test_reference_color_classified_exactly() {
    let config = ClassifierConfig::default().with_tolerances(5.0, 30.0);
    assert_eq!(classify(Some(YELLOW), &config), Level::Level2);
    assert_eq!(classify(Some(ORANGE), &config), Level::Level1);
    assert_eq!(classify(Some(RED), &config), Level::Important);
}

#[test]
fn test_missing_color_is_unknown() {
    assert_eq!(classify(None, &ClassifierConfig::default()), Level::Unknown);
}

// ==================== Empty Input ====================

#[test]
fn test_empty_input_yields_placeholder_only() {
    for layout in [Layout::Notes, Layout::Mindmap, Layout::ExternalMindmap] {
        let options = options()
            .with_layout(layout)
            .with_placeholder("Nothing highlighted yet.");
        assert_eq!(to_markdown(Vec::new(), &options), "Nothing highlighted yet.");
    }
}

// ==================== Ordering ====================

#[test]
fn test_batch_order_is_document_page_then_top_down() {
    let list = vec![
        mark("b.pdf", "x", 1, 10.0, 700.0, YELLOW, "b first"),
        mark("a.pdf", "x", 2, 10.0, 800.0, YELLOW, "a page two"),
        mark("a.pdf", "x", 1, 10.0, 500.0, YELLOW, "a lower"),
        mark("a.pdf", "x", 1, 10.0, 700.0, YELLOW, "a upper"),
    ];
    let content = to_markdown(list, &options().with_layout(Layout::Mindmap));
    assert_eq!(
        content,
        format!(
            "{}### [[a.pdf]]\n#### _\n\
             - 🟡 a upper\n- 🟡 a lower\n- 🟡 a page two\n\
             ### [[b.pdf]]\n#### _\n- 🟡 b first\n",
            MINDMAP_HEAD
        )
    );
}

#[test]
fn test_same_line_sorted_left_to_right() {
    let mut list = vec![
        mark("a.pdf", "x", 1, 300.0, 700.0, YELLOW, "right"),
        mark("a.pdf", "x", 1, 10.0, 700.0, YELLOW, "left"),
    ];
    sort_annotations(&mut list, false, false);
    assert_eq!(list[0].display_text(), "left");
    assert_eq!(list[1].display_text(), "right");
}

#[test]
fn test_render_is_deterministic() {
    let build = || {
        vec![
            mark("a.pdf", "x", 1, 10.0, 700.0, YELLOW, "one"),
            mark("a.pdf", "x", 1, 10.0, 700.0, YELLOW, "two"),
            mark("c.pdf", "x", 4, 10.0, 100.0, RED, "three"),
        ]
    };
    let mut reversed = build();
    reversed.reverse();

    let assembler = DocumentAssembler::new(options());
    assert_eq!(
        assembler.assemble(build()).content,
        assembler.assemble(reversed).content
    );
}

// ==================== Layouts ====================

#[test]
fn test_folder_grouping_merges_documents() {
    let list = vec![
        mark("a.pdf", "reading", 1, 10.0, 700.0, YELLOW, "from a"),
        mark("b.pdf", "reading", 1, 10.0, 700.0, YELLOW, "from b"),
    ];
    let options = options()
        .with_layout(Layout::Mindmap)
        .with_folder_grouping(true);
    let result = render(list, &options);
    assert_eq!(
        result.content,
        format!(
            "{}### [[reading]]\n#### _\n- 🟡 from a\n- 🟡 from b\n",
            MINDMAP_HEAD
        )
    );
    assert_eq!(result.stats.groups, 1);
}

#[test]
fn test_notes_layout_sections() {
    let list = vec![
        mark("paper.pdf", "x", 1, 10.0, 700.0, ORANGE, "Method"),
        mark("paper.pdf", "x", 2, 10.0, 700.0, RED, "Watch out"),
    ];
    let result = render(list, &options());

    let content = &result.content;
    assert!(content.contains("Date: \" 2025/03/14 09:26\""));
    let legend = content.find("## Format\n").unwrap();
    let condensed = content.find("### Condensed format").unwrap();
    let detailed = content.find("### Detailed format").unwrap();
    assert!(legend < condensed && condensed < detailed);
    assert!(content[detailed..].contains("\n#### Page 2\n> 🔴 ==Watch out==\n"));
    assert_eq!(result.stats.entries_at(Level::Level1), 1);
    assert_eq!(result.stats.entries_at(Level::Important), 1);
}

#[test]
fn test_essentials_drop_normal_entries() {
    let list = vec![
        mark("a.pdf", "x", 1, 10.0, 700.0, YELLOW, "normal"),
        mark("a.pdf", "x", 1, 10.0, 600.0, RED, "key point"),
    ];
    let options = options().with_layout(Layout::Mindmap).essentials();
    let result = render(list, &options);
    assert!(!result.content.contains("normal"));
    assert!(result.content.contains("- 🔴 ==key point==\n"));
    assert_eq!(result.stats.skipped, 1);
}

// ==================== JSON ====================

#[test]
fn test_json_carries_levels() {
    let list = vec![
        mark("a.pdf", "x", 1, 10.0, 700.0, ORANGE, "title"),
        mark("a.pdf", "x", 1, 10.0, 600.0, Rgb::new(0, 0, 255), "odd"),
    ];
    let json = to_json(&list, &options(), JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["level"], "level1");
    assert_eq!(value[1]["level"], "unknown");
    assert_eq!(value[1]["highlighted_text"], "odd");
}
