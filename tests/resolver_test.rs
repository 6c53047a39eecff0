//! Integration tests for text recovery under highlight regions.

use pdfnotes::extract::{join_lines, resolve, stitch, TextLayerIndex};
use pdfnotes::model::{Bounds, QuadPoints, QuadRegion, TextToken};

fn hello_world() -> Vec<TextToken> {
    vec![
        TextToken::new("Hello", 10.0, 10.0, 50.0),
        TextToken::new("World", 60.0, 10.0, 50.0),
    ]
}

// ==================== Resolution ====================

#[test]
fn test_two_tokens_fully_covered() {
    let bounds = Bounds::new(10.0, 110.0, 10.0, 20.0);
    assert_eq!(resolve(&bounds, &hello_world()), "Hello World");
}

#[test]
fn test_tokens_inside_box_are_kept_whole() {
    let tokens = vec![
        TextToken::new("alpha", 20.0, 15.0, 30.0),
        TextToken::new("beta", 60.0, 15.0, 25.0),
        TextToken::new("gamma", 90.0, 15.0, 10.0),
    ];
    let bounds = Bounds::new(0.0, 200.0, 0.0, 50.0);
    assert_eq!(resolve(&bounds, &tokens), "alpha beta gamma");
}

#[test]
fn test_tokens_on_other_lines_ignored() {
    let mut tokens = hello_world();
    tokens.push(TextToken::new("Above", 10.0, 40.0, 50.0));
    tokens.push(TextToken::new("Below", 10.0, 2.0, 50.0));
    let bounds = Bounds::new(10.0, 110.0, 10.0, 20.0);
    assert_eq!(resolve(&bounds, &tokens), "Hello World");
}

#[test]
fn test_box_beside_text_is_empty() {
    let bounds = Bounds::new(200.0, 300.0, 10.0, 20.0);
    assert_eq!(resolve(&bounds, &hello_world()), "");
}

#[test]
fn test_empty_token_list() {
    let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0);
    assert_eq!(resolve(&bounds, &[]), "");
}

// ==================== Stitching ====================

#[test]
fn test_lowercase_hyphenation_joined() {
    assert_eq!(join_lines("multi-", "line"), "multiline");
}

#[test]
fn test_uppercase_hyphenation_kept() {
    assert_eq!(join_lines("Co-", "Op"), "Co-Op");
}

#[test]
fn test_plain_lines_joined_with_space() {
    assert_eq!(join_lines("first line", "second"), "first line second");
}

#[test]
fn test_stitch_two_lines_across_hyphen() {
    let tokens = vec![
        TextToken::new("a multi-", 10.0, 100.0, 80.0),
        TextToken::new("line quote", 10.0, 80.0, 100.0),
    ];
    let regions = vec![
        QuadRegion::from_rect(10.0, 100.0, 90.0, 110.0),
        QuadRegion::from_rect(10.0, 80.0, 110.0, 90.0),
    ];
    assert_eq!(stitch(&regions, &tokens), "a multiline quote");
}

#[test]
fn test_stitch_flat_and_corner_quads_agree() {
    let tokens = hello_world();
    let flat = QuadPoints::Flat(vec![10.0, 20.0, 110.0, 20.0, 10.0, 10.0, 110.0, 10.0]);
    let corners: QuadPoints = serde_json::from_str(
        r#"[[{"x": 10, "y": 20}, {"x": 110, "y": 20}, {"x": 10, "y": 10}, {"x": 110, "y": 10}]]"#,
    )
    .unwrap();

    let from_flat = stitch(&flat.to_regions(), &tokens);
    let from_corners = stitch(&corners.to_regions(), &tokens);
    assert_eq!(from_flat, "Hello World");
    assert_eq!(from_flat, from_corners);
}

#[test]
fn test_stitch_no_regions() {
    assert_eq!(stitch(&[], &hello_world()), "");
}

// ==================== Text Layer ====================

#[test]
fn test_text_layer_reading_order() {
    let index = TextLayerIndex::new(vec![
        TextToken::new("second", 50.0, 10.0, 30.0),
        TextToken::new("lower", 10.0, 5.0, 30.0),
        TextToken::new("first", 10.0, 10.0, 30.0),
    ]);
    let order: Vec<&str> = index.tokens().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(order, ["first", "second", "lower"]);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_resolution_independent_of_token_order() {
    let mut reversed = hello_world();
    reversed.reverse();
    let index = TextLayerIndex::new(reversed);
    let bounds = Bounds::new(10.0, 110.0, 10.0, 20.0);
    assert_eq!(resolve(&bounds, index.tokens()), "Hello World");
}
