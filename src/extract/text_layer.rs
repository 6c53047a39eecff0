//! Reading-order index over a page's text tokens.

use std::cmp::Ordering;

use crate::model::TextToken;

/// A page's text tokens in reading order: top to bottom, then left to right.
///
/// PDF y grows upward, so "top to bottom" means decreasing baseline y.
#[derive(Debug, Clone, Default)]
pub struct TextLayerIndex {
    tokens: Vec<TextToken>,
}

impl TextLayerIndex {
    /// Sort the tokens of one page into reading order.
    pub fn new(mut tokens: Vec<TextToken>) -> Self {
        tokens.sort_by(reading_order);
        Self { tokens }
    }

    /// Tokens in reading order.
    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the page has no text.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn reading_order(a: &TextToken, b: &TextToken) -> Ordering {
    b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x))
}
