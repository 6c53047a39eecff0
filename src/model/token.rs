//! Text-layer tokens.

use serde::{Deserialize, Serialize};

/// One run of text sharing a single baseline.
///
/// `width` is the advance width of the whole run. Character positions are not
/// known; anything finer than the run is estimated proportionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenRepr")]
pub struct TextToken {
    /// Text content of the run
    pub text: String,

    /// Baseline start x
    pub x: f64,

    /// Baseline y
    pub y: f64,

    /// Total advance width of `text`
    pub width: f64,
}

impl TextToken {
    /// Create a new token.
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
        }
    }

    /// Right edge of the run.
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }

    /// Number of characters in the run.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Accepted input shapes for a token.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenRepr {
    Plain {
        text: String,
        x: f64,
        y: f64,
        width: f64,
    },
    /// pdf.js text content item: translation lives in `transform[4..6]`.
    Transform {
        str: String,
        transform: [f64; 6],
        width: f64,
    },
}

impl From<TokenRepr> for TextToken {
    fn from(repr: TokenRepr) -> Self {
        match repr {
            TokenRepr::Plain { text, x, y, width } => TextToken { text, x, y, width },
            TokenRepr::Transform {
                str,
                transform,
                width,
            } => TextToken {
                text: str,
                x: transform[4],
                y: transform[5],
                width,
            },
        }
    }
}
