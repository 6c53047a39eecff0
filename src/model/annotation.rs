//! Annotation records, raw and enriched.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{QuadPoints, QuadRegion};
use crate::classify::Rgb;

/// PDF annotation subtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subtype {
    /// Sticky note
    Text,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    FreeText,
    /// Any other subtype, kept verbatim
    Other(String),
}

impl Subtype {
    /// Name as it appears in the PDF `/Subtype` entry.
    pub fn as_str(&self) -> &str {
        match self {
            Subtype::Text => "Text",
            Subtype::Highlight => "Highlight",
            Subtype::Underline => "Underline",
            Subtype::Squiggly => "Squiggly",
            Subtype::StrikeOut => "StrikeOut",
            Subtype::FreeText => "FreeText",
            Subtype::Other(name) => name,
        }
    }

    /// Whether this is a sticky note.
    pub fn is_note(&self) -> bool {
        matches!(self, Subtype::Text)
    }
}

impl From<&str> for Subtype {
    fn from(s: &str) -> Self {
        match s {
            "Text" => Subtype::Text,
            "Highlight" => Subtype::Highlight,
            "Underline" => Subtype::Underline,
            "Squiggly" => Subtype::Squiggly,
            "StrikeOut" => Subtype::StrikeOut,
            "FreeText" => Subtype::FreeText,
            other => Subtype::Other(other.to_string()),
        }
    }
}

impl From<String> for Subtype {
    fn from(s: String) -> Self {
        Subtype::from(s.as_str())
    }
}

impl From<Subtype> for String {
    fn from(subtype: Subtype) -> Self {
        subtype.as_str().to_string()
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotation as delivered by the document parser for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    /// Parser-assigned identifier
    #[serde(default)]
    pub id: String,

    /// Annotation subtype
    pub subtype: Subtype,

    /// Marked regions, one per covered line
    #[serde(default)]
    pub quad_points: Option<QuadPoints>,

    /// Annotation rectangle `[x0, y0, x1, y1]`
    #[serde(default)]
    pub rect: [f64; 4],

    /// Annotation color, if any
    #[serde(default)]
    pub color: Option<Rgb>,

    /// Author (PDF `/T`)
    #[serde(default, alias = "title")]
    pub author: String,

    /// Note body (PDF `/Contents`)
    #[serde(default, alias = "contents")]
    pub body: String,
}

impl AnnotationRecord {
    /// Create a record with the given subtype and defaults elsewhere.
    pub fn new(subtype: impl Into<Subtype>) -> Self {
        Self {
            id: String::new(),
            subtype: subtype.into(),
            quad_points: None,
            rect: [0.0; 4],
            color: None,
            author: String::new(),
            body: String::new(),
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the quad points.
    pub fn with_quads(mut self, quads: QuadPoints) -> Self {
        self.quad_points = Some(quads);
        self
    }

    /// Set the rectangle.
    pub fn with_rect(mut self, rect: [f64; 4]) -> Self {
        self.rect = rect;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Quad regions in the order given, empty when the record has none.
    pub fn regions(&self) -> Vec<QuadRegion> {
        self.quad_points
            .as_ref()
            .map(QuadPoints::to_regions)
            .unwrap_or_default()
    }

    /// Attach provenance and the resolved text, producing the enriched form.
    pub fn into_annotation(
        self,
        source: &Provenance,
        page_number: u32,
        highlighted_text: Option<String>,
    ) -> Annotation {
        Annotation {
            id: self.id,
            subtype: self.subtype,
            rect: self.rect,
            color: self.color,
            author: self.author,
            body: self.body,
            source: source.clone(),
            page_number,
            highlighted_text,
            topic: None,
        }
    }
}

/// Where an annotation came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// File name of the document (e.g. `paper.pdf`)
    pub document: String,

    /// Full path of the document
    pub path: String,

    /// Name of the containing folder
    pub folder: String,
}

impl Provenance {
    /// Create provenance metadata.
    pub fn new(
        document: impl Into<String>,
        path: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            path: path.into(),
            folder: folder.into(),
        }
    }
}

/// An annotation enriched with provenance and its resolved text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub subtype: Subtype,
    pub rect: [f64; 4],
    pub color: Option<Rgb>,
    pub author: String,

    /// Body text; when topics are split off, the remainder after the first line
    pub body: String,

    pub source: Provenance,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Text under the annotation's quads, for highlight-like subtypes
    pub highlighted_text: Option<String>,

    /// First line of the body, set when grouping by topic
    pub topic: Option<String>,
}

impl Annotation {
    /// Vertical position used for in-page ordering (`rect[1]`).
    pub fn vertical_position(&self) -> f64 {
        self.rect[1]
    }

    /// Key for document grouping: folder name or document file name.
    pub fn group_key(&self, by_folder: bool) -> &str {
        if by_folder {
            &self.source.folder
        } else {
            &self.source.document
        }
    }

    /// Body if present, otherwise the highlighted text.
    pub fn display_text(&self) -> &str {
        if !self.body.is_empty() {
            &self.body
        } else {
            self.highlighted_text.as_deref().unwrap_or("")
        }
    }

    /// Split the first body line off as the topic.
    ///
    /// Lines are separated by `\r\n`, `\n\r`, `\n` or `\r`; the remaining lines
    /// are rejoined with `\r\n`.
    pub fn with_topic_split(mut self) -> Self {
        let mut lines = split_lines(&self.body).into_iter();
        let topic = lines.next().unwrap_or_default();
        let rest: Vec<String> = lines.collect();
        self.body = rest.join("\r\n");
        self.topic = Some(topic);
        self
    }
}

fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                let pair = if c == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    lines.push(current);
    lines
}
