//! JSON rendering of collected annotations.

use serde::{Deserialize, Serialize};

use crate::classify::{ColorClassifier, Level};
use crate::error::{Error, Result};
use crate::model::Annotation;

use super::options::RenderOptions;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct ClassifiedAnnotation<'a> {
    #[serde(flatten)]
    annotation: &'a Annotation,
    level: Level,
}

/// Convert annotations to a JSON array, each entry tagged with its level.
///
/// Annotations are written in the order given; sort them first for stable
/// output.
pub fn to_json(
    annotations: &[Annotation],
    options: &RenderOptions,
    format: JsonFormat,
) -> Result<String> {
    let classifier = ColorClassifier::new(&options.classifier);
    let entries: Vec<ClassifiedAnnotation<'_>> = annotations
        .iter()
        .map(|annotation| ClassifiedAnnotation {
            annotation,
            level: classifier.classify(annotation.color),
        })
        .collect();

    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&entries),
        JsonFormat::Compact => serde_json::to_string(&entries),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
