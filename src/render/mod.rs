//! Rendering of collected annotations to Markdown notes and JSON.

mod assembler;
mod json;
mod options;
mod result;
mod sort;
mod text;

pub use assembler::{render, to_markdown, DocumentAssembler, DocumentGroupState};
pub use json::{to_json, JsonFormat};
pub use options::{Layout, LevelStyle, LevelStyles, Preambles, RenderOptions};
pub use result::{ExtractionStats, RenderResult, RenderStats};
pub use sort::{prepare, sort_annotations};
pub use text::{flatten_breaks, normalize_breaks, trim_details};
