//! Annotation extraction: text layer ordering, quad resolution, stitching and
//! batch aggregation.

mod aggregator;
mod options;
mod resolver;
mod stitcher;
mod text_layer;

pub use aggregator::{
    collect, AnnotationAggregator, BatchOutcome, DocumentAnnotations, DocumentFailure,
    DocumentReport,
};
pub use options::{ExtractOptions, PageRange, ResolvedPages};
pub use resolver::{is_slim, is_wide, resolve};
pub use stitcher::{join_lines, stitch};
pub use text_layer::TextLayerIndex;
