//! Data model for text tokens, quad geometry and annotations.
//!
//! Tokens and raw records come from a document parser and are never mutated.
//! The aggregator turns each [`AnnotationRecord`] into a new [`Annotation`]
//! carrying provenance and resolved text.

mod annotation;
mod geometry;
mod token;

pub use annotation::{Annotation, AnnotationRecord, Provenance, Subtype};
pub(crate) use geometry::round_half_up;
pub use geometry::{Bounds, Point, QuadPoints, QuadRegion};
pub use token::TextToken;
