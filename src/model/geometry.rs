//! Page geometry: points, quad regions and their bounding boxes.

use serde::{Deserialize, Serialize};

/// A point in PDF page space (origin bottom-left, y grows upward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a quad region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from explicit extents.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

/// One marked area of an annotation, usually covering a single line.
///
/// Corners are stored in the order they were received (top-left, top-right,
/// bottom-left, bottom-right for PDF QuadPoints); only their extents matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadRegion {
    pub corners: [Point; 4],
}

impl QuadRegion {
    /// Create a region from four corner points.
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Create an axis-aligned region spanning the given rectangle.
    pub fn from_rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new([
            Point::new(min_x, max_y),
            Point::new(max_x, max_y),
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
        ])
    }

    /// Axis-aligned bounding box over the four corners.
    pub fn bounds(&self) -> Bounds {
        let first = self.corners[0];
        self.corners.iter().skip(1).fold(
            Bounds::new(first.x, first.x, first.y, first.y),
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }
}

/// Quad points as they arrive from a document parser.
///
/// Two encodings exist in the wild: a flat list with eight numbers per quad
/// (`x1 y1 x2 y2 x3 y3 x4 y4`), and a nested list of four corner points per quad.
/// Both are resolved to [`QuadRegion`]s at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuadPoints {
    /// Flat numeric encoding, 8 numbers per quad.
    Flat(Vec<f64>),
    /// Nested corner-point encoding.
    Corners(Vec<[Point; 4]>),
}

impl QuadPoints {
    /// Normalize to quad regions in the order they were given.
    pub fn to_regions(&self) -> Vec<QuadRegion> {
        match self {
            QuadPoints::Flat(values) => {
                let chunks = values.chunks_exact(8);
                if !chunks.remainder().is_empty() {
                    log::debug!(
                        "Ignoring {} trailing quad point values",
                        chunks.remainder().len()
                    );
                }
                chunks
                    .map(|c| {
                        QuadRegion::new([
                            Point::new(c[0], c[1]),
                            Point::new(c[2], c[3]),
                            Point::new(c[4], c[5]),
                            Point::new(c[6], c[7]),
                        ])
                    })
                    .collect()
            }
            QuadPoints::Corners(quads) => quads.iter().map(|q| QuadRegion::new(*q)).collect(),
        }
    }

    /// Number of complete quads.
    pub fn len(&self) -> usize {
        match self {
            QuadPoints::Flat(values) => values.len() / 8,
            QuadPoints::Corners(quads) => quads.len(),
        }
    }

    /// Whether there are no complete quads.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Round half-way cases toward positive infinity (`Math.round` behaviour).
///
/// `f64::round` rounds half away from zero, which differs for negative halves.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
