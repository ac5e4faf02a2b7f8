//! Small geometry helpers shared by the object model and the reducer.

use serde::{Deserialize, Serialize};

/// A point in document space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a point sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Smallest x over all points.
    pub min_x: f64,
    /// Smallest y over all points.
    pub min_y: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Bounds {
    /// The minimum corner of the box.
    #[must_use]
    pub const fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Total over all inputs: NaN maps to `min`, and an inverted range never
/// panics (values below `min` give `min`, everything else is capped at `max`).
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Compute the bounding box of a flat `[x0, y0, x1, y1, ...]` sequence.
///
/// An unpaired trailing coordinate is ignored. An empty sequence yields a
/// zero-sized box at the origin.
#[must_use]
pub fn bounds_from_points(points: &[f64]) -> Bounds {
    let mut pairs = points.chunks_exact(2);
    let Some(first) = pairs.next() else {
        return Bounds::default();
    };

    let (mut min_x, mut min_y) = (first[0], first[1]);
    let (mut max_x, mut max_y) = (min_x, min_y);
    for pair in pairs {
        min_x = min_x.min(pair[0]);
        max_x = max_x.max(pair[0]);
        min_y = min_y.min(pair[1]);
        max_y = max_y.max(pair[1]);
    }

    Bounds {
        min_x,
        min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
