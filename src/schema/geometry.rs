//! Per-snapshot geometry records derived from RLE headers.

use serde::{Deserialize, Serialize};

/// Axis selector for extent queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Declared bounding rectangle of one generation snapshot.
///
/// Coordinates follow the Golly convention: x grows to the right and
/// y grows downward, so `offset` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotGeometry {
    /// Top-left corner (x, y) of this snapshot's rectangle.
    pub offset: (i64, i64),
    /// Rectangle width in cells.
    pub width: i64,
    /// Rectangle height in cells.
    pub height: i64,
}

impl SnapshotGeometry {
    /// Minimum coordinate along the given axis.
    #[inline]
    pub fn min(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.offset.0,
            Axis::Y => self.offset.1,
        }
    }

    /// One past the maximum coordinate along the given axis.
    #[inline]
    pub fn max(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.offset.0 + self.width,
            Axis::Y => self.offset.1 + self.height,
        }
    }

    /// Extent along the given axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Rectangle area in cells.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width * self.height
    }
}
