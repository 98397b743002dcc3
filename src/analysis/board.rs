//! Unified board storage - bounding-box union across generations and the
//! flat generation-major cell store.
//!
//! Every generation snapshot declares its own rectangle; the union of
//! those rectangles sizes one global board that all generations share.
//! Cells live in a single flat `Vec<bool>` indexed generation-major,
//! then row-major: advancing one element moves one column to the right.

use rayon::prelude::*;

use super::rle::{FormatError, decode_body};
use crate::schema::SnapshotGeometry;

/// Errors raised by board allocation or cell addressing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Board dimensions {gen_count} x {width} x {height} are empty or overflow")]
    Allocation {
        gen_count: usize,
        width: i64,
        height: i64,
    },
    #[error("Generation {generation} outside 0..{gen_count}")]
    GenOutOfRange { generation: usize, gen_count: usize },
    #[error("Cell ({x}, {y}) outside the board rectangle")]
    CellOutOfRange { x: i64, y: i64 },
}

/// Errors raised while replaying decoded snapshots into the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Expected {expected} snapshots, got {got}")]
    SnapshotCount { expected: usize, got: usize },
}

/// Global bounding rectangle: the union of all per-generation rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// Union the declared rectangles of all generations, in generation
    /// order. Returns `None` for an empty sequence.
    pub fn union_all(geometries: &[SnapshotGeometry]) -> Option<Self> {
        let mut iter = geometries.iter();
        let first = iter.next()?;
        let mut bbox = Self::from_geometry(first);
        for geom in iter {
            bbox.min_x = bbox.min_x.min(geom.offset.0);
            bbox.min_y = bbox.min_y.min(geom.offset.1);
            bbox.max_x = bbox.max_x.max(geom.offset.0 + geom.width);
            bbox.max_y = bbox.max_y.max(geom.offset.1 + geom.height);
        }
        Some(bbox)
    }

    fn from_geometry(geom: &SnapshotGeometry) -> Self {
        Self {
            min_x: geom.offset.0,
            min_y: geom.offset.1,
            max_x: geom.offset.0 + geom.width,
            max_y: geom.offset.1 + geom.height,
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }

    /// Whether `geom` lies entirely inside this box.
    pub fn contains(&self, geom: &SnapshotGeometry) -> bool {
        geom.offset.0 >= self.min_x
            && geom.offset.1 >= self.min_y
            && geom.offset.0 + geom.width <= self.max_x
            && geom.offset.1 + geom.height <= self.max_y
    }
}

/// One generation's decoded input for the fill pass: its declared
/// geometry plus the raw body text to replay.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub geometry: SnapshotGeometry,
    pub body: &'a str,
}

/// Flat boolean store for `gen_count` generations of one global board.
///
/// Origin and dimensions are fixed at allocation. Cells start dead and
/// are only ever set alive during the fill pass.
#[derive(Debug)]
pub struct Board {
    origin: (i64, i64),
    width: i64,
    height: i64,
    gen_count: usize,
    cells: Vec<bool>,
}

impl Board {
    /// Allocate an all-dead board covering `bbox` for `gen_count`
    /// generations. Empty dimensions or an overflowing total size are
    /// rejected.
    pub fn allocate(gen_count: usize, bbox: BoundingBox) -> Result<Self, BoardError> {
        let width = bbox.width();
        let height = bbox.height();
        let invalid = || BoardError::Allocation {
            gen_count,
            width,
            height,
        };
        if gen_count == 0 || width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let stride = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(invalid)?;
        let size = stride.checked_mul(gen_count).ok_or_else(invalid)?;
        Ok(Self {
            origin: (bbox.min_x, bbox.min_y),
            width,
            height,
            gen_count,
            cells: vec![false; size],
        })
    }

    /// Top-left corner (x, y) of the global rectangle.
    #[inline]
    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.height
    }

    #[inline]
    pub fn gen_count(&self) -> usize {
        self.gen_count
    }

    /// Cells per generation (the global area).
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat index of `(generation, x, y)`:
    /// `generation * width * height + (y - origin_y) * width + (x - origin_x)`.
    pub fn index(&self, generation: usize, x: i64, y: i64) -> Result<usize, BoardError> {
        if generation >= self.gen_count {
            return Err(BoardError::GenOutOfRange {
                generation,
                gen_count: self.gen_count,
            });
        }
        let col = x - self.origin.0;
        let row = y - self.origin.1;
        if col < 0 || col >= self.width || row < 0 || row >= self.height {
            return Err(BoardError::CellOutOfRange { x, y });
        }
        Ok(generation * self.area() + (row * self.width + col) as usize)
    }

    /// Bounds-checked cell read.
    pub fn get(&self, generation: usize, x: i64, y: i64) -> Result<bool, BoardError> {
        Ok(self.cells[self.index(generation, x, y)?])
    }

    /// Bounds-checked cell write.
    pub fn set(&mut self, generation: usize, x: i64, y: i64, value: bool) -> Result<(), BoardError> {
        let index = self.index(generation, x, y)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Iterate generation slabs in order, each row-major over the
    /// global rectangle.
    pub fn generations(&self) -> std::slice::Chunks<'_, bool> {
        self.cells.chunks(self.area())
    }

    /// Replay every snapshot into the store, one rayon task per
    /// generation slab. The storage is generation-major, so the slabs
    /// are disjoint and workers never alias; ranges are fixed by
    /// `par_chunks_mut` before any worker starts.
    pub fn fill(&mut self, snapshots: &[Snapshot<'_>]) -> Result<(), FillError> {
        if snapshots.len() != self.gen_count {
            return Err(FillError::SnapshotCount {
                expected: self.gen_count,
                got: snapshots.len(),
            });
        }
        let bbox = BoundingBox {
            min_x: self.origin.0,
            min_y: self.origin.1,
            max_x: self.origin.0 + self.width,
            max_y: self.origin.1 + self.height,
        };
        for snapshot in snapshots {
            if !bbox.contains(&snapshot.geometry) {
                return Err(BoardError::CellOutOfRange {
                    x: snapshot.geometry.offset.0,
                    y: snapshot.geometry.offset.1,
                }
                .into());
            }
        }
        let stride = self.area();
        let origin = self.origin;
        let width = self.width;
        self.cells
            .par_chunks_mut(stride)
            .zip(snapshots.par_iter())
            .try_for_each(|(slab, snapshot)| {
                fill_generation(slab, origin, width, snapshot)
            })?;
        Ok(())
    }
}

/// Replay one snapshot's live runs into its generation slab, translating
/// from the snapshot's own offset to the global origin. The caller has
/// already checked that the snapshot rectangle lies inside the board.
fn fill_generation(
    slab: &mut [bool],
    origin: (i64, i64),
    width: i64,
    snapshot: &Snapshot<'_>,
) -> Result<(), FormatError> {
    let geom = &snapshot.geometry;
    for run in decode_body(snapshot.body) {
        let run = run?;
        if run.row >= geom.height || run.len > geom.width - run.col {
            return Err(FormatError::RunOutsideSnapshot {
                row: run.row,
                col: run.col,
            });
        }
        let row = geom.offset.1 + run.row - origin.1;
        let col = geom.offset.0 + run.col - origin.0;
        let base = (row * width + col) as usize;
        slab[base..base + run.len as usize].fill(true);
    }
    Ok(())
}
