//! Run classification - reduces a sequence of RLE snapshots to one of
//! three coarse behavioral classes.
//!
//! Class 1: the run supplied fewer snapshots than requested (the
//! universe died or stabilized early). Class 2: some generation repeats
//! an earlier one, so the run has entered a cycle. Class 3: everything
//! else. Classes 1 and 2 are decided before the board is ever
//! allocated; only class 3 runs carry a board and statistics.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use log::debug;

use super::board::{Board, BoardError, BoundingBox, FillError, Snapshot};
use super::rle::{FormatError, Header, decode_cells};
use super::stats::{RunStats, mean};
use crate::schema::{Axis, ClassifierConfig, ConfigError, SnapshotGeometry};

/// Coarse behavioral class of a run.
///
/// `Unclassified` is the pre-terminal state of the decision procedure;
/// a constructed [`RunClassifier`] always carries one of the three
/// terminal classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Unclassified,
    /// Fewer snapshots than requested generations: insufficient data.
    Class1,
    /// A generation repeats an earlier one: the run is cyclic.
    Class2,
    /// Neither out of data nor cyclic.
    Class3,
}

impl Classification {
    /// Numeric class code (0 for the pre-terminal state).
    pub fn code(self) -> u8 {
        match self {
            Classification::Unclassified => 0,
            Classification::Class1 => 1,
            Classification::Class2 => 2,
            Classification::Class3 => 3,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Unclassified => "unclassified",
            Classification::Class1 => "class 1",
            Classification::Class2 => "class 2",
            Classification::Class3 => "class 3",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised while constructing or querying a [`RunClassifier`].
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Fill(#[from] FillError),
    #[error("Generation source {generation} is missing its header lines")]
    TruncatedSource { generation: usize },
    #[error("Generation {generation} outside the statistics window starting at {start}")]
    OutsideStatsWindow { generation: usize, start: usize },
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A classified run: the terminal class plus, for class 3 runs, the
/// unified board and its windowed statistics.
///
/// Construction is all-or-nothing: a malformed header or body, or an
/// unallocatable board, fails `new` outright and leaves no partial
/// object. Once constructed, [`classification`](Self::classification)
/// is a memoized field read and never fails.
#[derive(Debug)]
pub struct RunClassifier {
    class: Classification,
    rule: String,
    gen_count: usize,
    geometries: Vec<SnapshotGeometry>,
    board: Option<Board>,
    stats: RunStats,
}

impl RunClassifier {
    /// Classify a run from its in-memory snapshot texts, ordered by
    /// generation. `sources[0]` is the initial layout; a fully
    /// populated run supplies `config.generations + 1` sources and any
    /// extras beyond that are ignored.
    pub fn new(sources: &[String], config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;

        // Fewer snapshots than requested means the run ended early;
        // that is a classification, not an error.
        if sources.len() < config.generations + 1 {
            debug!(
                "{} sources for {} generations: insufficient data",
                sources.len(),
                config.generations
            );
            return Ok(Self::voided(Classification::Class1, String::new()));
        }
        let sources = &sources[..config.generations + 1];
        let gen_count = sources.len();

        // Pass 1: headers only, to learn each generation's rectangle.
        let mut headers = Vec::with_capacity(gen_count);
        for (generation, text) in sources.iter().enumerate() {
            headers.push(split_source(text, generation)?);
        }
        let rule = headers[0].0.rule.clone();

        // Cycle check. The canonical encoding is the sorted
        // snapshot-relative live-cell list, so translated copies of the
        // same pattern compare equal. Sequential: each generation is
        // judged against every earlier one.
        let mut seen: HashMap<Vec<(i64, i64)>, usize> = HashMap::new();
        for (generation, (_, body)) in headers.iter().enumerate() {
            let cells = decode_cells(body)?;
            if let Some(&first) = seen.get(&cells) {
                debug!("generation {generation} repeats generation {first}: run is cyclic");
                return Ok(Self::voided(Classification::Class2, rule));
            }
            seen.insert(cells, generation);
        }

        let geometries: Vec<SnapshotGeometry> =
            headers.iter().map(|(header, _)| header.geometry).collect();
        let bbox = BoundingBox::union_all(&geometries).ok_or(BoardError::Allocation {
            gen_count,
            width: 0,
            height: 0,
        })?;
        let mut board = Board::allocate(gen_count, bbox)?;
        debug!(
            "board {}x{} at ({}, {}) over {} generations",
            board.width(),
            board.height(),
            board.origin().0,
            board.origin().1,
            gen_count
        );

        // Pass 2: replay bodies into the board, one worker per
        // generation slab.
        let snapshots: Vec<Snapshot<'_>> = headers
            .iter()
            .map(|(header, body)| Snapshot {
                geometry: header.geometry,
                body: *body,
            })
            .collect();
        if config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_threads)
                .build()?;
            pool.install(|| board.fill(&snapshots))?;
        } else {
            board.fill(&snapshots)?;
        }

        let stats = RunStats::compute(&board, config.stat_start_gen(gen_count), config);
        debug!("run classified as {}", Classification::Class3);

        Ok(Self {
            class: Classification::Class3,
            rule,
            gen_count,
            geometries,
            board: Some(board),
            stats,
        })
    }

    /// The defined empty state for runs classified before the board
    /// exists: zero counts, empty vectors, no board.
    fn voided(class: Classification, rule: String) -> Self {
        Self {
            class,
            rule,
            gen_count: 0,
            geometries: Vec::new(),
            board: None,
            stats: RunStats::empty(),
        }
    }

    /// The memoized terminal class. Never fails.
    pub fn classification(&self) -> Classification {
        self.class
    }

    /// Rule string as written in the headers (e.g. `B3/S23`). Empty for
    /// class 1 runs, whose headers are never parsed.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Number of generations held, the requested count plus one for the
    /// starting condition. Zero for class 1 and class 2 runs.
    pub fn generation_count(&self) -> usize {
        self.gen_count
    }

    /// Top-left corner (x, y) of the global board. `(0, 0)` when the
    /// board was never allocated.
    pub fn origin(&self) -> (i64, i64) {
        match &self.board {
            Some(board) => board.origin(),
            None => (0, 0),
        }
    }

    /// Global board width and height. `(0, 0)` when the board was never
    /// allocated.
    pub fn dimensions(&self) -> (i64, i64) {
        match &self.board {
            Some(board) => (board.width(), board.height()),
            None => (0, 0),
        }
    }

    /// Minimum and one-past-maximum coordinate of one generation's own
    /// rectangle along the given axis.
    pub fn min_max(&self, generation: usize, axis: Axis) -> Result<(i64, i64), ClassifierError> {
        let geom = self
            .geometries
            .get(generation)
            .ok_or(BoardError::GenOutOfRange {
                generation,
                gen_count: self.gen_count,
            })?;
        Ok((geom.min(axis), geom.max(axis)))
    }

    /// Bounds-checked cell read on the global board.
    pub fn cell_value(&self, generation: usize, x: i64, y: i64) -> Result<bool, ClassifierError> {
        match &self.board {
            Some(board) => Ok(board.get(generation, x, y)?),
            None => Err(BoardError::GenOutOfRange { generation, gen_count: 0 }.into()),
        }
    }

    /// Alive-cell ratio for one window generation, or the window mean
    /// when `generation` is `None`.
    pub fn alive_cell_ratio(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        match generation {
            None => Ok(mean(&self.stats.alive_cell_ratio)),
            Some(generation) => self.window_value(&self.stats.alive_cell_ratio, generation, 0),
        }
    }

    /// Fraction of cells that changed between `generation - 1` and `generation`, or
    /// the window mean when `generation` is `None`. The earliest admissible
    /// generation is the second one in the window.
    pub fn percent_change(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        match generation {
            None => Ok(mean(&self.stats.percent_change)),
            Some(generation) => self.window_value(&self.stats.percent_change, generation, 1),
        }
    }

    /// Active-cell ratio for one window generation, or the window mean
    /// when `generation` is `None`.
    pub fn active_cell_ratio(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        match generation {
            None => Ok(mean(&self.stats.active_cell_ratio)),
            Some(generation) => self.window_value(&self.stats.active_cell_ratio, generation, 0),
        }
    }

    /// Width growth factor of one generation over its predecessor
    /// (1.5 means half again as wide), or the mean over the window when
    /// `generation` is `None`.
    pub fn expansion_rate_x(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        self.expansion_rate(generation, |geom| geom.width as f64)
    }

    /// Height growth factor, as [`expansion_rate_x`](Self::expansion_rate_x).
    pub fn expansion_rate_y(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        self.expansion_rate(generation, |geom| geom.height as f64)
    }

    /// Area growth factor, as [`expansion_rate_x`](Self::expansion_rate_x).
    pub fn expansion_rate_area(&self, generation: Option<usize>) -> Result<f64, ClassifierError> {
        self.expansion_rate(generation, |geom| geom.area() as f64)
    }

    /// Write one generation of the board, row-major over that
    /// generation's own rectangle: one character per cell, a line break
    /// after every row, and a trailing line break after the last.
    /// Conventionally `on_char` is `'1'` and `off_char` is `'0'`.
    pub fn print_game_board<W: Write>(
        &self,
        generation: usize,
        out: &mut W,
        on_char: char,
        off_char: char,
    ) -> Result<(), ClassifierError> {
        let geom = *self.geometries.get(generation).ok_or(BoardError::GenOutOfRange {
            generation,
            gen_count: self.gen_count,
        })?;
        let board = self.board.as_ref().ok_or(BoardError::GenOutOfRange {
            generation,
            gen_count: self.gen_count,
        })?;
        let mut line = String::with_capacity(geom.width as usize + 1);
        for row in 0..geom.height {
            line.clear();
            for col in 0..geom.width {
                let alive = board.get(generation, geom.offset.0 + col, geom.offset.1 + row)?;
                line.push(if alive { on_char } else { off_char });
            }
            line.push('\n');
            out.write_all(line.as_bytes())?;
        }
        out.write_all(b"\n")?;
        Ok(())
    }

    /// Look up one window-relative statistics value. `lead` is the
    /// number of leading window generations the vector does not cover.
    fn window_value(
        &self,
        values: &[f64],
        generation: usize,
        lead: usize,
    ) -> Result<f64, ClassifierError> {
        let start = self.stats.stat_start_gen + lead;
        if generation < start || generation >= self.gen_count {
            return Err(ClassifierError::OutsideStatsWindow { generation, start });
        }
        Ok(values[generation - start])
    }

    fn expansion_rate(
        &self,
        generation: Option<usize>,
        extent: impl Fn(&SnapshotGeometry) -> f64,
    ) -> Result<f64, ClassifierError> {
        match generation {
            Some(generation) => {
                if generation == 0 || generation >= self.gen_count {
                    return Err(BoardError::GenOutOfRange {
                        generation,
                        gen_count: self.gen_count,
                    }
                    .into());
                }
                Ok(extent(&self.geometries[generation]) / extent(&self.geometries[generation - 1]))
            }
            None => {
                // Generation 0 has no predecessor, so a window starting
                // there averages from generation 1.
                let start = self.stats.stat_start_gen.max(1);
                let rates: Vec<f64> = (start..self.gen_count)
                    .map(|g| extent(&self.geometries[g]) / extent(&self.geometries[g - 1]))
                    .collect();
                Ok(mean(&rates))
            }
        }
    }
}

/// Split one snapshot text into its parsed header and body remainder.
fn split_source(text: &str, generation: usize) -> Result<(Header, &str), ClassifierError> {
    let Some((line1, rest)) = text.split_once('\n') else {
        return Err(ClassifierError::TruncatedSource { generation });
    };
    let (line2, body) = rest.split_once('\n').unwrap_or((rest, ""));
    let header = Header::parse(line1, line2)?;
    Ok((header, body))
}
