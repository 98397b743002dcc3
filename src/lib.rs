//! Behavioral classification of Conway's Game of Life runs.
//!
//! This crate reconstructs a multi-generation Game of Life run from a
//! sequence of run-length-encoded (RLE) snapshot files, one per
//! generation, and reduces it to a coarse behavioral class:
//!
//! - **Class 1** - the run supplied fewer snapshots than requested
//!   (insufficient data);
//! - **Class 2** - some generation repeats an earlier one (cyclic);
//! - **Class 3** - everything else.
//!
//! Class 3 runs additionally carry a unified board covering the union
//! of every generation's rectangle, and windowed statistics over the
//! trailing generations: alive-cell ratio, percent change, active-cell
//! ratio, and expansion rates. Generations are read as given, never
//! simulated.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and per-snapshot geometry types
//! - `analysis`: RLE decoding, board storage, statistics, classification
//!
//! # Example
//!
//! ```rust
//! use conway_classifier::{
//!     analysis::{Classification, RunClassifier},
//!     schema::ClassifierConfig,
//! };
//!
//! // A period-2 blinker: generation 2 repeats generation 0.
//! let vertical = "#CXRLE Pos=1,0\nx = 1, y = 3, rule = B3/S23\no$o$o!";
//! let horizontal = "#CXRLE Pos=0,1\nx = 3, y = 1, rule = B3/S23\n3o!";
//! let sources = vec![
//!     vertical.to_string(),
//!     horizontal.to_string(),
//!     vertical.to_string(),
//! ];
//!
//! let config = ClassifierConfig {
//!     generations: 2,
//!     ..ClassifierConfig::default()
//! };
//! let run = RunClassifier::new(&sources, &config).unwrap();
//! assert_eq!(run.classification(), Classification::Class2);
//! ```

pub mod analysis;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use analysis::{Classification, ClassifierError, RunClassifier};
pub use schema::{Axis, ClassifierConfig};
