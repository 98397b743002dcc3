//! Analysis module - RLE decoding, board storage, statistics, and the
//! classification decision procedure.

pub mod board;
pub mod classifier;
pub mod rle;
pub mod stats;

pub use board::*;
pub use classifier::*;
pub use rle::*;
pub use stats::*;
