//! Windowed behavioral statistics over a filled board.
//!
//! All vectors cover the trailing statistics window
//! `[stat_start_gen, gen_count - 1]` and are indexed relative to it.
//! `percent_change` is one element shorter than the window: its first
//! entry compares `stat_start_gen` with `stat_start_gen + 1`.

use super::board::Board;
use crate::schema::ClassifierConfig;

/// Per-generation statistics vectors for one run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// First generation index covered by the window.
    pub stat_start_gen: usize,
    /// Fraction of the global area alive, per window generation.
    pub alive_cell_ratio: Vec<f64>,
    /// Fraction of cells whose value differs from the previous
    /// generation, per window generation after the first.
    pub percent_change: Vec<f64>,
    /// Fraction of cells that are recently alive and recently dead,
    /// per window generation.
    pub active_cell_ratio: Vec<f64>,
}

impl RunStats {
    /// The voided state used when classification short-circuits before
    /// the board exists: every vector empty, so every averaged getter
    /// reports 0.0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute all statistics vectors for the window starting at
    /// `stat_start_gen`.
    pub fn compute(board: &Board, stat_start_gen: usize, config: &ClassifierConfig) -> Self {
        let slabs: Vec<&[bool]> = board.generations().collect();
        let gen_count = slabs.len();
        let area = board.area() as f64;

        let alive_cell_ratio = (stat_start_gen..gen_count)
            .map(|g| slabs[g].iter().filter(|&&alive| alive).count() as f64 / area)
            .collect();

        let percent_change = (stat_start_gen + 1..gen_count)
            .map(|g| {
                let differing = slabs[g - 1]
                    .iter()
                    .zip(slabs[g].iter())
                    .filter(|(prev, cur)| prev != cur)
                    .count();
                differing as f64 / area
            })
            .collect();

        let active_cell_ratio = (stat_start_gen..gen_count)
            .map(|g| {
                let active = (0..board.area())
                    .filter(|&i| {
                        cell_alive_recently(&slabs, g, i, config.consecutive_alive_len)
                            && cell_dead_recently(&slabs, g, i, config.dead_within_len)
                    })
                    .count();
                active as f64 / area
            })
            .collect();

        Self {
            stat_start_gen,
            alive_cell_ratio,
            percent_change,
            active_cell_ratio,
        }
    }
}

/// True iff the cell is alive at `generation` and in each of the `streak`
/// immediately preceding generations. False when fewer than `streak`
/// preceding generations exist.
fn cell_alive_recently(slabs: &[&[bool]], generation: usize, cell: usize, streak: usize) -> bool {
    if generation < streak {
        return false;
    }
    (generation - streak..=generation).all(|g| slabs[g][cell])
}

/// True iff the cell is dead in at least one of the `range` generations
/// immediately preceding `generation` (exclusive). Only the available history
/// is checked when fewer generations exist.
fn cell_dead_recently(slabs: &[&[bool]], generation: usize, cell: usize, range: usize) -> bool {
    (generation.saturating_sub(range)..generation).any(|g| !slabs[g][cell])
}

/// Arithmetic mean of a statistics vector. Defined as 0.0 for an empty
/// slice; this is the value every averaged getter reports for a run
/// whose statistics were never populated.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::board::{Board, BoundingBox};
    use crate::schema::SnapshotGeometry;

    fn board(gen_count: usize, width: i64, height: i64) -> Board {
        let bbox = BoundingBox::union_all(&[SnapshotGeometry {
            offset: (0, 0),
            width,
            height,
        }])
        .unwrap();
        Board::allocate(gen_count, bbox).unwrap()
    }

    fn config(alive_len: usize, dead_len: usize) -> ClassifierConfig {
        ClassifierConfig {
            consecutive_alive_len: alive_len,
            dead_within_len: dead_len,
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn test_alive_cell_ratio() {
        let mut board = board(1, 10, 10);
        for i in 0..25 {
            board.set(0, i % 10, i / 10, true).unwrap();
        }
        let stats = RunStats::compute(&board, 0, &config(5, 25));
        assert_eq!(stats.alive_cell_ratio, vec![0.25]);
    }

    #[test]
    fn test_percent_change_counts_flips() {
        let mut board = board(2, 10, 10);
        // Three cells alive in both generations, five flips: two deaths
        // and three births.
        for x in 0..5 {
            board.set(0, x, 0, true).unwrap();
        }
        for x in 2..8 {
            board.set(1, x, 0, true).unwrap();
        }
        let stats = RunStats::compute(&board, 0, &config(5, 25));
        assert_eq!(stats.percent_change, vec![0.05]);
    }

    #[test]
    fn test_percent_change_is_one_shorter_than_window() {
        let board = board(6, 3, 3);
        let stats = RunStats::compute(&board, 2, &config(5, 25));
        assert_eq!(stats.alive_cell_ratio.len(), 4);
        assert_eq!(stats.percent_change.len(), 3);
        assert_eq!(stats.active_cell_ratio.len(), 4);
    }

    #[test]
    fn test_active_cell_requires_full_alive_streak() {
        // Alive from generation 0 on, with history shorter than the
        // streak at every window generation: never active.
        let mut board = board(4, 1, 1);
        for g in 0..4 {
            board.set(g, 0, 0, true).unwrap();
        }
        let stats = RunStats::compute(&board, 0, &config(5, 25));
        assert_eq!(stats.active_cell_ratio, vec![0.0; 4]);
    }

    #[test]
    fn test_active_cell_dead_occurrence_window_boundary() {
        // Generation 26 is the only window generation. The cell is alive
        // everywhere except one early generation.
        let alive_except = |dead_gen: usize| {
            let mut b = board(27, 1, 1);
            for g in 0..27 {
                b.set(g, 0, 0, g != dead_gen).unwrap();
            }
            b
        };
        // Dead 26 generations before g=26: one generation outside the
        // 25-generation look-back, so the cell is not active.
        let stats = RunStats::compute(&alive_except(0), 26, &config(5, 25));
        assert_eq!(stats.active_cell_ratio, vec![0.0]);
        // Dead exactly 25 generations before: inside the look-back.
        let stats = RunStats::compute(&alive_except(1), 26, &config(5, 25));
        assert_eq!(stats.active_cell_ratio, vec![1.0]);
    }

    #[test]
    fn test_active_cell_recent_death_breaks_streak() {
        // Dead one generation ago: recently dead, but the alive streak
        // is broken, so not active.
        let mut b = board(10, 1, 1);
        for g in 0..10 {
            b.set(g, 0, 0, g != 8).unwrap();
        }
        let stats = RunStats::compute(&b, 9, &config(5, 25));
        assert_eq!(stats.active_cell_ratio, vec![0.0]);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[0.5]), 0.5);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
