//! Configuration types for run classification parameters.

use serde::{Deserialize, Serialize};

/// Default tail percentage of generations covered by the statistics window.
fn default_end_calc_percent() -> u32 {
    25
}

/// Default length of the consecutive-alive streak required of an active cell.
fn default_consecutive_alive_len() -> usize {
    5
}

/// Default look-back range within which an active cell must have been dead.
fn default_dead_within_len() -> usize {
    25
}

/// Top-level classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Requested number of generations beyond the starting condition.
    /// A fully populated run supplies `generations + 1` snapshots
    /// (generation 0 is the initial layout).
    pub generations: usize,
    /// Statistics are computed over the trailing `end_calc_percent` percent
    /// of generations. 25 means the last quarter of the run.
    #[serde(default = "default_end_calc_percent")]
    pub end_calc_percent: u32,
    /// How many immediately preceding generations a cell must have been
    /// alive (in addition to the current one) to count as recently alive.
    #[serde(default = "default_consecutive_alive_len")]
    pub consecutive_alive_len: usize,
    /// Look-back range of preceding generations within which a cell must
    /// have been dead at least once to count as recently dead.
    #[serde(default = "default_dead_within_len")]
    pub dead_within_len: usize,
    /// Worker thread cap for the board fill. 0 uses the rayon default pool.
    #[serde(default)]
    pub max_threads: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            end_calc_percent: default_end_calc_percent(),
            consecutive_alive_len: default_consecutive_alive_len(),
            dead_within_len: default_dead_within_len(),
            max_threads: 0,
        }
    }
}

impl ClassifierConfig {
    /// First generation index covered by the statistics window for a run
    /// of `gen_count` snapshots: `floor(gen_count * (1 - pct/100))`.
    pub fn stat_start_gen(&self, gen_count: usize) -> usize {
        let fraction = 1.0 - f64::from(self.end_calc_percent) / 100.0;
        (gen_count as f64 * fraction).floor() as usize
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.end_calc_percent == 0 || self.end_calc_percent > 100 {
            return Err(ConfigError::InvalidEndCalcPercent(self.end_calc_percent));
        }
        if self.consecutive_alive_len == 0 {
            return Err(ConfigError::InvalidAliveStreak);
        }
        if self.dead_within_len == 0 {
            return Err(ConfigError::InvalidDeadRange);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Generation count must be non-zero")]
    InvalidGenerations,
    #[error("end_calc_percent must be in 1..=100, got {0}")]
    InvalidEndCalcPercent(u32),
    #[error("consecutive_alive_len must be non-zero")]
    InvalidAliveStreak,
    #[error("dead_within_len must be non-zero")]
    InvalidDeadRange,
}
