//! Configuration types for Game of Life runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Seed;

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,
    /// Threads per generation, including the driving thread.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Generations to run. `None` runs until the process is stopped.
    #[serde(default)]
    pub generations: Option<u64>,
    /// Where each generation is drawn.
    #[serde(default)]
    pub render: RenderMode,
    /// Initial state.
    #[serde(default)]
    pub seed: Seed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 120,
            threads: default_threads(),
            generations: Some(1000),
            render: RenderMode::Console,
            seed: Seed::default(),
        }
    }
}

/// Output target for generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Redraw the grid on stdout every generation.
    #[default]
    Console,
    /// Draw nothing.
    None,
}

impl SimulationConfig {
    /// Total number of cells.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows.checked_mul(self.cols).is_none() {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be at least 2x2, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Thread count must be non-zero")]
    InvalidThreadCount,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
