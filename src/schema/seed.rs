//! Seed types for initializing a grid.

use serde::{Deserialize, Serialize};

use crate::compute::Grid;

/// Standard glider, heading toward +row/+col, as `(row, col)` offsets.
pub const GLIDER: [(usize, usize); 5] = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

/// Horizontal period-2 oscillator.
pub const BLINKER: [(usize, usize); 3] = [(0, 0), (0, 1), (0, 2)];

/// Initial state for a grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

/// Predefined initial states.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// One unbiased random bit per cell.
    Random {
        /// Fixed seed for a reproducible grid; `None` draws from entropy.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// A single glider with its bounding box at `(row, col)`.
    Glider { row: usize, col: usize },
    /// A single blinker starting at `(row, col)`.
    Blinker { row: usize, col: usize },
    /// Explicit list of live `(row, col)` cells.
    Custom { cells: Vec<(usize, usize)> },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Random { seed: None }
    }
}

impl Seed {
    /// Replace the grid's current generation with this seed.
    ///
    /// Pattern coordinates wrap around the torus, so a pattern placed near
    /// an edge continues on the opposite side.
    pub fn apply(&self, grid: &mut Grid) {
        match &self.pattern {
            Pattern::Random { seed: Some(seed) } => grid.randomize_seeded(*seed),
            Pattern::Random { seed: None } => grid.randomize(),
            Pattern::Glider { row, col } => place(grid, *row, *col, &GLIDER),
            Pattern::Blinker { row, col } => place(grid, *row, *col, &BLINKER),
            Pattern::Custom { cells } => place(grid, 0, 0, cells),
        }
    }
}

fn place(grid: &mut Grid, row: usize, col: usize, cells: &[(usize, usize)]) {
    grid.clear();
    let (rows, cols) = (grid.rows(), grid.cols());
    for &(dr, dc) in cells {
        grid.set((row % rows + dr % rows) % rows, (col % cols + dc % cols) % cols, true);
    }
}
