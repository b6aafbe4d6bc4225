//! Toroid Life - Conway's Game of Life on a torus, stepped in parallel.
//!
//! This crate advances a binary B3/S23 cellular automaton whose edges wrap
//! around. Each generation is split across a fixed pool of worker threads
//! that meet twice per generation at a two-phase spin barrier.
//!
//! # Architecture
//!
//! - `schema`: Configuration and seed patterns
//! - `compute`: Grid, partitioning, spin barrier and the stepping executor
//! - `render`: Render hooks called once per generation
//! - `bench`: Throughput measurement
//!
//! # Example
//!
//! ```rust,no_run
//! use toroid_life::{
//!     compute::{Executor, Grid},
//!     render::NullRenderer,
//!     schema::{Pattern, Seed},
//! };
//!
//! let mut grid = Grid::new(64, 64);
//! Seed { pattern: Pattern::Glider { row: 0, col: 0 } }.apply(&mut grid);
//!
//! let mut executor = Executor::new(4, grid, NullRenderer);
//! executor.run(100);
//!
//! println!("Population after 100 generations: {}", executor.grid().population());
//! ```

pub mod bench;
pub mod compute;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::{Executor, Grid, Partition, SpinBarrier, partition};
pub use render::{ConsoleRenderer, NullRenderer, Renderer};
pub use schema::{Pattern, Seed, SimulationConfig};
