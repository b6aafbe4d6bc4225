//! Compute module - Grid state, partitioning, synchronization and stepping.

mod barrier;
mod executor;
mod grid;
mod partition;

pub use barrier::*;
pub use executor::*;
pub use grid::*;
pub use partition::*;
