//! Throughput measurement for the stepping engine.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::compute::{Executor, Grid};
use crate::render::NullRenderer;

/// Timing summary for a benchmark run.
///
/// CPU time is estimated as wall time multiplied by the thread count, since
/// every thread spins for the whole run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub rows: usize,
    pub cols: usize,
    pub cells: usize,
    pub iterations: u64,
    pub threads: usize,
    pub real_time: Duration,
}

impl BenchReport {
    /// Total cell updates performed.
    pub fn cell_updates(&self) -> u128 {
        self.cells as u128 * self.iterations as u128
    }

    pub fn cpu_time(&self) -> Duration {
        const NANOS_PER_SEC: u128 = 1_000_000_000;
        let nanos = self.real_time.as_nanos().saturating_mul(self.threads as u128);
        let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
        Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
    }

    pub fn iterations_per_real_second(&self) -> f64 {
        self.iterations as f64 / self.real_time.as_secs_f64()
    }

    pub fn iterations_per_cpu_second(&self) -> f64 {
        self.iterations as f64 / self.cpu_time().as_secs_f64()
    }

    pub fn cell_updates_per_real_second(&self) -> f64 {
        self.cell_updates() as f64 / self.real_time.as_secs_f64()
    }

    pub fn cell_updates_per_cpu_second(&self) -> f64 {
        self.cell_updates() as f64 / self.cpu_time().as_secs_f64()
    }

    pub fn real_ns_per_cell_update(&self) -> f64 {
        self.real_time.as_nanos() as f64 / self.cell_updates() as f64
    }

    pub fn cpu_ns_per_cell_update(&self) -> f64 {
        self.cpu_time().as_nanos() as f64 / self.cell_updates() as f64
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Columns: {}", self.cols)?;
        writeln!(f, "Cells: {}", self.cells)?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Total cell updates: {}", self.cell_updates())?;
        writeln!(f, "Threads: {}", self.threads)?;
        writeln!(f, "Total real time: {:.6}s", self.real_time.as_secs_f64())?;
        writeln!(f, "Total CPU time: {:.6}s", self.cpu_time().as_secs_f64())?;
        writeln!(f, "Iterations per real second: {:.1}", self.iterations_per_real_second())?;
        writeln!(f, "Iterations per CPU second: {:.1}", self.iterations_per_cpu_second())?;
        writeln!(f, "Cell updates per real second: {:.1}", self.cell_updates_per_real_second())?;
        writeln!(f, "Cell updates per CPU second: {:.1}", self.cell_updates_per_cpu_second())?;
        writeln!(f, "Real time per cell update: {:.3}ns", self.real_ns_per_cell_update())?;
        write!(f, "CPU time per cell update: {:.3}ns", self.cpu_ns_per_cell_update())
    }
}

/// Step a randomized `rows x cols` grid `iterations` times with no rendering.
///
/// # Panics
/// Panics if `iterations` is zero, or on the same preconditions as
/// [`Grid::new`] and [`Executor::new`].
pub fn run_benchmark(rows: usize, cols: usize, threads: usize, iterations: u64) -> BenchReport {
    assert!(iterations > 0, "benchmark needs at least one iteration");

    let mut grid = Grid::new(rows, cols);
    grid.randomize();
    let mut executor = Executor::new(threads, grid, NullRenderer);

    let start = Instant::now();
    executor.run(iterations);
    let real_time = start.elapsed().max(Duration::from_nanos(1));

    BenchReport {
        rows,
        cols,
        cells: rows * cols,
        iterations,
        threads: executor.threads(),
        real_time,
    }
}
