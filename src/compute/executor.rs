//! Stepping engine - drives a [`Grid`] across generations on a fixed pool
//! of worker threads.
//!
//! The cell range is split once into ordered partitions. Partition 0 is
//! computed by the thread calling [`Executor::step`]; every other partition
//! belongs to a dedicated background worker spawned at construction and
//! reused for the executor's lifetime.
//!
//! Per generation the driving thread:
//! 1. opens the barrier's "proceed" gate so parked workers start computing,
//! 2. computes its own partition,
//! 3. waits at the "done" gate until every worker has finished,
//! 4. swaps the grid buffers and calls the render hook.
//!
//! Workers check the exit flag immediately after being released, so a
//! shutdown request is only observed between generations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use super::{Grid, Partition, SpinBarrier, partition};
use crate::render::Renderer;

/// State shared between the driving thread and its workers.
struct Shared {
    grid: Grid,
    barrier: SpinBarrier,
    exit: AtomicBool,
}

/// Generation stepper owning a grid, a renderer and a worker pool.
pub struct Executor<R: Renderer> {
    shared: Arc<Shared>,
    renderer: R,
    partitions: Vec<Partition>,
    workers: Vec<JoinHandle<()>>,
    generation: u64,
    /// Workers were released and have not yet been collected at the barrier.
    in_flight: bool,
}

impl<R: Renderer> Executor<R> {
    /// Build an executor over `grid` with up to `threads` threads in total,
    /// counting the calling thread.
    ///
    /// Fewer threads are used when the grid has fewer cells than `threads`.
    /// With a single partition no worker is spawned and no barrier is used.
    /// Otherwise this returns only once every worker is parked at the barrier.
    ///
    /// # Panics
    /// Panics if `threads` is zero or a worker thread cannot be spawned.
    pub fn new(threads: usize, grid: Grid, renderer: R) -> Self {
        assert!(threads > 0, "executor needs at least one thread");

        let partitions = partition(grid.size(), threads);
        let worker_count = partitions.len() - 1;
        let shared = Arc::new(Shared {
            grid,
            barrier: SpinBarrier::with_driver(worker_count.max(1)),
            exit: AtomicBool::new(false),
        });

        let workers: Vec<JoinHandle<()>> = partitions[1..]
            .iter()
            .enumerate()
            .map(|(k, &part)| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("life-worker-{}", k + 1))
                    .spawn(move || worker_loop(&shared, part))
                    .unwrap_or_else(|e| panic!("failed to spawn life worker {}: {e}", k + 1))
            })
            .collect();

        if worker_count > 0 {
            shared.barrier.wait_for(worker_count);
        }
        log::debug!(
            "executor ready: {}x{} grid, {} partition(s), {} worker thread(s)",
            shared.grid.rows(),
            shared.grid.cols(),
            partitions.len(),
            worker_count
        );

        Self {
            shared,
            renderer,
            partitions,
            workers,
            generation: 0,
            in_flight: false,
        }
    }

    /// Advance the grid by one generation.
    pub fn step(&mut self) {
        let grid = &self.shared.grid;

        if self.workers.is_empty() {
            for i in 0..grid.size() {
                grid.compute_next(i);
            }
        } else {
            let barrier = &self.shared.barrier;
            barrier.release();
            self.in_flight = true;
            for i in self.partitions[0].range() {
                let alive = grid.compute_next(i);
                self.renderer.render_cell(i, alive);
            }
            barrier.wait_for(self.workers.len());
            self.in_flight = false;
        }

        grid.advance_generation();
        self.generation += 1;
        log::trace!("generation {} complete", self.generation);

        self.renderer.render(grid);
    }

    /// Advance the grid by `generations` generations.
    pub fn run(&mut self, generations: u64) {
        for _ in 0..generations {
            self.step();
        }
    }

    /// Number of generations stepped so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The grid being stepped. Between calls to [`step`](Self::step) no
    /// worker is touching it.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.shared.grid
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Total threads used per generation, including the calling thread.
    #[inline]
    pub fn threads(&self) -> usize {
        self.partitions.len()
    }

    /// Cell ranges in thread order; entry 0 is the calling thread's.
    #[inline]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }
}

impl<R: Renderer> Drop for Executor<R> {
    fn drop(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        // A render hook panicked mid-generation: collect the workers first so
        // they are parked where the exit release expects them.
        if self.in_flight {
            self.shared.barrier.wait_for(self.workers.len());
        }
        self.shared.exit.store(true, Ordering::Release);
        self.shared.barrier.release();

        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("life-worker").to_owned();
            if handle.join().is_err() {
                // A worker died mid-generation; the grid can no longer be trusted.
                if !thread::panicking() {
                    panic!("{name} panicked");
                }
            }
        }
        log::debug!("executor shut down after {} generation(s)", self.generation);
    }
}

fn worker_loop(shared: &Shared, part: Partition) {
    loop {
        shared.barrier.wait();
        if shared.exit.load(Ordering::Acquire) {
            break;
        }
        for i in part.range() {
            shared.grid.compute_next(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;
    use std::sync::mpsc;
    use std::time::Duration;

    const STALL_LIMIT: Duration = Duration::from_secs(60);

    /// Run `f` on its own thread and fail instead of hanging if it stalls.
    fn within<F: FnOnce() + Send + 'static>(f: F) {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            f();
            let _ = tx.send(());
        });
        if let Err(mpsc::RecvTimeoutError::Timeout) = rx.recv_timeout(STALL_LIMIT) {
            panic!("executor stalled for more than {STALL_LIMIT:?}");
        }
        handle.join().unwrap();
    }

    /// Records every call it receives.
    #[derive(Default)]
    struct Recorder {
        cells: Vec<(usize, bool)>,
        frames: Vec<Vec<bool>>,
    }

    impl Renderer for Recorder {
        fn render_cell(&mut self, index: usize, alive: bool) {
            self.cells.push((index, alive));
        }

        fn render(&mut self, grid: &Grid) {
            self.frames.push(grid.snapshot());
        }
    }

    fn seeded_grid(rows: usize, cols: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(rows, cols);
        grid.randomize_seeded(seed);
        grid
    }

    #[test]
    #[should_panic(expected = "at least one thread")]
    fn test_zero_threads_panics() {
        let _ = Executor::new(0, Grid::new(4, 4), NullRenderer);
    }

    #[test]
    fn test_single_thread_spawns_no_workers() {
        let exec = Executor::new(1, Grid::new(4, 4), NullRenderer);
        assert_eq!(exec.threads(), 1);
        assert!(exec.workers.is_empty());
        assert_eq!(
            exec.partitions(),
            &[Partition {
                offset: 0,
                count: 16
            }]
        );
    }

    #[test]
    fn test_threads_capped_by_cell_count() {
        let exec = Executor::new(16, Grid::new(2, 3), NullRenderer);
        assert_eq!(exec.threads(), 6);
        assert_eq!(exec.workers.len(), 5);
    }

    #[test]
    fn test_construction_parks_workers_at_driven_barrier() {
        within(|| {
            let exec = Executor::new(3, Grid::new(6, 6), NullRenderer);
            assert!(exec.shared.barrier.is_driven());
            assert_eq!(exec.shared.barrier.participants(), 2);
        });
    }

    #[test]
    fn test_two_threads_step_and_drop() {
        within(|| {
            let mut exec = Executor::new(2, seeded_grid(9, 7, 5), Recorder::default());
            let mut single = Executor::new(1, seeded_grid(9, 7, 5), NullRenderer);
            exec.run(25);
            single.run(25);
            assert_eq!(exec.generation(), 25);
            assert_eq!(exec.renderer().frames.len(), 25);
            assert_eq!(exec.grid().snapshot(), single.grid().snapshot());
        });
    }

    #[test]
    fn test_render_called_once_per_generation() {
        within(|| {
            let mut exec = Executor::new(3, seeded_grid(10, 10, 3), Recorder::default());
            exec.run(5);
            assert_eq!(exec.generation(), 5);
            assert_eq!(exec.renderer().frames.len(), 5);
            assert_eq!(exec.renderer().frames[4], exec.grid().snapshot());
        });
    }

    #[test]
    fn test_render_cell_covers_driver_partition_only() {
        within(|| {
            let mut exec = Executor::new(4, seeded_grid(8, 8, 9), Recorder::default());
            exec.step();

            let own = exec.partitions()[0];
            let indices: Vec<usize> = exec.renderer().cells.iter().map(|&(i, _)| i).collect();
            assert_eq!(indices, own.range().collect::<Vec<_>>());

            let frame = exec.grid().snapshot();
            for &(i, alive) in &exec.renderer().cells {
                assert_eq!(frame[i], alive, "incremental value for cell {i} differs");
            }
        });
    }

    #[test]
    fn test_multi_thread_matches_single_thread_every_generation() {
        within(|| {
            let mut single = Executor::new(1, seeded_grid(23, 17, 11), NullRenderer);
            let mut multi = Executor::new(4, seeded_grid(23, 17, 11), NullRenderer);

            assert_eq!(single.grid().snapshot(), multi.grid().snapshot());
            for generation in 1..=100 {
                single.step();
                multi.step();
                assert_eq!(
                    single.grid().snapshot(),
                    multi.grid().snapshot(),
                    "diverged at generation {generation}"
                );
            }
        });
    }

    #[test]
    fn test_drop_joins_workers() {
        within(|| {
            for threads in 2..=6 {
                let mut exec =
                    Executor::new(threads, seeded_grid(6, 6, threads as u64), NullRenderer);
                exec.run(10);
                drop(exec);
            }
        });
    }

    #[test]
    fn test_drop_without_stepping() {
        within(|| {
            let exec = Executor::new(4, Grid::new(5, 5), NullRenderer);
            drop(exec);
        });
    }
}
