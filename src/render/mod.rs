//! Render hooks invoked by the [`Executor`](crate::compute::Executor).
//!
//! The executor calls a renderer from the driving thread only, and only
//! while no worker is computing, so implementations may read the grid
//! freely. A renderer must not rely on grid state surviving past the next
//! generation.
//!
//! - [`NullRenderer`]: does nothing; used for throughput benchmarks.
//! - [`ConsoleRenderer`]: draws the grid as text frames to any writer.

mod console;

pub use console::ConsoleRenderer;

use crate::compute::Grid;

/// Observer of grid state, called once per generation.
pub trait Renderer {
    /// Incremental hook: cell `index` was just computed as `alive` for the
    /// generation in progress.
    ///
    /// Only called for cells computed on the driving thread. The default
    /// implementation does nothing.
    #[inline]
    fn render_cell(&mut self, _index: usize, _alive: bool) {}

    /// Whole-grid hook: called after the generation has been made current.
    fn render(&mut self, grid: &Grid);
}

/// Renderer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    #[inline]
    fn render(&mut self, _grid: &Grid) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    #[inline]
    fn render_cell(&mut self, index: usize, alive: bool) {
        (**self).render_cell(index, alive);
    }

    #[inline]
    fn render(&mut self, grid: &Grid) {
        (**self).render(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Executor;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Counter {
        cells: usize,
        frames: usize,
    }

    impl Renderer for Counter {
        fn render_cell(&mut self, _index: usize, _alive: bool) {
            self.cells += 1;
        }

        fn render(&mut self, _grid: &Grid) {
            self.frames += 1;
        }
    }

    #[test]
    fn test_borrowed_renderer_outlives_executor() {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut counter = Counter::default();
            {
                let mut executor = Executor::new(2, Grid::new(4, 4), &mut counter);
                executor.run(3);
            }
            let _ = tx.send((counter.frames, counter.cells));
        });
        let (frames, cells) = rx
            .recv_timeout(Duration::from_secs(60))
            .expect("executor stalled or panicked");
        assert_eq!(frames, 3);
        // Driver owns the first half of 16 cells.
        assert_eq!(cells, 3 * 8);
    }

    #[test]
    fn test_null_renderer_accepts_everything() {
        let grid = Grid::new(2, 2);
        let mut renderer = NullRenderer;
        renderer.render_cell(0, true);
        renderer.render(&grid);
    }
}
