//! Text-mode renderer.

use std::io::{self, Write};

use super::Renderer;
use crate::compute::Grid;

const LIVE_CELL: u8 = b'x';
const DEAD_CELL: u8 = b' ';
/// Move the cursor to the top-left corner so each frame overwrites the last.
const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Draws each generation as a block of characters, one line per row.
///
/// The frame buffer is `rows * (cols + 1)` bytes: every row is followed by
/// a newline that is written once at construction and never touched again.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    frame: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, rows: usize, cols: usize) -> Self {
        let mut frame = vec![DEAD_CELL; rows * (cols + 1)];
        for i in (cols..frame.len()).step_by(cols + 1) {
            frame[i] = b'\n';
        }
        Self {
            out,
            frame,
            rows,
            cols,
        }
    }

    /// The most recently loaded frame.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Copy the current generation of `grid` into the frame buffer.
    ///
    /// # Panics
    /// Panics if the grid's dimensions differ from the renderer's.
    pub fn load(&mut self, grid: &Grid) {
        assert_eq!(
            (grid.rows(), grid.cols()),
            (self.rows, self.cols),
            "renderer and grid dimensions differ"
        );
        let mut cell = 0;
        for line in self.frame.chunks_exact_mut(self.cols + 1) {
            for c in &mut line[..self.cols] {
                *c = if grid.read_state(cell) {
                    LIVE_CELL
                } else {
                    DEAD_CELL
                };
                cell += 1;
            }
        }
    }

    /// Write the frame buffer to the output.
    pub fn draw(&mut self) -> io::Result<()> {
        self.out.write_all(CURSOR_HOME)?;
        self.out.write_all(&self.frame)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, grid: &Grid) {
        self.load(grid);
        if let Err(e) = self.draw() {
            log::warn!("failed to draw frame: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let mut grid = Grid::new(2, 3);
        grid.set(0, 0, true);
        grid.set(1, 2, true);

        let mut renderer = ConsoleRenderer::new(Vec::new(), 2, 3);
        renderer.load(&grid);
        assert_eq!(renderer.frame(), b"x  \n  x\n");
    }

    #[test]
    fn test_render_writes_cursor_home_then_frame() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 1, true);

        let mut renderer = ConsoleRenderer::new(Vec::new(), 2, 2);
        renderer.render(&grid);
        renderer.render(&grid);

        let out = renderer.into_inner();
        assert_eq!(out, b"\x1b[H  \n x\n\x1b[H  \n x\n");
    }

    #[test]
    #[should_panic(expected = "dimensions differ")]
    fn test_mismatched_grid_panics() {
        let grid = Grid::new(3, 3);
        let mut renderer = ConsoleRenderer::new(Vec::new(), 2, 2);
        renderer.load(&grid);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_does_not_panic() {
        let grid = Grid::new(2, 2);
        let mut renderer = ConsoleRenderer::new(FailingWriter, 2, 2);
        renderer.render(&grid);
        assert!(renderer.draw().is_err());
    }
}
