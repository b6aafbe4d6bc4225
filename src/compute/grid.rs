//! Double-buffered toroidal cell grid.
//!
//! Cells live in two equally sized buffers of `AtomicBool`. A selector picks
//! which buffer is "current" (read during a generation) and which is "next"
//! (written during a generation); [`Grid::advance_generation`] flips the
//! selector without touching cell data.
//!
//! All cell accesses use `Relaxed` ordering. Cross-thread visibility between
//! the compute phase and the swap comes from the barrier protocol driving
//! the grid, not from the grid itself.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Row/column offsets of the eight Moore neighbors.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Linear indices of a cell's eight neighbors.
pub type Neighbors = [usize; 8];

/// B3/S23 transition for a cell with `neighbors` live neighbors.
#[inline]
pub fn next_state(alive: bool, neighbors: u32) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Wrap `x` into `0..bound` on a torus.
///
/// Negative values wrap to `bound + x`, values past the edge wrap by modulo.
#[inline]
fn wrap(x: isize, bound: usize) -> usize {
    let bound = bound as isize;
    let wrapped = if x < 0 {
        x + bound
    } else if x >= bound {
        x % bound
    } else {
        x
    };
    debug_assert!((0..bound).contains(&wrapped));
    wrapped as usize
}

fn alloc_cells(len: usize) -> Box<[AtomicBool]> {
    (0..len).map(|_| AtomicBool::new(false)).collect()
}

/// Toroidal Game of Life grid with current/next buffers.
pub struct Grid {
    rows: usize,
    cols: usize,
    buffers: [Box<[AtomicBool]>; 2],
    /// Index into `buffers` of the current generation.
    current: AtomicUsize,
    neighbors: Box<[Neighbors]>,
}

impl Grid {
    /// Create an all-dead grid and precompute its neighbor table.
    ///
    /// With a dimension of exactly 2 the offsets -1 and +1 on that axis wrap
    /// to the same cell, so that neighbor appears twice in the table and is
    /// counted twice.
    ///
    /// # Panics
    /// Panics if `rows < 2` or `cols < 2`.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            rows >= 2 && cols >= 2,
            "grid dimensions must be at least 2x2, got {rows}x{cols}"
        );
        let size = rows
            .checked_mul(cols)
            .filter(|&s| s <= isize::MAX as usize)
            .unwrap_or_else(|| panic!("grid of {rows}x{cols} cells is too large"));

        let mut neighbors = Vec::with_capacity(size);
        for row in 0..rows as isize {
            for col in 0..cols as isize {
                let mut entry = [0usize; 8];
                for (slot, &(dr, dc)) in entry.iter_mut().zip(NEIGHBOR_OFFSETS.iter()) {
                    let r = wrap(row + dr, rows);
                    let c = wrap(col + dc, cols);
                    *slot = r * cols + c;
                }
                neighbors.push(entry);
            }
        }

        Self {
            rows,
            cols,
            buffers: [alloc_cells(size), alloc_cells(size)],
            current: AtomicUsize::new(0),
            neighbors: neighbors.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Linear index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Precomputed neighbor indices for cell `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &Neighbors {
        &self.neighbors[i]
    }

    #[inline]
    fn current_cells(&self) -> &[AtomicBool] {
        &self.buffers[self.current.load(Ordering::Relaxed)]
    }

    #[inline]
    fn next_cells(&self) -> &[AtomicBool] {
        &self.buffers[self.current.load(Ordering::Relaxed) ^ 1]
    }

    /// State of cell `i` in the current generation.
    ///
    /// # Panics
    /// Panics if `i >= self.size()`.
    #[inline]
    pub fn read_state(&self, i: usize) -> bool {
        self.current_cells()[i].load(Ordering::Relaxed)
    }

    /// Compute cell `i` for the next generation, store it, and return it.
    ///
    /// Reads only the current buffer and writes only slot `i` of the next
    /// buffer, so disjoint indices may be computed from different threads at
    /// the same time.
    ///
    /// # Panics
    /// Panics if `i >= self.size()`.
    #[inline]
    pub fn compute_next(&self, i: usize) -> bool {
        let current = self.current_cells();
        let live = self.neighbors[i]
            .iter()
            .filter(|&&n| current[n].load(Ordering::Relaxed))
            .count() as u32;
        let next = next_state(current[i].load(Ordering::Relaxed), live);
        self.next_cells()[i].store(next, Ordering::Relaxed);
        next
    }

    /// Make the next buffer current. O(1); no cells are copied.
    ///
    /// Only valid once every `compute_next` call for this generation has
    /// completed.
    #[inline]
    pub fn advance_generation(&self) {
        self.current.fetch_xor(1, Ordering::Relaxed);
    }

    /// Set cell `(row, col)` in the current generation.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let i = self.index(row, col);
        self.current_cells()[i].store(alive, Ordering::Relaxed);
    }

    /// Kill every cell in the current generation.
    pub fn clear(&mut self) {
        for cell in self.current_cells() {
            cell.store(false, Ordering::Relaxed);
        }
    }

    /// Fill the current buffer with fresh entropy-seeded random bits.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut StdRng::from_entropy());
    }

    /// Fill the current buffer reproducibly from `seed`.
    pub fn randomize_seeded(&mut self, seed: u64) {
        self.randomize_with(&mut StdRng::seed_from_u64(seed));
    }

    /// Fill the current buffer with one unbiased bit per cell drawn from `rng`.
    pub fn randomize_with<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.current_cells() {
            cell.store(rng.next_u32() & 1 == 1, Ordering::Relaxed);
        }
    }

    /// Number of live cells in the current generation.
    pub fn population(&self) -> usize {
        self.current_cells()
            .iter()
            .filter(|c| c.load(Ordering::Relaxed))
            .count()
    }

    /// `(row, col)` of every live cell in the current generation, row-major.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.current_cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.load(Ordering::Relaxed))
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }

    /// Copy of the current generation.
    pub fn snapshot(&self) -> Vec<bool> {
        self.current_cells()
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("population", &self.population())
            .finish()
    }
}
