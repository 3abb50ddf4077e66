//! Dense check × variable storage for per-edge messages.

use std::ops::{Index, IndexMut};

use serde::Serialize;

/// Row-major `n_checks × n_variables` grid, one cell per possible edge.
///
/// Cells without a matching 1-entry in **H** keep their fill value and carry
/// no meaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeGrid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> EdgeGrid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> EdgeGrid<T> {
    /// Number of rows (checks).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (variables).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(check, variable)`, or `None` when outside the grid.
    #[inline]
    pub fn get(&self, check: usize, variable: usize) -> Option<&T> {
        if check < self.rows && variable < self.cols {
            self.cells.get(check * self.cols + variable)
        } else {
            None
        }
    }

    /// All cells of one check row.
    ///
    /// # Panics
    ///
    /// Panics if `check >= rows()`.
    #[inline]
    pub fn row(&self, check: usize) -> &[T] {
        &self.cells[check * self.cols..(check + 1) * self.cols]
    }

    #[inline]
    fn offset(&self, (check, variable): (usize, usize)) -> usize {
        assert!(
            check < self.rows && variable < self.cols,
            "cell ({check}, {variable}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        check * self.cols + variable
    }
}

impl<T> Index<(usize, usize)> for EdgeGrid<T> {
    type Output = T;

    fn index(&self, idx: (usize, usize)) -> &T {
        &self.cells[self.offset(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for EdgeGrid<T> {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        let offset = self.offset(idx);
        &mut self.cells[offset]
    }
}
