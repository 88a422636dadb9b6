use bevy::math::{ivec2, IVec2};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid dimensions {cols}x{rows}: both must be positive")]
    InvalidDimension { cols: u32, rows: u32 },

    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds { x: i32, y: i32, cols: u32, rows: u32 },
}

/// Alive/dead state for every cell of a fixed `cols` x `rows` domain.
///
/// Cells are stored densely in row-major order, so every coordinate of the
/// domain always has an explicit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid with every cell dead.
    pub fn new(cols: u32, rows: u32) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::InvalidDimension { cols, rows });
        }
        Ok(Self {
            cols,
            rows,
            cells: vec![false; cols as usize * rows as usize],
        })
    }

    /// Creates a grid where each cell is alive with probability 0.5, drawn from `rng`.
    pub fn randomize(cols: u32, rows: u32, rng: &mut fastrand::Rng) -> Result<Self, GridError> {
        let mut grid = Self::new(cols, rows)?;
        grid.cells.iter_mut().for_each(|cell| *cell = rng.bool());
        Ok(grid)
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.cols && (y as u32) < self.rows
    }

    pub fn get(&self, x: i32, y: i32) -> Result<bool, GridError> {
        let idx = self.cell_coord_to_idx(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, alive: bool) -> Result<(), GridError> {
        let idx = self.cell_coord_to_idx(x, y)?;
        self.cells[idx] = alive;
        Ok(())
    }

    /// Flips a single cell, returning its new state.
    pub fn toggle(&mut self, x: i32, y: i32) -> Result<bool, GridError> {
        let idx = self.cell_coord_to_idx(x, y)?;
        self.cells[idx] = !self.cells[idx];
        Ok(self.cells[idx])
    }

    /// Every cell with its state, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, alive)| (self.idx_to_cell_coord(i), *alive))
    }

    /// Builds a grid of the same dimensions whose cells are `f(coord, alive)`
    /// applied to this grid's cells.
    pub fn map_cells(&self, mut f: impl FnMut(IVec2, bool) -> bool) -> Grid {
        let cells = self.iter().map(|(coord, alive)| f(coord, alive)).collect();
        Grid {
            cols: self.cols,
            rows: self.rows,
            cells,
        }
    }

    /// number of alive cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    #[inline]
    fn cell_coord_to_idx(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(y as usize * self.cols as usize + x as usize)
    }

    #[inline]
    fn idx_to_cell_coord(&self, idx: usize) -> IVec2 {
        ivec2((idx % self.cols as usize) as i32, (idx / self.cols as usize) as i32)
    }
}
