//! Toroidal grid representation for Game of Life

use crate::error::GridError;
use itertools::iproduct;
use std::fmt;

/// Value stored for a dead cell.
pub const DEAD: u32 = 0;
/// Value stored for a cell born by the rules.
pub const ALIVE: u32 = 1;

/// Represents a Game of Life grid whose edges wrap around onto each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Create a new grid with every cell dead
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidDimension {
            width: i64::try_from(width).unwrap_or(i64::MAX),
            height: i64::try_from(height).unwrap_or(i64::MAX),
        };

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        // cell count must fit in memory indexing and coordinates must fit in i64
        let len = width
            .checked_mul(height)
            .filter(|_| i64::try_from(width).is_ok() && i64::try_from(height).is_ok())
            .ok_or_else(invalid)?;

        Ok(Self {
            width,
            height,
            cells: vec![DEAD; len],
        })
    }

    /// Create a grid from rows of cell values (`rows[y][x]`)
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::malformed("grid has no rows"));
        }

        let height = rows.len();
        let width = rows[0].len();

        if width == 0 {
            return Err(GridError::malformed("grid rows cannot be empty"));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::malformed(format!(
                    "row {} has length {}, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major cell storage
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Map any coordinate pair onto the torus
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> (usize, usize) {
        (
            x.rem_euclid(self.width as i64) as usize,
            y.rem_euclid(self.height as i64) as usize,
        )
    }

    /// Get cell value at coordinates, wrapping out-of-range input
    pub fn get(&self, x: i64, y: i64) -> u32 {
        let (x, y) = self.wrap(x, y);
        self.cells[self.index(x, y)]
    }

    /// Set cell value at coordinates, wrapping out-of-range input
    pub fn set(&mut self, x: i64, y: i64, value: u32) {
        let (x, y) = self.wrap(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    /// Check whether the cell at the given coordinates counts as alive
    #[inline]
    pub fn is_alive(&self, x: i64, y: i64) -> bool {
        self.get(x, y) != DEAD
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: u32) {
        self.cells.fill(value);
    }

    pub fn clear(&mut self) {
        self.fill(DEAD);
    }

    /// Count living cells in the Moore neighbourhood, wrapping at the edges
    pub fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        let (x, y) = (x as i64, y as i64);
        iproduct!(-1i64..=1, -1i64..=1)
            .filter(|&(dx, dy)| (dx, dy) != (0, 0))
            .filter(|&(dx, dy)| self.is_alive(x + dx, y + dy))
            .count() as u8
    }

    /// Paint every cell of `pattern` into this grid with its top-left corner at `(x, y)`
    pub fn stamp(&mut self, pattern: &Grid, x: i64, y: i64) {
        let (x, y) = self.wrap(x, y);
        for (px, py) in iproduct!(0..pattern.width, 0..pattern.height) {
            let value = pattern.cells[pattern.index(px, py)];
            let (cx, cy) = ((x + px) % self.width, (y + py) % self.height);
            let idx = self.index(cx, cy);
            self.cells[idx] = value;
        }
    }

    /// Copy of the full matrix as rows (`rows[y][x]`)
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.width).map(<[u32]>::to_vec).collect()
    }

    /// Get all living cell coordinates as `(x, y)`
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        iproduct!(0..self.height, 0..self.width)
            .filter(|&(y, x)| self.cells[self.index(x, y)] != DEAD)
            .map(|(y, x)| (x, y))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != DEAD).count()
    }

    /// Check if the grid has no living cells
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == DEAD)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for &cell in row {
                let symbol = if cell != DEAD { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
