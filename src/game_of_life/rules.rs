//! Game of Life rules with configurable survival thresholds

use super::grid::{Grid, ALIVE, DEAD};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Neighbour count at which a dead cell is born. Independent of the thresholds.
pub const BIRTH_NEIGHBORS: u8 = 3;

/// Maximum neighbour count in the Moore neighbourhood
pub const MAX_NEIGHBORS: u8 = 8;

/// Game of Life rules engine
///
/// A living cell survives while its neighbour count lies in
/// `[starvation_threshold, overpopulation_threshold]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub overpopulation_threshold: u8,
    pub starvation_threshold: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            overpopulation_threshold: 3,
            starvation_threshold: 2,
        }
    }
}

impl Rules {
    pub fn new(overpopulation_threshold: u8, starvation_threshold: u8) -> Self {
        Self {
            overpopulation_threshold,
            starvation_threshold,
        }
    }

    /// Width of the survival window above the starvation threshold
    pub fn keep_alive_mark(&self) -> u8 {
        self.overpopulation_threshold
            .saturating_sub(self.starvation_threshold)
    }

    /// New value for a cell, or `None` when it stays as it is
    pub fn next_state(&self, current: u32, neighbors: u8) -> Option<u32> {
        let alive = current != DEAD;
        if alive && neighbors < self.starvation_threshold {
            Some(DEAD)
        } else if alive && neighbors > self.overpopulation_threshold {
            Some(DEAD)
        } else if !alive && neighbors == BIRTH_NEIGHBORS {
            Some(ALIVE)
        } else {
            None
        }
    }

    /// Evolve the grid one generation forward
    ///
    /// Rows of the result are computed in parallel; each reads only `current`
    /// and writes only its own row of the cloned buffer.
    pub fn evolve(&self, current: &Grid) -> Grid {
        let mut next = current.clone();
        let width = current.width();

        next.cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let neighbors = current.count_neighbors(x, y);
                    if let Some(value) = self.next_state(*cell, neighbors) {
                        *cell = value;
                    }
                }
            });

        next
    }

    /// Evolve the grid for multiple generations
    pub fn evolve_generations(&self, mut grid: Grid, generations: usize) -> Grid {
        for _ in 0..generations {
            grid = self.evolve(&grid);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker_8x8() -> Grid {
        let mut grid = Grid::new(8, 8).unwrap();
        grid.set(2, 3, 1);
        grid.set(3, 3, 1);
        grid.set(4, 3, 1);
        grid
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let grid = Grid::new(6, 5).unwrap();
        let evolved = Rules::default().evolve(&grid);
        assert!(evolved.is_empty());
        assert_eq!(evolved, grid);
    }

    #[test]
    fn test_still_life_block() {
        let mut grid = Grid::new(6, 6).unwrap();
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            grid.set(x, y, 1);
        }

        let rules = Rules::default();
        let mut evolved = grid.clone();
        for _ in 0..25 {
            evolved = rules.evolve(&evolved);
            assert_eq!(evolved, grid);
        }
    }

    #[test]
    fn test_oscillator_blinker() {
        let rules = Rules::default();
        let horizontal = blinker_8x8();

        let vertical = rules.evolve(&horizontal);
        assert_eq!(vertical.living_cells(), vec![(3, 2), (3, 3), (3, 4)]);

        let back = rules.evolve(&vertical);
        assert_eq!(back, horizontal);
        assert_eq!(rules.evolve_generations(horizontal.clone(), 10), horizontal);
    }

    #[test]
    fn test_last_row_and_column_participate() {
        let rules = Rules::default();

        // Vertical blinker in the last column becomes horizontal across the wrap
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(5, 1, 1);
        grid.set(5, 2, 1);
        grid.set(5, 3, 1);
        let evolved = rules.evolve(&grid);
        assert_eq!(evolved.living_cells(), vec![(0, 2), (4, 2), (5, 2)]);

        // Horizontal blinker in the last row becomes vertical across the wrap
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(1, 5, 1);
        grid.set(2, 5, 1);
        grid.set(3, 5, 1);
        let evolved = rules.evolve(&grid);
        assert_eq!(evolved.living_cells(), vec![(2, 0), (2, 4), (2, 5)]);

        // A lone cell in the bottom-right corner dies
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(5, 5, 1);
        assert!(rules.evolve(&grid).is_empty());
    }

    #[test]
    fn test_evolve_reads_only_previous_generation() {
        // Glider: the in-place bug would corrupt its shape on the first step
        let rules = Rules::default();
        let mut grid = Grid::new(10, 10).unwrap();
        for (x, y) in [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
            grid.set(x, y, 1);
        }

        let after_four = rules.evolve_generations(grid.clone(), 4);
        let mut shifted = Grid::new(10, 10).unwrap();
        for (x, y) in [(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)] {
            shifted.set(x, y, 1);
        }
        assert_eq!(after_four, shifted);
    }

    #[test]
    fn test_rule_logic() {
        let rules = Rules::default();
        assert_eq!(rules.next_state(1, 2), None);
        assert_eq!(rules.next_state(1, 3), None);
        assert_eq!(rules.next_state(1, 1), Some(DEAD));
        assert_eq!(rules.next_state(1, 4), Some(DEAD));
        assert_eq!(rules.next_state(0, 2), None);

        assert_eq!(rules.next_state(7, 2), None);
        assert_eq!(rules.next_state(7, 5), Some(DEAD));
        assert_eq!(rules.next_state(0, 3), Some(ALIVE));
    }

    #[test]
    fn test_birth_ignores_thresholds() {
        let rules = Rules::new(6, 4);
        assert_eq!(rules.next_state(0, 3), Some(ALIVE));
        assert_eq!(rules.next_state(0, 5), None);
        assert_eq!(rules.next_state(1, 3), Some(DEAD));
        assert_eq!(rules.next_state(1, 6), None);
    }

    #[test]
    fn test_keep_alive_mark() {
        assert_eq!(Rules::default().keep_alive_mark(), 1);
        assert_eq!(Rules::new(5, 1).keep_alive_mark(), 4);
        assert_eq!(Rules::new(1, 4).keep_alive_mark(), 0);
    }
}
