use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::types::Area;

/// Value of a cell that has been cleared.
pub const CLEARED: u8 = 0;

/// Rectangular matrix of digits. Cells hold 1..=9 until cleared to 0.
///
/// Serialized as a plain array of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Vec<u8>>,
}

impl Grid {
    /// Fill a `rows x cols` grid with uniformly random digits in 1..=9.
    pub fn generate(rows: usize, cols: usize) -> Self {
        Self::generate_with(rows, cols, &mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let cells = (0..rows)
            .map(|_| (0..cols).map(|_| rng.random_range(1..=9)).collect::<Vec<u8>>())
            .collect();
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of the cells inside `area`. The area must lie inside the grid.
    pub fn range_sum(&self, area: &Area) -> u32 {
        self.cells[area.r1..=area.r2]
            .iter()
            .flat_map(|row| &row[area.c1..=area.c2])
            .map(|&v| v as u32)
            .sum()
    }

    /// Zero every non-cleared cell inside `area` and return how many changed.
    pub fn clear_range(&mut self, area: &Area) -> u32 {
        let mut cleared = 0;
        for row in &mut self.cells[area.r1..=area.r2] {
            for cell in &mut row[area.c1..=area.c2] {
                if *cell != CLEARED {
                    *cell = CLEARED;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Count every axis-aligned rectangle whose cells sum to `target`.
    ///
    /// Uses a 2D prefix-sum table, so each of the O(R²C²) rectangles costs O(1).
    pub fn count_rectangles_summing_to(&self, target: u32) -> usize {
        let (rows, cols) = (self.rows(), self.cols());
        let mut prefix = vec![vec![0u32; cols + 1]; rows + 1];
        for r in 0..rows {
            for c in 0..cols {
                prefix[r + 1][c + 1] =
                    self.cells[r][c] as u32 + prefix[r][c + 1] + prefix[r + 1][c] - prefix[r][c];
            }
        }

        let mut count = 0;
        for r1 in 0..rows {
            for r2 in r1..rows {
                for c1 in 0..cols {
                    for c2 in c1..cols {
                        let sum = prefix[r2 + 1][c2 + 1] + prefix[r1][c1]
                            - prefix[r1][c2 + 1]
                            - prefix[r2 + 1][c1];
                        if sum == target {
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }
}

#[cfg(test)]
impl Grid {
    /// Build a grid from explicit rows. All rows must have the same length.
    pub fn from_rows(cells: Vec<Vec<u8>>) -> Self {
        assert!(cells.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn cells(&self) -> &[Vec<u8>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn area(r1: usize, c1: usize, r2: usize, c2: usize) -> Area {
        Area { r1, c1, r2, c2 }
    }

    #[test]
    fn generated_cells_are_digits_one_to_nine() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = Grid::generate_with(10, 20, &mut rng);
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.cols(), 20);
        assert!(grid.cells().iter().flatten().all(|&v| (1..=9).contains(&v)));
    }

    #[test]
    fn range_sum_covers_inclusive_rectangle() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(grid.range_sum(&area(0, 0, 1, 2)), 21);
        assert_eq!(grid.range_sum(&area(1, 1, 1, 2)), 11);
        assert_eq!(grid.range_sum(&area(0, 2, 0, 2)), 3);
    }

    #[test]
    fn clear_range_is_idempotent() {
        let mut grid = Grid::from_rows(vec![vec![4, 6, 1], vec![0, 3, 2]]);
        let rect = area(0, 0, 1, 1);

        assert_eq!(grid.clear_range(&rect), 3);
        let after_first = grid.clone();
        assert_eq!(grid.clear_range(&rect), 0);
        assert_eq!(grid, after_first);
        assert_eq!(grid.cells(), &[vec![0, 0, 1], vec![0, 0, 2]]);
    }

    #[test]
    fn counts_rectangles_with_target_sum() {
        // [4,6] horizontally, [4,6] vertically in column 0, and the 2x2 block sums to 20.
        let grid = Grid::from_rows(vec![vec![4, 6], vec![6, 4]]);
        assert_eq!(grid.count_rectangles_summing_to(10), 4);

        let cleared = Grid::from_rows(vec![vec![0, 0], vec![0, 0]]);
        assert_eq!(cleared.count_rectangles_summing_to(10), 0);
    }

    #[test]
    fn prefix_count_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::generate_with(5, 6, &mut rng);
        let mut brute = 0;
        for r1 in 0..5 {
            for r2 in r1..5 {
                for c1 in 0..6 {
                    for c2 in c1..6 {
                        if grid.range_sum(&area(r1, c1, r2, c2)) == 10 {
                            brute += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(grid.count_rectangles_summing_to(10), brute);
    }
}
