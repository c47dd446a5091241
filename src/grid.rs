use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Block dimensions of a Sudoku-family grid.
///
/// A grid with dimensions `p` x `q` has side length `N = p * q` and is
/// tiled by `N` rectangular blocks, each `p` rows tall and `q` columns
/// wide. Classic Sudoku is `BlockDims::new(3, 3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockDims {
    p: usize,
    q: usize,
}

impl BlockDims {
    pub fn new(p: usize, q: usize) -> Result<Self> {
        if p == 0 || q == 0 {
            return Err(Error::BadBlockDims { p, q });
        }
        Ok(Self { p, q })
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// Side length of the grid, `p * q`.
    pub fn size(&self) -> usize {
        self.p * self.q
    }

    /// Index of the block containing `(row, col)`, in row-major block order.
    pub fn block_of(&self, row: usize, col: usize) -> usize {
        (row / self.p) * self.p + col / self.q
    }
}

/// A partially or fully filled grid: the solver's input and output type.
///
/// Cells are stored row-major; `None` marks an empty cell and `Some(v)`
/// a value in `1..=N`. The solver core never touches this type during
/// search: it is converted to a constraint network at the boundary and
/// read back out once the search completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    dims: BlockDims,
    cells: Vec<Option<usize>>,
}

impl Grid {
    /// An all-empty grid of the given dimensions.
    pub fn empty(dims: BlockDims) -> Self {
        let n = dims.size();
        Self {
            dims,
            cells: vec![None; n * n],
        }
    }

    /// Builds a grid from a matrix of values where `0` means "empty",
    /// the conventional textual form of a puzzle.
    ///
    /// Rejects matrices that are not exactly `N` x `N` and values outside
    /// `1..=N`. Clue conflicts are checked separately by [`Grid::validate`].
    pub fn from_rows(dims: BlockDims, rows: &[Vec<usize>]) -> Result<Self> {
        let n = dims.size();
        if rows.len() != n {
            return Err(Error::GridShape {
                expected: n,
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
                row: 0,
            });
        }
        let mut grid = Self::empty(dims);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::GridShape {
                    expected: n,
                    rows: rows.len(),
                    cols: row.len(),
                    row: r,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if value != 0 {
                    grid.set(r, c, Some(value))?;
                }
            }
        }
        Ok(grid)
    }

    pub fn dims(&self) -> BlockDims {
        self.dims
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.dims.size()
    }

    /// The value at `(row, col)`, or `None` if the cell is empty.
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.cells[row * self.size() + col]
    }

    /// Writes a cell, range-checking the value against `1..=N`.
    pub fn set(&mut self, row: usize, col: usize, value: Option<usize>) -> Result<()> {
        let n = self.size();
        if let Some(v) = value {
            if v < 1 || v > n {
                return Err(Error::ValueOutOfRange {
                    row,
                    col,
                    value: v,
                    max: n,
                });
            }
        }
        self.cells[row * n + col] = value;
        Ok(())
    }

    /// True when no cell is empty.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn clue_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Checks that no two filled cells sharing a row, column, or block
    /// hold the same value.
    ///
    /// This is the structural gate run before a search is built: a grid
    /// failing it never reaches the solver core.
    pub fn validate(&self) -> Result<()> {
        let n = self.size();
        for i in 0..n {
            self.check_distinct("row", i, (0..n).map(move |c| (i, c)))?;
            self.check_distinct("column", i, (0..n).map(move |r| (r, i)))?;
            self.check_distinct("block", i, self.block_cells(i))?;
        }
        Ok(())
    }

    /// Coordinates of the cells in the given block, row-major within the
    /// block.
    pub fn block_cells(&self, block: usize) -> impl Iterator<Item = (usize, usize)> {
        let p = self.dims.p;
        let q = self.dims.q;
        let row0 = (block / p) * p;
        let col0 = (block % p) * q;
        (0..p).flat_map(move |dr| (0..q).map(move |dc| (row0 + dr, col0 + dc)))
    }

    fn check_distinct(
        &self,
        kind: &str,
        index: usize,
        cells: impl Iterator<Item = (usize, usize)>,
    ) -> Result<()> {
        // seen[value] = cell that introduced it within this scope
        let mut seen: Vec<Option<(usize, usize)>> = vec![None; self.size() + 1];
        for (row, col) in cells {
            if let Some(value) = self.get(row, col) {
                if let Some((row_a, col_a)) = seen[value] {
                    return Err(Error::ConflictingClues {
                        row_a,
                        col_a,
                        row_b: row,
                        col_b: col,
                        value,
                        scope: format!("{kind} {index}"),
                    });
                }
                seen[value] = Some((row, col));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size();
        let width = n.to_string().len();
        let rule_len = n * width + (n - 1) + 2 * (n / self.dims.q - 1);
        for row in 0..n {
            if row > 0 && row % self.dims.p == 0 {
                writeln!(f, "{}", "-".repeat(rule_len))?;
            }
            let mut line = String::new();
            for col in 0..n {
                if col > 0 {
                    line.push(' ');
                    if col % self.dims.q == 0 {
                        line.push_str("| ");
                    }
                }
                match self.get(row, col) {
                    Some(v) => line.push_str(&format!("{v:>width$}")),
                    None => line.push_str(&format!("{:>width$}", ".")),
                }
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn four_by_four(rows: &[Vec<usize>]) -> Result<Grid> {
        Grid::from_rows(BlockDims::new(2, 2)?, rows)
    }

    #[test]
    fn zero_block_dimension_is_rejected() {
        assert!(matches!(
            BlockDims::new(0, 3),
            Err(Error::BadBlockDims { p: 0, q: 3 })
        ));
    }

    #[test]
    fn from_rows_maps_zeroes_to_empty_cells() {
        let grid = four_by_four(&[
            vec![1, 0, 0, 0],
            vec![0, 0, 3, 0],
            vec![0, 2, 0, 0],
            vec![0, 0, 0, 4],
        ])
        .unwrap();

        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(1, 2), Some(3));
        assert_eq!(grid.clue_count(), 4);
        assert!(!grid.is_complete());
    }

    #[test]
    fn wrong_row_count_is_a_shape_error() {
        let result = four_by_four(&[vec![0, 0, 0, 0], vec![0, 0, 0, 0]]);
        assert!(matches!(result, Err(Error::GridShape { rows: 2, .. })));
    }

    #[test]
    fn ragged_row_is_a_shape_error() {
        let result = four_by_four(&[
            vec![0, 0, 0, 0],
            vec![0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        assert!(matches!(
            result,
            Err(Error::GridShape { cols: 3, row: 1, .. })
        ));
    }

    #[test]
    fn value_above_grid_size_is_rejected() {
        let result = four_by_four(&[
            vec![5, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        assert!(matches!(
            result,
            Err(Error::ValueOutOfRange {
                row: 0,
                col: 0,
                value: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn validate_accepts_a_legal_partial_grid() {
        let grid = four_by_four(&[
            vec![1, 0, 0, 0],
            vec![0, 4, 0, 0],
            vec![0, 0, 0, 3],
            vec![0, 0, 2, 0],
        ])
        .unwrap();
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn duplicate_clues_in_a_row_are_rejected() {
        // Two 5s sharing row 0 of a classic 9x9 grid.
        let mut rows = vec![vec![0; 9]; 9];
        rows[0][1] = 5;
        rows[0][7] = 5;
        let grid = Grid::from_rows(BlockDims::new(3, 3).unwrap(), &rows).unwrap();

        let err = grid.validate().unwrap_err();
        assert!(matches!(
            &err,
            Error::ConflictingClues {
                row_a: 0,
                col_a: 1,
                row_b: 0,
                col_b: 7,
                value: 5,
                ..
            }
        ));
        assert_eq!(err.to_string(), "cells (0, 1) and (0, 7) both hold clue 5 in row 0");
    }

    #[test]
    fn duplicate_clues_in_a_column_are_rejected() {
        let grid = four_by_four(&[
            vec![0, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 2, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        assert!(matches!(
            grid.validate(),
            Err(Error::ConflictingClues { value: 2, .. })
        ));
    }

    #[test]
    fn duplicate_clues_in_a_block_are_rejected() {
        // (0, 0) and (1, 1) share the top-left block but no row or column.
        let grid = four_by_four(&[
            vec![3, 0, 0, 0],
            vec![0, 3, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();

        let err = grid.validate().unwrap_err();
        assert!(matches!(&err, Error::ConflictingClues { value: 3, .. }));
        assert!(err.to_string().contains("block 0"));
    }

    #[test]
    fn block_indices_cover_non_square_blocks() {
        // 6x6 grid, blocks 2 rows tall and 3 columns wide.
        let dims = BlockDims::new(2, 3).unwrap();
        assert_eq!(dims.size(), 6);
        assert_eq!(dims.block_of(0, 0), 0);
        assert_eq!(dims.block_of(0, 3), 1);
        assert_eq!(dims.block_of(2, 3), 3);
        assert_eq!(dims.block_of(5, 5), 5);

        let grid = Grid::empty(dims);
        let block3: Vec<_> = grid.block_cells(3).collect();
        assert_eq!(block3, vec![(2, 3), (2, 4), (2, 5), (3, 3), (3, 4), (3, 5)]);
    }

    #[test]
    fn display_draws_block_rules() {
        let grid = four_by_four(&[
            vec![1, 2, 0, 0],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 2],
        ])
        .unwrap();

        let rendered = grid.to_string();
        let expected = "\
1 2 | . .
. . | 1 .
---------
. 1 | . .
. . | . 2
";
        assert_eq!(rendered, expected);
    }
}
