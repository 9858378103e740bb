//! Lazily computed metrics of a single board.
//!
//! [`BoardAnalysis`] owns a board and computes each metric on first access,
//! caching the result. Evaluators that only need a few metrics never pay for
//! the rest, and metrics that build on each other (holes and bumpiness both
//! need column heights) share the same cached intermediate values.

use std::{cell::OnceCell, iter};

use blockfall_engine::Board;

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[u8; Board::WIDTH]>,
    column_occupied_cells: OnceCell<[u8; Board::WIDTH]>,
    max_height: OnceCell<u8>,
    aggregate_height: OnceCell<u32>,
    complete_lines: OnceCell<u32>,
    num_holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
    total_tiles: OnceCell<u32>,
    near_complete_lines: OnceCell<u32>,
    empty_columns: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            max_height: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            complete_lines: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
            total_tiles: OnceCell::new(),
            near_complete_lines: OnceCell::new(),
            empty_columns: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Height of each column: `HEIGHT - y` of its topmost occupied cell, or 0.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; Board::WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; Board::WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let top = self
                    .board
                    .rows()
                    .position(|row| !row.cells()[x].is_empty());
                let Some(top) = top else {
                    continue;
                };
                *h = u8::try_from(Board::HEIGHT - top).unwrap();
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; Board::WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; Board::WIDTH];
            for row in self.board.rows() {
                for (cell, count) in iter::zip(row.cells(), &mut column_occupied_cells) {
                    if !cell.is_empty() {
                        *count += 1;
                    }
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().copied().map(u32::from).sum())
    }

    /// Rows with every cell occupied.
    #[must_use]
    pub fn complete_lines(&self) -> u32 {
        *self.complete_lines.get_or_init(|| {
            let count = self.board.rows().filter(|row| row.is_filled()).count();
            u32::try_from(count).unwrap()
        })
    }

    /// Empty cells lying below the topmost occupied cell of their column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| u32::from(w[0].abs_diff(w[1])))
                .sum()
        })
    }

    #[must_use]
    pub fn total_tiles(&self) -> u32 {
        *self.total_tiles.get_or_init(|| {
            self.column_occupied_cells()
                .iter()
                .copied()
                .map(u32::from)
                .sum()
        })
    }

    /// Rows missing at most one cell, complete rows included.
    #[must_use]
    pub fn near_complete_lines(&self) -> u32 {
        *self.near_complete_lines.get_or_init(|| {
            let count = self
                .board
                .rows()
                .filter(|row| row.filled_cells() + 1 >= Board::WIDTH)
                .count();
            u32::try_from(count).unwrap()
        })
    }

    #[must_use]
    pub fn empty_columns(&self) -> u32 {
        *self.empty_columns.get_or_init(|| {
            let count = self.column_heights().iter().filter(|&&h| h == 0).count();
            u32::try_from(count).unwrap()
        })
    }
}
