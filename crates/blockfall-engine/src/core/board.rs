use std::fmt;

use super::piece::{Piece, PieceKind};

/// A single cell of the board.
///
/// Cells either hold nothing or a block locked by a piece of some kind. The
/// numeric [`value`](Self::value) of a cell is `0` for empty and `1..=7` for
/// locked blocks, which renderers use to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked block of a specific piece kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Block::Empty)
    }

    /// Returns the cell value: `0` when empty, otherwise the piece kind index plus one.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Block, PieceKind};
    ///
    /// assert_eq!(Block::Empty.value(), 0);
    /// assert_eq!(Block::Piece(PieceKind::I).value(), 1);
    /// assert_eq!(Block::Piece(PieceKind::L).value(), 7);
    /// ```
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind as u8 + 1,
        }
    }

    /// Inverse of [`Self::value`]. Returns `None` for values above 7.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Block::Empty),
            1..=7 => Some(Block::Piece(PieceKind::ALL[value as usize - 1])),
            _ => None,
        }
    }
}

/// A single row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRow {
    cells: [Block; Board::WIDTH],
}

impl BlockRow {
    pub const EMPTY: Self = Self {
        cells: [Block::Empty; Board::WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Block; Board::WIDTH] {
        &self.cells
    }

    /// Returns `true` when every cell of the row is occupied.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }

    /// Number of occupied cells in the row.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|b| !b.is_empty()).count()
    }
}

/// Fixed-size grid of locked blocks.
///
/// Rows are ordered top to bottom: row `0` is the top of the well and row
/// [`Board::HEIGHT`]` - 1` the floor. There is no hidden area above the board;
/// piece cells with a negative row are simply off-screen and never stored.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, Board, PieceKind};
///
/// let mut board = Board::EMPTY;
/// for x in 0..Board::WIDTH {
///     board.set(x, Board::HEIGHT - 1, Block::Piece(PieceKind::I));
/// }
/// assert!(board.is_row_full(Board::HEIGHT - 1));
/// assert_eq!(board.clear_full_rows(), 1);
/// assert!(board.rows().all(|row| row.filled_cells() == 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [BlockRow; Board::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    pub const EMPTY: Self = Self {
        rows: [BlockRow::EMPTY; Board::HEIGHT],
    };

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        self.rows[y].cells[x]
    }

    /// Overwrites the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the board.
    pub fn set(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y].cells[x] = block;
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &BlockRow {
        &self.rows[y]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &BlockRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].is_filled()
    }

    /// Returns whether the piece overlaps a wall, the floor, or a locked block.
    ///
    /// Cells above the board (negative row) only collide with the side walls.
    /// Defined for every integer coordinate; never panics.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return true;
            };
            if x >= Self::WIDTH {
                return true;
            }
            let Ok(y) = usize::try_from(y) else {
                return false;
            };
            y >= Self::HEIGHT || !self.rows[y].cells[x].is_empty()
        })
    }

    /// Writes the piece's cells into the board as locked blocks.
    ///
    /// Cells above the top row are dropped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.cells.get_mut(x)) {
                *cell = block;
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// All full rows are detected before any row moves. Surviving rows shift
    /// down keeping their relative order, and the same number of empty rows is
    /// inserted at the top, so the board always keeps [`Self::HEIGHT`] rows.
    pub fn clear_full_rows(&mut self) -> usize {
        let full_rows = self.rows.map(|row| row.is_filled());
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if full_rows[y] {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BlockRow::EMPTY);
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in &row.cells {
                let c = match cell {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
