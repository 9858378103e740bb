use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::board::Board;

/// Side length of the square occupancy mask every rotation state lives in.
pub const PIECE_SIZE: usize = 5;

/// A falling piece (tetromino) with anchor position, rotation, and kind.
///
/// Pieces are immutable values. Movement and rotation return new `Piece`
/// instances, and whether the result fits is decided by the [`Board`].
///
/// # Coordinate System
///
/// - The anchor is the board coordinate of the mask's top-left corner
/// - X increases rightward (columns), Y increases downward (rows)
/// - The anchor may be negative: a 5×5 mask has empty margins, so a piece can
///   sit flush against the left wall or partially above the board
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.translated(1, 0);
/// assert!(!board.is_colliding(&moved));
///
/// let landed = moved.simulate_drop_position(&board);
/// assert!(landed.position().y() > moved.position().y());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl fmt::Display for Piece {
    // Format: "kind#rotation@x,y" (e.g. "S#1@4,18")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        )
    }
}

impl Piece {
    /// Creates a piece of the given kind at the spawn anchor in its first rotation.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN_POSITION,
            rotation: PieceRotation::SPAWN,
            kind,
        }
    }

    /// Creates a piece at an arbitrary anchor.
    ///
    /// The rotation index wraps modulo the kind's rotation count.
    #[must_use]
    pub fn with_placement(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            position,
            rotation: rotation.normalized(kind),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> &'static PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Returns the board coordinates of the four occupied cells.
    ///
    /// Coordinates may lie outside the board; the board decides whether they collide.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .into_iter()
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.translated(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.translated(0, 1)
    }

    /// Advances to the next rotation state, wrapping around.
    ///
    /// The anchor is unchanged; there is no wall kick.
    #[must_use]
    pub fn rotated(&self) -> Self {
        self.with_rotation(PieceRotation(self.rotation.0 + 1))
    }

    #[must_use]
    pub fn with_rotation(&self, rotation: PieceRotation) -> Self {
        Self {
            rotation: rotation.normalized(self.kind),
            ..*self
        }
    }

    #[must_use]
    pub fn with_x(&self, x: i32) -> Self {
        Self {
            position: PiecePosition::new(x, self.position.y),
            ..*self
        }
    }

    /// Returns the lowest position reachable by moving straight down (the ghost).
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.down();
            if board.is_colliding(&next) {
                return dropped;
            }
            dropped = next;
        }
    }
}

/// Anchor of a piece on the board: the top-left corner of its 5×5 mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN_POSITION: Self = Self::new(Board::WIDTH as i32 / 2 - 2, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state index of a piece.
///
/// Unlike a fixed four-way rotation, the number of states depends on the kind:
/// I, S and Z have 2, O has 1, T, J and L have 4. Indices are kept in range by
/// [`Piece`], which wraps them modulo [`PieceKind::rotation_count`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[expect(clippy::cast_possible_truncation)]
    fn normalized(self, kind: PieceKind) -> Self {
        Self(self.0 % kind.rotation_count() as u8)
    }
}

/// The seven piece kinds.
///
/// The discriminant plus one is the cell value written into the board when a
/// piece of this kind locks (see [`Block::value`](super::board::Block::value)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Number of distinct rotation states of this kind.
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        PIECE_MASKS[self as usize].len()
    }

    /// Iterates over every rotation state in ascending index order.
    pub fn rotations(self) -> impl Iterator<Item = PieceRotation> {
        (0..).take(self.rotation_count()).map(PieceRotation)
    }

    /// Returns the occupancy mask of the given rotation state.
    ///
    /// The rotation index wraps modulo [`Self::rotation_count`].
    #[must_use]
    pub fn mask(self, rotation: PieceRotation) -> &'static PieceMask {
        let masks = PIECE_MASKS[self as usize];
        &masks[rotation.index() % masks.len()]
    }

    /// Returns the `(dx, dy)` offsets of the occupied cells within the mask.
    #[must_use]
    pub fn occupied_offsets(self, rotation: PieceRotation) -> ArrayVec<(i32, i32), 4> {
        let mask = self.mask(rotation);
        let mut offsets = ArrayVec::new();
        for (dy, row) in (0..).zip(mask) {
            for dx in 0..PIECE_SIZE {
                if row & (1 << dx) != 0 {
                    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    offsets.push((dx as i32, dy));
                }
            }
        }
        offsets
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('Z'), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Occupancy mask of one rotation state.
///
/// Five rows of five bits; bit `x` of row `y` is set when cell `(x, y)` of the
/// mask is occupied. Every mask has exactly four bits set.
pub type PieceMask = [u8; PIECE_SIZE];

const PIECE_MASKS: [&[PieceMask]; PieceKind::LEN] = {
    const fn m(bits: [bool; PIECE_SIZE]) -> u8 {
        let mut mask = 0;
        let mut i = 0;
        while i < PIECE_SIZE {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEEE: u8 = m([E; PIECE_SIZE]);

    const I: &[PieceMask] = &[
        [EEEEE, m([E, E, C, E, E]), m([E, E, C, E, E]), m([E, E, C, E, E]), m([E, E, C, E, E])],
        [EEEEE, EEEEE, m([C, C, C, C, E]), EEEEE, EEEEE],
    ];
    const O: &[PieceMask] = &[[EEEEE, EEEEE, m([E, C, C, E, E]), m([E, C, C, E, E]), EEEEE]];
    const T: &[PieceMask] = &[
        [EEEEE, EEEEE, m([E, C, E, E, E]), m([C, C, C, E, E]), EEEEE],
        [EEEEE, EEEEE, m([E, C, E, E, E]), m([E, C, C, E, E]), m([E, C, E, E, E])],
        [EEEEE, EEEEE, EEEEE, m([C, C, C, E, E]), m([E, C, E, E, E])],
        [EEEEE, EEEEE, m([E, C, E, E, E]), m([C, C, E, E, E]), m([E, C, E, E, E])],
    ];
    const S: &[PieceMask] = &[
        [EEEEE, EEEEE, m([E, C, C, E, E]), m([C, C, E, E, E]), EEEEE],
        [EEEEE, m([E, C, E, E, E]), m([E, C, C, E, E]), m([E, E, C, E, E]), EEEEE],
    ];
    const Z: &[PieceMask] = &[
        [EEEEE, EEEEE, m([C, C, E, E, E]), m([E, C, C, E, E]), EEEEE],
        [EEEEE, m([E, E, C, E, E]), m([E, C, C, E, E]), m([E, C, E, E, E]), EEEEE],
    ];
    const J: &[PieceMask] = &[
        [EEEEE, m([E, C, E, E, E]), m([E, C, E, E, E]), m([C, C, E, E, E]), EEEEE],
        [EEEEE, EEEEE, m([C, E, E, E, E]), m([C, C, C, E, E]), EEEEE],
        [EEEEE, m([E, C, C, E, E]), m([E, C, E, E, E]), m([E, C, E, E, E]), EEEEE],
        [EEEEE, EEEEE, m([C, C, C, E, E]), m([E, E, C, E, E]), EEEEE],
    ];
    const L: &[PieceMask] = &[
        [EEEEE, m([E, E, C, E, E]), m([E, E, C, E, E]), m([E, C, C, E, E]), EEEEE],
        [EEEEE, EEEEE, m([C, C, C, E, E]), m([C, E, E, E, E]), EEEEE],
        [EEEEE, m([C, C, E, E, E]), m([E, C, E, E, E]), m([E, C, E, E, E]), EEEEE],
        [EEEEE, EEEEE, m([E, E, C, E, E]), m([C, C, C, E, E]), EEEEE],
    ];

    // Indexed by `PieceKind as usize`.
    [I, O, T, S, Z, J, L]
};
