use std::{fmt, time::Duration};

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, PieceRotation},
};

/// Cadence of corrective autoplay actions while the piece is being positioned.
pub const AUTOPLAY_STEP_INTERVAL: Duration = Duration::from_millis(100);

/// Gravity interval once autoplay has positioned the piece.
pub const AUTOPLAY_FALL_INTERVAL: Duration = Duration::from_millis(20);

/// Target chosen for the falling piece: a rotation state and an anchor column.
///
/// The row is implied: the piece drops straight down from wherever it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    rotation: PieceRotation,
    x: i32,
}

impl Placement {
    #[must_use]
    pub const fn new(rotation: PieceRotation, x: i32) -> Self {
        Self { rotation, x }
    }

    #[must_use]
    pub fn of(piece: &Piece) -> Self {
        Self::new(piece.rotation(), piece.position().x())
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.rotation.index(), self.x)
    }
}

/// Chooses where the falling piece should go.
///
/// The session calls this when autoplay is enabled, when a new piece spawns
/// under autoplay, and when a cached target stops fitting. Implementations
/// must treat `board` as read-only; any simulation happens on their own copy.
pub trait PlacementPlanner: fmt::Debug {
    /// Returns the target placement for a piece of `kind`, or `None` when no
    /// placement is legal at all (the session then ends the game).
    fn plan(&self, board: &Board, kind: PieceKind) -> Option<Placement>;
}

/// Per-piece autoplay progress held by the session while autoplay is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Autoplay {
    pub(crate) target: Placement,
    pub(crate) positioned: bool,
    pub(crate) step_timer: Duration,
}

impl Autoplay {
    pub(crate) const fn new(target: Placement) -> Self {
        Self {
            target,
            positioned: false,
            step_timer: Duration::ZERO,
        }
    }
}
