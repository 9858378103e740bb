//! Autoplay planning: choosing where the falling piece should go.
//!
//! [`GreedyPlanner`] performs an exhaustive one-ply search. For every rotation
//! state of the piece (outer loop, ascending) and every anchor column in
//! [`ANCHOR_X_RANGE`] (inner loop, ascending) it:
//!
//! 1. Places the piece at row 0 and skips it if that collides
//! 2. Drops it straight down to its landing row
//! 3. Locks it onto a scratch copy of the board, without clearing lines
//! 4. Scores the scratch board with a [`PlacementEvaluator`]
//!
//! The best score wins under strict `>`, so ties go to the candidate found
//! first: lowest rotation index, then lowest anchor column. The live board is
//! only ever read.
//!
//! The anchor range extends two columns past each wall because pieces sit
//! inside a 5×5 mask; an anchor outside the board can still put every cell
//! of the piece inside it.

use std::ops::RangeInclusive;

use blockfall_engine::{Board, Piece, PieceKind, PiecePosition, Placement, PlacementPlanner};

use crate::{
    board_analysis::BoardAnalysis,
    placement_evaluator::{HeuristicEvaluator, PlacementEvaluator},
};

/// Anchor columns searched for every rotation.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const ANCHOR_X_RANGE: RangeInclusive<i32> = -2..=(Board::WIDTH as i32 + 1);

/// A candidate placement together with its landing position and score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    placement: Placement,
    landing: Piece,
    score: f64,
}

impl ScoredPlacement {
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The piece at the row where it comes to rest.
    #[must_use]
    pub fn landing(&self) -> Piece {
        self.landing
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Returns every placement of `kind` that fits at row 0, in search order.
pub fn spawn_row_candidates(board: &Board, kind: PieceKind) -> impl Iterator<Item = Piece> + '_ {
    kind.rotations()
        .flat_map(move |rotation| {
            ANCHOR_X_RANGE
                .map(move |x| Piece::with_placement(kind, rotation, PiecePosition::new(x, 0)))
        })
        .filter(|piece| !board.is_colliding(piece))
}

/// Greedy one-ply planner scoring every legal placement with an evaluator.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, PlacementPlanner as _};
/// use blockfall_evaluator::placement_planner::GreedyPlanner;
///
/// let planner = GreedyPlanner::default();
/// let target = planner.plan(&Board::EMPTY, PieceKind::I);
/// assert!(target.is_some());
/// ```
#[derive(Debug)]
pub struct GreedyPlanner {
    evaluator: Box<dyn PlacementEvaluator>,
}

impl Default for GreedyPlanner {
    fn default() -> Self {
        Self::new(Box::new(HeuristicEvaluator))
    }
}

impl GreedyPlanner {
    #[must_use]
    pub fn new(evaluator: Box<dyn PlacementEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Drops `piece` from its current row, locks it on a scratch board, and
    /// scores the result.
    #[must_use]
    pub fn evaluate_candidate(&self, board: &Board, piece: &Piece) -> ScoredPlacement {
        let landing = piece.simulate_drop_position(board);
        let mut scratch = board.clone();
        scratch.fill_piece(&landing);
        let analysis = BoardAnalysis::from_board(scratch);
        ScoredPlacement {
            placement: Placement::of(piece),
            landing,
            score: self.evaluator.evaluate_placement(&analysis),
        }
    }

    /// Searches every legal placement of `kind` and returns the best one.
    ///
    /// Returns `None` when no placement fits at row 0.
    #[must_use]
    pub fn select_best(&self, board: &Board, kind: PieceKind) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;
        let mut candidates = 0;
        for piece in spawn_row_candidates(board, kind) {
            candidates += 1;
            let scored = self.evaluate_candidate(board, &piece);
            if best.is_none_or(|best| scored.score > best.score) {
                best = Some(scored);
            }
        }

        match &best {
            Some(best) => tracing::trace!(
                ?kind,
                target = %best.placement,
                score = best.score,
                candidates,
                "planned placement"
            ),
            None => tracing::trace!(?kind, "no legal placement"),
        }
        best
    }
}

impl PlacementPlanner for GreedyPlanner {
    fn plan(&self, board: &Board, kind: PieceKind) -> Option<Placement> {
        self.select_best(board, kind).map(|best| best.placement)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blockfall_engine::{Block, Command, GameSession, PieceRotation, PieceSeed};
    use proptest::prelude::*;

    use super::*;

    fn fill_row_except(board: &mut Board, y: usize, gaps: &[usize]) {
        for x in 0..Board::WIDTH {
            if !gaps.contains(&x) {
                board.set(x, y, Block::Piece(PieceKind::S));
            }
        }
    }

    #[test]
    fn test_z_on_empty_board_matches_brute_force() {
        let board = Board::EMPTY;
        let evaluator = HeuristicEvaluator;

        let mut expected: Option<(f64, Placement)> = None;
        for rotation in 0..PieceKind::Z.rotation_count() {
            for x in -2..=11 {
                let rotation = PieceRotation::new(u8::try_from(rotation).unwrap());
                let piece = Piece::with_placement(PieceKind::Z, rotation, PiecePosition::new(x, 0));
                if board.is_colliding(&piece) {
                    continue;
                }
                let mut landing = piece;
                while !board.is_colliding(&landing.translated(0, 1)) {
                    landing = landing.translated(0, 1);
                }
                let mut scratch = board.clone();
                scratch.fill_piece(&landing);
                let score = evaluator.evaluate_placement(&BoardAnalysis::from_board(scratch));
                if expected.is_none_or(|(best, _)| score > best) {
                    expected = Some((score, Placement::new(rotation, x)));
                }
            }
        }
        let (expected_score, expected_target) = expected.unwrap();

        let best = GreedyPlanner::default()
            .select_best(&board, PieceKind::Z)
            .unwrap();
        assert_eq!(best.placement(), expected_target);
        assert!((best.score() - expected_score).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ties_resolve_to_first_candidate() {
        // An O piece on an empty board scores the same at both walls; the
        // leftmost anchor wins.
        let board = Board::EMPTY;
        let planner = GreedyPlanner::default();
        let scores: Vec<_> = spawn_row_candidates(&board, PieceKind::O)
            .map(|piece| planner.evaluate_candidate(&board, &piece))
            .collect();
        let max = scores
            .iter()
            .map(ScoredPlacement::score)
            .fold(f64::NEG_INFINITY, f64::max);
        let first_max = scores
            .iter()
            .find(|s| s.score().total_cmp(&max).is_eq())
            .unwrap();

        let best = planner.select_best(&board, PieceKind::O).unwrap();
        assert_eq!(best.placement(), first_max.placement());
    }

    #[test]
    fn test_candidates_cover_board_width() {
        let candidates: Vec<_> = spawn_row_candidates(&Board::EMPTY, PieceKind::I).collect();
        // Vertical: one anchor per column. Horizontal: seven positions.
        assert_eq!(candidates.len(), 10 + 7);
        assert_eq!(candidates[0].rotation(), PieceRotation::new(0));
        assert_eq!(candidates[0].position().x(), -2);
        assert_eq!(candidates[10].rotation(), PieceRotation::new(1));
        assert_eq!(candidates[10].position().x(), 0);
    }

    #[test]
    fn test_prefers_completing_a_line() {
        let mut board = Board::EMPTY;
        fill_row_except(&mut board, Board::HEIGHT - 1, &[0, 1, 2, 3]);
        let before = board.clone();

        let best = GreedyPlanner::default()
            .select_best(&board, PieceKind::I)
            .unwrap();
        assert_eq!(best.placement(), Placement::new(PieceRotation::new(1), 0));
        // The horizontal I sits in mask row 2.
        assert_eq!(best.landing().position().y(), 17);
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_legal_placement() {
        let mut board = Board::EMPTY;
        for y in 0..Board::HEIGHT {
            fill_row_except(&mut board, y, &[]);
        }
        for kind in PieceKind::ALL {
            assert_eq!(GreedyPlanner::default().plan(&board, kind), None);
        }
    }

    #[test]
    fn test_autoplay_lands_piece_at_planned_target() {
        let mut session = GameSession::with_seed(
            PieceSeed::from_bytes([3; 16]),
            Box::new(GreedyPlanner::default()),
        );
        let kind = session.falling_piece().kind();
        session.handle_command(Command::ToggleAutoplay);
        let target = session.autoplay_target().unwrap();
        assert_eq!(
            Some(target),
            GreedyPlanner::default().plan(&Board::EMPTY, kind)
        );

        let expected = Piece::with_placement(
            kind,
            target.rotation(),
            PiecePosition::new(target.x(), 0),
        )
        .simulate_drop_position(&Board::EMPTY);

        for _ in 0..10_000 {
            if session.stats().completed_pieces() > 0 {
                break;
            }
            session.tick(Duration::from_millis(16));
        }
        assert_eq!(session.stats().completed_pieces(), 1);
        for (x, y) in expected.occupied_positions() {
            let (x, y) = (usize::try_from(x).unwrap(), usize::try_from(y).unwrap());
            assert_eq!(session.board().cell(x, y), Block::Piece(kind));
        }
    }

    #[test]
    fn test_autoplay_clears_lines() {
        let mut session = GameSession::with_seed(
            PieceSeed::from_bytes([42; 16]),
            Box::new(GreedyPlanner::default()),
        );
        session.handle_command(Command::ToggleAutoplay);

        for _ in 0..1_000_000 {
            if session.is_game_over() || session.stats().completed_pieces() >= 100 {
                break;
            }
            session.tick(Duration::from_millis(16));
        }
        assert!(!session.is_game_over(), "{}", session.board());
        assert!(session.total_cleared_lines() > 0);
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        // Mostly-empty upper rows over a ragged stack.
        prop::collection::vec(prop::bool::weighted(0.3), Board::WIDTH * Board::HEIGHT).prop_map(
            |cells| {
                let mut board = Board::EMPTY;
                for (i, filled) in cells.into_iter().enumerate() {
                    let (x, y) = (i % Board::WIDTH, i / Board::WIDTH);
                    if filled && y >= 8 {
                        board.set(x, y, Block::Piece(PieceKind::T));
                    }
                }
                board
            },
        )
    }

    proptest! {
        #[test]
        fn planned_target_fits_at_spawn_row(board in arb_board(), kind_index in 0..PieceKind::LEN) {
            let kind = PieceKind::ALL[kind_index];
            let before = board.clone();
            let target = GreedyPlanner::default().plan(&board, kind);
            prop_assert_eq!(&board, &before);

            let target = target.expect("upper rows are empty");
            let piece = Piece::with_placement(kind, target.rotation(), PiecePosition::new(target.x(), 0));
            prop_assert!(!board.is_colliding(&piece));
        }
    }
}
