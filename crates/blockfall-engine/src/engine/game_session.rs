use std::time::Duration;

use rand::Rng as _;
use serde::Serialize;

use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind, PieceRotation},
    },
};

use super::{
    GameStats, PieceGenerator, PieceSeed,
    autoplay::{AUTOPLAY_FALL_INTERVAL, AUTOPLAY_STEP_INTERVAL, Autoplay, Placement, PlacementPlanner},
};

const BASE_FALL_MILLIS: u64 = 500;
const FALL_MILLIS_PER_LEVEL: u64 = 50;
const MIN_FALL_MILLIS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// Discrete player intents, already decoded from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    ToggleAutoplay,
}

/// Gravity interval for a level: 500 ms at level 1, 50 ms faster per level,
/// never below 100 ms.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = BASE_FALL_MILLIS.saturating_sub(steps.saturating_mul(FALL_MILLIS_PER_LEVEL));
    Duration::from_millis(millis.max(MIN_FALL_MILLIS))
}

/// A single game: board, falling piece, score, timers, and autoplay.
///
/// All mutation goes through [`Self::handle_command`] and [`Self::tick`]
/// (plus the lower-level moves they are built from). Once the session is
/// over, every mutating call is a no-op.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    falling_piece: Piece,
    generator: PieceGenerator,
    stats: GameStats,
    session_state: SessionState,
    fall_timer: Duration,
    fall_interval: Duration,
    play_time: Duration,
    autoplay: Option<Autoplay>,
    planner: Box<dyn PlacementPlanner>,
}

impl GameSession {
    /// Starts a session with a randomly chosen seed.
    #[must_use]
    pub fn new(planner: Box<dyn PlacementPlanner>) -> Self {
        Self::with_seed(rand::rng().random(), planner)
    }

    /// Starts a session whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed, planner: Box<dyn PlacementPlanner>) -> Self {
        let mut generator = PieceGenerator::with_seed(seed);
        let falling_piece = Piece::new(generator.next_kind());
        let stats = GameStats::new();
        Self {
            board: Board::EMPTY,
            falling_piece,
            generator,
            fall_interval: fall_interval(stats.level()),
            stats,
            session_state: SessionState::Playing,
            fall_timer: Duration::ZERO,
            play_time: Duration::ZERO,
            autoplay: None,
            planner,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    /// Current gravity interval in manual play.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Total time advanced through [`Self::tick`] while playing.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    #[must_use]
    pub fn is_autoplay_enabled(&self) -> bool {
        self.autoplay.is_some()
    }

    /// The placement autoplay is steering the falling piece toward.
    #[must_use]
    pub fn autoplay_target(&self) -> Option<Placement> {
        self.autoplay.map(|autoplay| autoplay.target)
    }

    /// Whether autoplay has finished steering the current piece.
    #[must_use]
    pub fn is_autoplay_positioned(&self) -> bool {
        self.autoplay.is_some_and(|autoplay| autoplay.positioned)
    }

    /// Where the falling piece would land if dropped straight down.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.board)
    }

    /// Whether the falling piece, shifted by `(dx, dy)` and optionally put in
    /// `rotation`, would overlap a wall, the floor, or a locked block.
    #[must_use]
    pub fn collides(&self, dx: i32, dy: i32, rotation: Option<PieceRotation>) -> bool {
        let mut piece = self.falling_piece.translated(dx, dy);
        if let Some(rotation) = rotation {
            piece = piece.with_rotation(rotation);
        }
        self.board.is_colliding(&piece)
    }

    /// Replaces the falling piece if the new one fits.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.is_game_over() || self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.translated(dx, dy))
    }

    /// Advances to the next rotation state in place. Blocked rotations leave
    /// the piece unchanged; there is no wall kick.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.rotated())
    }

    /// Moves the piece down one row, locking it if it cannot move.
    pub fn soft_drop(&mut self) {
        if self.is_game_over() {
            return;
        }
        if self.try_move(0, 1).is_err() {
            self.lock_and_advance();
        }
    }

    /// Drops the piece to its landing row and locks it immediately.
    pub fn hard_drop(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.falling_piece = self.simulate_drop_position();
        self.lock_and_advance();
    }

    /// Applies one player command.
    ///
    /// Everything is ignored after game over. While autoplay is enabled only
    /// [`Command::ToggleAutoplay`] has an effect.
    pub fn handle_command(&mut self, command: Command) {
        if self.is_game_over() {
            return;
        }
        match command {
            Command::ToggleAutoplay => self.toggle_autoplay(),
            _ if self.autoplay.is_some() => {}
            Command::MoveLeft => _ = self.try_move(-1, 0),
            Command::MoveRight => _ = self.try_move(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => _ = self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
        }
    }

    /// Advances the session by `elapsed`.
    ///
    /// While autoplay is steering a piece, gravity is suspended and one
    /// corrective action runs every [`AUTOPLAY_STEP_INTERVAL`]. Otherwise the
    /// piece falls one row per fall interval ([`AUTOPLAY_FALL_INTERVAL`] once
    /// autoplay has positioned it).
    pub fn tick(&mut self, elapsed: Duration) {
        if self.is_game_over() {
            return;
        }
        self.play_time += elapsed;

        if let Some(autoplay) = &mut self.autoplay
            && !autoplay.positioned
        {
            autoplay.step_timer += elapsed;
            if autoplay.step_timer >= AUTOPLAY_STEP_INTERVAL {
                autoplay.step_timer = Duration::ZERO;
                self.autoplay_step();
            }
            return;
        }

        self.fall_timer += elapsed;
        let interval = if self.autoplay.is_some() {
            AUTOPLAY_FALL_INTERVAL
        } else {
            self.fall_interval
        };
        if self.fall_timer >= interval {
            self.fall_timer = Duration::ZERO;
            self.soft_drop();
        }
    }

    /// Outcome snapshot suitable for reporting.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed(),
            level: self.level(),
            stats: self.stats.clone(),
            play_time_secs: self.play_time.as_secs_f64(),
            game_over: self.is_game_over(),
            autoplay: self.is_autoplay_enabled(),
        }
    }

    fn toggle_autoplay(&mut self) {
        if self.autoplay.take().is_none() {
            // A failed plan ends the game; the flag still reads as enabled.
            let target = self
                .plan_autoplay_target()
                .unwrap_or_else(|| Placement::of(&self.falling_piece));
            self.autoplay = Some(Autoplay::new(target));
        }
        tracing::debug!(enabled = self.autoplay.is_some(), "autoplay toggled");
    }

    /// One corrective action toward the autoplay target.
    ///
    /// The target is rechecked against the piece's current row first, and
    /// replanned if it no longer fits. The piece counts as positioned when it
    /// matches the target or when the needed move is blocked.
    fn autoplay_step(&mut self) {
        let Some(Autoplay { mut target, .. }) = self.autoplay else {
            return;
        };
        let candidate = self
            .falling_piece
            .with_rotation(target.rotation())
            .with_x(target.x());
        if self.board.is_colliding(&candidate) {
            let Some(replanned) = self.plan_autoplay_target() else {
                return;
            };
            target = replanned;
        }

        let current = self.falling_piece;
        let positioned = if current.rotation() != target.rotation() {
            self.try_rotate().is_err()
        } else if current.position().x() < target.x() {
            self.try_move(1, 0).is_err()
        } else if current.position().x() > target.x() {
            self.try_move(-1, 0).is_err()
        } else {
            true
        };
        tracing::trace!(piece = %self.falling_piece, %target, positioned, "autoplay step");

        if let Some(autoplay) = &mut self.autoplay {
            autoplay.target = target;
            autoplay.positioned = positioned;
        }
    }

    fn plan_autoplay_target(&mut self) -> Option<Placement> {
        let target = self.planner.plan(&self.board, self.falling_piece.kind());
        if target.is_none() {
            self.top_out("no legal placement");
        }
        target
    }

    fn lock_and_advance(&mut self) {
        let piece = self.falling_piece;
        self.board.fill_piece(&piece);
        let cleared_lines = self.board.clear_full_rows();

        let level_before = self.stats.level();
        let points = self.stats.complete_piece_drop(cleared_lines);
        let level = self.stats.level();
        self.fall_interval = fall_interval(level);

        tracing::debug!(%piece, cleared_lines, points, score = self.stats.score(), "piece locked");
        if level != level_before {
            tracing::info!(level, fall_interval = ?self.fall_interval, "level up");
        }

        let kind = self.generator.next_kind();
        self.spawn(kind);
    }

    fn spawn(&mut self, kind: PieceKind) {
        self.falling_piece = Piece::new(kind);
        if self.board.is_colliding(&self.falling_piece) {
            self.top_out("spawn blocked");
            return;
        }
        if self.autoplay.is_some()
            && let Some(target) = self.plan_autoplay_target()
        {
            self.autoplay = Some(Autoplay::new(target));
        }
    }

    fn top_out(&mut self, reason: &'static str) {
        self.session_state = SessionState::GameOver;
        tracing::info!(
            reason,
            score = self.stats.score(),
            lines = self.stats.total_cleared_lines(),
            pieces = self.stats.completed_pieces(),
            "game over"
        );
    }
}

/// Serializable outcome of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub seed: PieceSeed,
    pub level: usize,
    pub stats: GameStats,
    pub play_time_secs: f64,
    pub game_over: bool,
    pub autoplay: bool,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Block, PiecePosition};

    use super::*;

    #[derive(Debug)]
    struct FixedPlanner(Option<Placement>);

    impl PlacementPlanner for FixedPlanner {
        fn plan(&self, _board: &Board, _kind: PieceKind) -> Option<Placement> {
            self.0
        }
    }

    fn session() -> GameSession {
        GameSession::with_seed(
            PieceSeed::from_bytes([0; 16]),
            Box::new(FixedPlanner(None)),
        )
    }

    fn session_with_planner(target: Option<Placement>) -> GameSession {
        GameSession::with_seed(
            PieceSeed::from_bytes([0; 16]),
            Box::new(FixedPlanner(target)),
        )
    }

    fn place(session: &mut GameSession, kind: PieceKind, rotation: u8, x: i32) {
        let piece = Piece::with_placement(
            kind,
            PieceRotation::new(rotation),
            PiecePosition::new(x, 0),
        );
        session.set_falling_piece(piece).unwrap();
    }

    fn fill_row_except(board: &mut Board, y: usize, gaps: &[usize]) {
        for x in 0..Board::WIDTH {
            if !gaps.contains(&x) {
                board.set(x, y, Block::Piece(PieceKind::O));
            }
        }
    }

    #[test]
    fn test_fall_interval() {
        assert_eq!(fall_interval(1), Duration::from_millis(500));
        assert_eq!(fall_interval(2), Duration::from_millis(450));
        assert_eq!(fall_interval(8), Duration::from_millis(150));
        assert_eq!(fall_interval(9), Duration::from_millis(100));
        assert_eq!(fall_interval(10), Duration::from_millis(100));
        assert_eq!(fall_interval(usize::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_new_session_spawns_at_anchor() {
        let session = session();
        assert!(session.session_state().is_playing());
        assert_eq!(session.falling_piece().position(), PiecePosition::SPAWN_POSITION);
        assert_eq!(session.falling_piece().rotation(), PieceRotation::SPAWN);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert!(!session.collides(0, 0, None));
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = session();
        let mut b = session();
        for _ in 0..10 {
            assert_eq!(a.falling_piece(), b.falling_piece());
            a.hard_drop();
            b.hard_drop();
        }
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_moves_keep_piece_in_bounds() {
        let mut session = session();
        place(&mut session, PieceKind::I, 0, 3);
        // Vertical I occupies mask column 2.
        while session.try_move(-1, 0).is_ok() {
            assert!(!session.collides(0, 0, None));
        }
        assert_eq!(session.falling_piece().position().x(), -2);
        while session.try_move(1, 0).is_ok() {
            assert!(!session.collides(0, 0, None));
        }
        assert_eq!(session.falling_piece().position().x(), 7);
    }

    #[test]
    fn test_lock_spawns_next_kind_from_generator() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_bytes([0; 16]));
        let mut session = session();
        for _ in 0..5 {
            assert_eq!(session.falling_piece().kind(), generator.next_kind());
            session.hard_drop();
        }
        assert_eq!(session.stats().completed_pieces(), 5);
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        let mut session = session();
        place(&mut session, PieceKind::T, 0, 3);
        let occupied: Vec<_> = session.falling_piece().occupied_positions().collect();
        for y in 0..Board::HEIGHT {
            for x in 0..Board::WIDTH {
                let cell = (i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
                if !occupied.contains(&cell) {
                    session.board.set(x, y, Block::Piece(PieceKind::O));
                }
            }
        }
        let board = session.board().clone();
        let piece = *session.falling_piece();

        assert_eq!(session.try_rotate(), Err(PieceCollisionError));
        assert_eq!(session.falling_piece(), &piece);
        assert_eq!(session.board(), &board);
        assert!(!session.collides(0, 0, None));
    }

    #[test]
    fn test_vertical_i_hard_drop_lands_on_floor() {
        let mut session = session();
        place(&mut session, PieceKind::I, 0, 1);
        session.hard_drop();

        for y in 0..Board::HEIGHT {
            for x in 0..Board::WIDTH {
                let expected = if x == 3 && y >= 16 {
                    Block::Piece(PieceKind::I)
                } else {
                    Block::Empty
                };
                assert_eq!(session.board().cell(x, y), expected, "cell ({x}, {y})");
            }
        }
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_o_piece_completes_bottom_row() {
        let mut session = session();
        fill_row_except(&mut session.board, Board::HEIGHT - 1, &[4, 5]);
        place(&mut session, PieceKind::O, 0, 3);
        session.hard_drop();

        assert_eq!(session.total_cleared_lines(), 1);
        assert_eq!(session.score(), 100);
        // The O's upper half drops into the bottom row.
        let bottom = session.board().row(Board::HEIGHT - 1);
        assert_eq!(bottom.filled_cells(), 2);
        assert!(!bottom.cells()[4].is_empty());
        assert!(!bottom.cells()[5].is_empty());
        assert!(session.board().rows().take(Board::HEIGHT - 1).all(|row| row.filled_cells() == 0));
    }

    #[test]
    fn test_score_scales_with_lines_and_level() {
        let mut session = session();
        for _ in 0..20 {
            session.stats.complete_piece_drop(1);
        }
        let score_before = session.score();
        assert_eq!(session.level(), 3);

        for y in 16..Board::HEIGHT {
            fill_row_except(&mut session.board, y, &[9]);
        }
        // Vertical I in column 9 fills all four gaps.
        place(&mut session, PieceKind::I, 0, 7);
        session.hard_drop();

        assert_eq!(session.score() - score_before, 4 * 100 * 3);
        assert_eq!(session.total_cleared_lines(), 24);
        assert_eq!(session.board(), &Board::EMPTY);
    }

    #[test]
    fn test_gravity_follows_fall_interval() {
        let mut session = session();
        let y = session.falling_piece().position().y();
        session.tick(Duration::from_millis(499));
        assert_eq!(session.falling_piece().position().y(), y);
        session.tick(Duration::from_millis(1));
        assert_eq!(session.falling_piece().position().y(), y + 1);
        session.tick(Duration::from_millis(499));
        assert_eq!(session.falling_piece().position().y(), y + 1);
        assert_eq!(session.play_time(), Duration::from_millis(999));
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut session = session();
        let landing = session.simulate_drop_position();
        session.set_falling_piece(landing).unwrap();
        session.soft_drop();
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.falling_piece().position(), PiecePosition::SPAWN_POSITION);
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut session = session();
        for y in 2..=5 {
            for x in 3..=7 {
                session.board.set(x, y, Block::Piece(PieceKind::O));
            }
        }
        session.hard_drop();
        assert!(session.is_game_over());

        let board = session.board().clone();
        let piece = *session.falling_piece();
        let stats = session.stats().clone();
        let play_time = session.play_time();
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
            Command::HardDrop,
            Command::ToggleAutoplay,
        ] {
            session.handle_command(command);
        }
        session.tick(Duration::from_secs(10));

        assert_eq!(session.board(), &board);
        assert_eq!(session.falling_piece(), &piece);
        assert_eq!(session.stats(), &stats);
        assert_eq!(session.play_time(), play_time);
        assert!(!session.is_autoplay_enabled());
    }

    #[test]
    fn test_commands_ignored_while_autoplay_enabled() {
        let target = Placement::new(PieceRotation::SPAWN, 3);
        let mut session = session_with_planner(Some(target));
        session.handle_command(Command::ToggleAutoplay);
        assert!(session.is_autoplay_enabled());
        assert_eq!(session.autoplay_target(), Some(target));

        let piece = *session.falling_piece();
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
            Command::HardDrop,
        ] {
            session.handle_command(command);
        }
        assert_eq!(session.falling_piece(), &piece);
        assert_eq!(session.stats().completed_pieces(), 0);

        session.handle_command(Command::ToggleAutoplay);
        assert!(!session.is_autoplay_enabled());
        session.handle_command(Command::MoveLeft);
        assert_eq!(session.falling_piece().position().x(), piece.position().x() - 1);
    }

    #[test]
    fn test_autoplay_steers_then_falls_fast() {
        let target = Placement::new(PieceRotation::new(1), 0);
        let mut session = session_with_planner(Some(target));
        place(&mut session, PieceKind::T, 0, 3);
        session.handle_command(Command::ToggleAutoplay);

        // Gravity is suspended while steering: rotate once, then three moves left.
        session.tick(AUTOPLAY_STEP_INTERVAL);
        assert_eq!(session.falling_piece().rotation(), PieceRotation::new(1));
        for x in (0..3).rev() {
            session.tick(AUTOPLAY_STEP_INTERVAL);
            assert_eq!(session.falling_piece().position().x(), x);
        }
        assert_eq!(session.falling_piece().position().y(), 0);
        assert!(!session.is_autoplay_positioned());

        session.tick(AUTOPLAY_STEP_INTERVAL);
        assert!(session.is_autoplay_positioned());

        session.tick(AUTOPLAY_FALL_INTERVAL);
        assert_eq!(session.falling_piece().position().y(), 1);
    }

    #[test]
    fn test_autoplay_blocked_rotation_counts_as_positioned() {
        // A vertical I against the left wall cannot turn horizontal in place.
        let target = Placement::new(PieceRotation::new(1), 0);
        let mut session = session_with_planner(Some(target));
        place(&mut session, PieceKind::I, 0, -2);
        session.handle_command(Command::ToggleAutoplay);

        session.tick(AUTOPLAY_STEP_INTERVAL);
        assert_eq!(session.falling_piece().rotation(), PieceRotation::SPAWN);
        assert_eq!(session.falling_piece().position().x(), -2);
        assert!(session.is_autoplay_positioned());
        assert_eq!(session.autoplay_target(), Some(target));

        session.tick(AUTOPLAY_FALL_INTERVAL);
        assert_eq!(session.falling_piece().position().y(), 1);
        assert_eq!(session.falling_piece().rotation(), PieceRotation::SPAWN);
    }

    #[test]
    fn test_autoplay_step_waits_for_interval() {
        let target = Placement::new(PieceRotation::SPAWN, 0);
        let mut session = session_with_planner(Some(target));
        place(&mut session, PieceKind::O, 0, 3);
        session.handle_command(Command::ToggleAutoplay);

        session.tick(Duration::from_millis(99));
        assert_eq!(session.falling_piece().position().x(), 3);
        session.tick(Duration::from_millis(1));
        assert_eq!(session.falling_piece().position().x(), 2);
    }

    #[test]
    fn test_autoplay_without_legal_placement_ends_game() {
        let mut session = session_with_planner(None);
        session.handle_command(Command::ToggleAutoplay);
        assert!(session.is_game_over());
        assert!(session.is_autoplay_enabled());
    }

    #[test]
    fn test_collides_does_not_mutate() {
        let mut session = session();
        session.board.set(0, 19, Block::Piece(PieceKind::L));
        let board = session.board().clone();
        let piece = *session.falling_piece();
        for dx in -12..12 {
            for dy in -4..24 {
                for rotation in 0..4 {
                    let _ = session.collides(dx, dy, Some(PieceRotation::new(rotation)));
                }
            }
        }
        assert_eq!(session.board(), &board);
        assert_eq!(session.falling_piece(), &piece);
    }

    #[test]
    fn test_summary_serializes() {
        let mut session = session();
        session.hard_drop();
        let json = serde_json::to_value(session.summary()).unwrap();
        assert_eq!(json["seed"], "0".repeat(32));
        assert_eq!(json["stats"]["completed_pieces"], 1);
        assert_eq!(json["game_over"], false);
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        prop::collection::vec(prop::bool::weighted(0.35), Board::WIDTH * Board::HEIGHT).prop_map(
            |cells| {
                let mut board = Board::EMPTY;
                for (i, filled) in cells.into_iter().enumerate() {
                    if filled {
                        board.set(i % Board::WIDTH, i / Board::WIDTH, Block::Piece(PieceKind::Z));
                    }
                }
                board
            },
        )
    }

    proptest! {
        #[test]
        fn rotation_never_leaves_piece_colliding(
            board in arb_board(),
            kind in prop::sample::select(PieceKind::ALL.to_vec()),
            rotation in 0u8..4,
            x in -2i32..=7,
            y in -2i32..=15,
        ) {
            let piece = Piece::with_placement(kind, PieceRotation::new(rotation), PiecePosition::new(x, y));
            let mut board = board;
            for (px, py) in piece.occupied_positions() {
                if let (Ok(px), Ok(py)) = (usize::try_from(px), usize::try_from(py))
                    && px < Board::WIDTH
                    && py < Board::HEIGHT
                {
                    board.set(px, py, Block::Empty);
                }
            }
            let mut session = session();
            session.board = board;
            prop_assume!(session.set_falling_piece(piece).is_ok());

            let before = *session.falling_piece();
            match session.try_rotate() {
                Ok(()) => {
                    prop_assert!(!session.collides(0, 0, None));
                    prop_assert_eq!(session.falling_piece(), &before.rotated());
                }
                Err(PieceCollisionError) => prop_assert_eq!(session.falling_piece(), &before),
            }
        }
    }
}
