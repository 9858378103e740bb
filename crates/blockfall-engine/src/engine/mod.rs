//! Game engine logic and state management.
//!
//! This module composes the core data structures into playable game logic:
//!
//! - [`GameSession`] - The state machine: falling piece, gravity, locking,
//!   scoring, game over, and autoplay stepping
//! - [`GameStats`] - Score, level, cleared lines, and locked piece count
//! - [`PieceGenerator`] - Uniform random piece kinds from a seeded stream
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`PlacementPlanner`] - Seam through which autoplay obtains target placements
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] with a planner (and optionally a seed)
//! 2. Feed discrete [`Command`]s from the input layer
//! 3. Advance time with [`GameSession::tick`] once per frame
//! 4. Gravity moves the piece down; when it cannot move it locks, full rows
//!    clear, and the next piece spawns
//! 5. Repeat until a fresh piece collides at its spawn anchor
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Board, Command, GameSession, PieceKind, Placement, PlacementPlanner};
//!
//! #[derive(Debug)]
//! struct StayPut;
//!
//! impl PlacementPlanner for StayPut {
//!     fn plan(&self, _board: &Board, _kind: PieceKind) -> Option<Placement> {
//!         None
//!     }
//! }
//!
//! let mut session = GameSession::new(Box::new(StayPut));
//! session.handle_command(Command::MoveLeft);
//! session.handle_command(Command::HardDrop);
//! session.tick(Duration::from_millis(16));
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{autoplay::*, game_session::*, game_stats::*, piece_generator::*};

mod autoplay;
mod game_session;
mod game_stats;
mod piece_generator;
