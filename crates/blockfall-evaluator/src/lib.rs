//! Board evaluation and placement planning for autoplay.
//!
//! The crate is layered the same way the search runs:
//!
//! ```text
//! Placement Planning (choose a target for the falling piece)
//!     ↓ uses
//! Placement Evaluation (score the board a candidate leaves)
//!     ↓ uses
//! Board Analysis (lazily computed board metrics)
//! ```
//!
//! - [`board_analysis`] - Column heights, holes, bumpiness and the other
//!   metrics, each computed on first use
//! - [`placement_evaluator`] - The [`PlacementEvaluator`](placement_evaluator::PlacementEvaluator)
//!   trait and the fixed [`HeuristicEvaluator`](placement_evaluator::HeuristicEvaluator)
//! - [`placement_planner`] - [`GreedyPlanner`](placement_planner::GreedyPlanner),
//!   the exhaustive one-ply search plugged into a session as its
//!   [`PlacementPlanner`](blockfall_engine::PlacementPlanner)
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GameSession};
//! use blockfall_evaluator::placement_planner::GreedyPlanner;
//!
//! let mut session = GameSession::new(Box::new(GreedyPlanner::default()));
//! session.handle_command(Command::ToggleAutoplay);
//! assert!(session.autoplay_target().is_some());
//! ```
//!
//! There is no lookahead beyond the current piece and the weights are fixed.

pub mod board_analysis;
pub mod placement_evaluator;
pub mod placement_planner;
