//! Placement evaluation: scoring a hypothetical board after a piece locks.
//!
//! The planner locks each candidate onto a scratch board, wraps it in a
//! [`BoardAnalysis`], and asks a [`PlacementEvaluator`] for a score. Higher
//! is better. Scores are only compared against each other, so their absolute
//! scale carries no meaning.
//!
//! # Heuristic
//!
//! [`HeuristicEvaluator`] is a fixed linear heuristic over board metrics.
//! Rows are scored *before* any line clear, so a placement that completes a
//! row is rewarded through [`BoardAnalysis::complete_lines`].
//!
//! | Term | Contribution |
//! |---|---|
//! | max height tier | −1000 above 18, −50/row above 15, −10/row above 12 |
//! | aggregate height | −0.6 per cell of column height |
//! | complete lines | +10 per line |
//! | holes | −5 per hole |
//! | bumpiness | −0.8 per unit |
//! | low board bonus | +5 when max height ≤ 8 |
//! | flat surface bonus | +3 when bumpiness ≤ 3 |
//! | total tiles | −0.05 per occupied cell |
//! | near-complete rows | +1 per row with ≥ 9 cells, only when max height ≤ 15 |
//! | empty columns | −1 per empty column when max height > 5 |
//!
//! # Example
//!
//! ```
//! use blockfall_engine::Board;
//! use blockfall_evaluator::{
//!     board_analysis::BoardAnalysis,
//!     placement_evaluator::{HeuristicEvaluator, PlacementEvaluator as _},
//! };
//!
//! let analysis = BoardAnalysis::from_board(Board::EMPTY);
//! // Only the low-board and flat-surface bonuses apply.
//! assert_eq!(HeuristicEvaluator.evaluate_placement(&analysis), 8.0);
//! ```

use std::fmt;

use crate::board_analysis::BoardAnalysis;

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Scores the board left by a placement (higher is better).
    fn evaluate_placement(&self, analysis: &BoardAnalysis) -> f64;
}

/// The fixed, hand-tuned board heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

const AGGREGATE_HEIGHT_WEIGHT: f64 = 0.6;
const COMPLETE_LINE_BONUS: f64 = 10.0;
const HOLE_WEIGHT: f64 = 5.0;
const BUMPINESS_WEIGHT: f64 = 0.8;
const LOW_BOARD_BONUS: f64 = 5.0;
const FLAT_SURFACE_BONUS: f64 = 3.0;
const TILE_WEIGHT: f64 = 0.05;
const NEAR_COMPLETE_LINE_BONUS: f64 = 1.0;
const EMPTY_COLUMN_PENALTY: f64 = 1.0;

const LOW_BOARD_MAX_HEIGHT: u8 = 8;
const FLAT_SURFACE_MAX_BUMPINESS: u32 = 3;
const NEAR_COMPLETE_MAX_HEIGHT: u8 = 15;
const EMPTY_COLUMN_MIN_HEIGHT: u8 = 5;

fn height_tier_penalty(max_height: u8) -> f64 {
    match max_height {
        19.. => 1000.0,
        16..=18 => f64::from(max_height - 15) * 50.0,
        13..=15 => f64::from(max_height - 12) * 10.0,
        _ => 0.0,
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    fn evaluate_placement(&self, analysis: &BoardAnalysis) -> f64 {
        let max_height = analysis.max_height();
        let bumpiness = analysis.bumpiness();

        let mut score = -height_tier_penalty(max_height);
        score -= f64::from(analysis.aggregate_height()) * AGGREGATE_HEIGHT_WEIGHT;
        score += f64::from(analysis.complete_lines()) * COMPLETE_LINE_BONUS;
        score -= f64::from(analysis.num_holes()) * HOLE_WEIGHT;
        score -= f64::from(bumpiness) * BUMPINESS_WEIGHT;
        if max_height <= LOW_BOARD_MAX_HEIGHT {
            score += LOW_BOARD_BONUS;
        }
        if bumpiness <= FLAT_SURFACE_MAX_BUMPINESS {
            score += FLAT_SURFACE_BONUS;
        }
        score -= f64::from(analysis.total_tiles()) * TILE_WEIGHT;
        if max_height <= NEAR_COMPLETE_MAX_HEIGHT {
            score += f64::from(analysis.near_complete_lines()) * NEAR_COMPLETE_LINE_BONUS;
        }
        if max_height > EMPTY_COLUMN_MIN_HEIGHT {
            score -= f64::from(analysis.empty_columns()) * EMPTY_COLUMN_PENALTY;
        }
        score
    }
}
