use std::{io, time::Duration};

use anyhow::Context as _;
use blockfall_engine::{Command, GameSession, PieceSeed, SessionSummary};
use blockfall_evaluator::placement_planner::GreedyPlanner;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Stop after this many pieces have locked
    #[clap(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Simulated duration of one frame, in milliseconds
    #[clap(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    frame_millis: u64,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let summary = simulate(arg.seed, arg.max_pieces, Duration::from_millis(arg.frame_millis));
    serde_json::to_writer_pretty(io::stdout().lock(), &summary)
        .context("failed to write session summary")?;
    println!();
    Ok(())
}

/// Runs an autoplay session on simulated time until it ends or `max_pieces` lock.
fn simulate(seed: Option<PieceSeed>, max_pieces: usize, frame: Duration) -> SessionSummary {
    let planner = Box::new(GreedyPlanner::default());
    let mut session = match seed {
        Some(seed) => GameSession::with_seed(seed, planner),
        None => GameSession::new(planner),
    };
    session.handle_command(Command::ToggleAutoplay);
    tracing::info!(seed = %session.seed(), max_pieces, ?frame, "simulation started");

    while !session.is_game_over() && session.stats().completed_pieces() < max_pieces {
        session.tick(frame);
    }

    let summary = session.summary();
    tracing::info!(
        score = summary.stats.score(),
        pieces = summary.stats.completed_pieces(),
        game_over = summary.game_over,
        "simulation finished"
    );
    summary
}
