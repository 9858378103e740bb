use std::io;

use anyhow::Context as _;
use blockfall_engine::PieceSeed;

use self::app::PlayApp;
use crate::tui::Tui;

mod app;
mod keymap;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Start with autoplay enabled
    #[clap(long)]
    autoplay: bool,
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Frames per second of the game loop
    #[clap(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..=240))]
    fps: u16,
    /// Show where the falling piece will land
    #[clap(long)]
    ghost: bool,
    /// Print the final session summary as JSON after exiting
    #[clap(long)]
    summary: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            autoplay: false,
            seed: None,
            fps: 60,
            ghost: false,
            summary: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut app = PlayApp::new(arg);
    Tui::new(arg.fps).run(&mut app)?;

    if arg.summary {
        let summary = app.session().summary();
        serde_json::to_writer_pretty(io::stdout().lock(), &summary)
            .context("failed to write session summary")?;
        println!();
    }
    Ok(())
}
