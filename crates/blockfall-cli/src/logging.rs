use std::{fs::File, path::Path, sync::Arc};

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

/// Maps `-v` occurrences to a level, starting from WARN.
pub(crate) fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber writing to `log_file`.
///
/// The terminal belongs to the TUI, so nothing is installed without a file.
pub(crate) fn init(log_file: Option<&Path>, verbose: u8) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .with(level_filter(verbose))
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(())
}
