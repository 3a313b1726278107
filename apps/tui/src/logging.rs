use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::Result;
use tracing_subscriber::{fmt, EnvFilter};

fn filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file so the alternate screen stays clean.
pub fn init_file(path: &Path, debug: bool) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    fmt()
        .with_env_filter(filter(debug))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install logger: {e}"))
}

/// Headless runs print their report on stdout, so logs go to stderr.
pub fn init_stderr(debug: bool) -> Result<()> {
    fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install logger: {e}"))
}
