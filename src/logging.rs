//! Tracing subscriber setup.
//!
//! The terminal belongs to the editor while it runs, so detailed events go
//! to an optional log file. Without one, warnings reach stderr only in the
//! batch modes; the interactive editor drops them.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

impl<'a> LogTarget<'a> {
    /// Stderr shares the screen with the alternate-screen UI, so an
    /// interactive session without a log file logs nowhere.
    pub fn choose(debug_log: Option<&'a Path>, interactive: bool) -> Self {
        match debug_log {
            Some(path) => Self::File(path),
            None if interactive => Self::Off,
            None => Self::Stderr,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` refines the filter.
pub fn init(debug_log: Option<&Path>, interactive: bool) -> Result<()> {
    match LogTarget::choose(debug_log, interactive) {
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create debug log {}", path.display()))?;
            let filter = EnvFilter::from_default_env().add_directive("pseudopad=debug".parse()?);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow!("Failed to install logger: {err}"))?;
            tracing::info!(path = %path.display(), "debug log started");
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!("Failed to install logger: {err}"))?;
        }
        LogTarget::Off => {}
    }
    Ok(())
}
