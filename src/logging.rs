use crate::config::LOG_FILTER_VAR;
use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Where log output goes while the program runs
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LogTarget<'a> {
    /// The terminal belongs to the calendar, so nothing is logged
    Discard,
    File(&'a Path),
    Stderr,
}

pub(crate) fn init(target: LogTarget<'_>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match target {
        LogTarget::Discard => Ok(()),
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
        }
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e)),
    }
}
