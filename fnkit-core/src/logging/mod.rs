#[cfg(any(test, feature = "test-support"))]
pub mod capture;
mod level;
mod logger;
mod timestamp;

pub use level::LogLevel;
pub use logger::ContextLogger;

use crate::config::ToolkitConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal};
use timestamp::UnixSeconds;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// How log lines are rendered and where the correlation id goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Deployed: one JSON object per line, correlation id as a field.
    Structured,
    /// Local run: human-readable lines, correlation id inlined in the message.
    #[default]
    Console,
}

impl LogMode {
    pub fn default_filter(self) -> &'static str {
        match self {
            LogMode::Structured => "info",
            LogMode::Console => "debug",
        }
    }
}

/// Install the global subscriber for the configured mode.
///
/// - Structured: JSON, event fields flattened to the top level, unix-second timestamps
/// - Console: compact text, colored when stderr is a terminal
///
/// Log lines always go to stderr so stdout stays free for program output.
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: &ToolkitConfig) -> anyhow::Result<()> {
    build_subscriber(config, io::stderr)?
        .try_init()
        .map_err(|e| anyhow::anyhow!(e).context("failed to install log subscriber"))
}

pub(crate) fn build_subscriber<W>(
    config: &ToolkitConfig,
    writer: W,
) -> anyhow::Result<Box<dyn Subscriber + Send + Sync>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter '{}'", config.log_filter))?;

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_mode {
        LogMode::Structured => Box::new(
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_timer(UnixSeconds)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish(),
        ),
        LogMode::Console => Box::new(
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_target(false)
                .with_ansi(io::stderr().is_terminal())
                .finish(),
        ),
    };

    Ok(subscriber)
}
