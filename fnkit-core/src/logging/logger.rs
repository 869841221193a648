use crate::ctx::CorrelationId;
use crate::logging::{LogLevel, LogMode};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use tracing::{debug, error, info, warn};

// ----------------------------------------------------------------------------
// Emit macro (one arm per level, tracing needs the level at compile time)
// ----------------------------------------------------------------------------

macro_rules! emit {
    ($level:expr, $($fields:tt)*) => {
        match $level {
            LogLevel::Debug => debug!($($fields)*),
            LogLevel::Info  => info!($($fields)*),
            LogLevel::Warn  => warn!($($fields)*),
            LogLevel::Error => error!($($fields)*),
        }
    };
}

/// Logger bound to a single correlation id.
///
/// In structured mode the id travels as the `correlation_id` field. In console
/// mode it is inlined as a `[id] ` prefix instead, never both.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    correlation_id: CorrelationId,
    mode: LogMode,
}

impl ContextLogger {
    pub fn new(correlation_id: CorrelationId, mode: LogMode) -> Self {
        Self {
            correlation_id,
            mode,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Emit one event. `location` is reported as the call site, so callers
    /// pass their own `Location::caller()` rather than ours.
    pub fn log(&self, level: LogLevel, location: &Location<'_>, args: fmt::Arguments<'_>) {
        let file = location.file();
        let line = location.line();

        match self.mode {
            LogMode::Structured => emit!(
                level,
                correlation_id = %self.correlation_id,
                caller.file = file,
                caller.line = line,
                "{}",
                args
            ),
            LogMode::Console => emit!(
                level,
                caller.file = file,
                caller.line = line,
                "[{}] {}",
                self.correlation_id,
                args
            ),
        }
    }

    /// Highest-severity line for failures the request cannot recover from.
    pub fn fatal(&self, location: &Location<'_>, err: &dyn StdError) {
        let file = location.file();
        let line = location.line();

        match self.mode {
            LogMode::Structured => error!(
                correlation_id = %self.correlation_id,
                fatal = true,
                caller.file = file,
                caller.line = line,
                "{}",
                err
            ),
            LogMode::Console => error!(
                fatal = true,
                caller.file = file,
                caller.line = line,
                "[{}] {}",
                self.correlation_id,
                err
            ),
        }
    }
}
