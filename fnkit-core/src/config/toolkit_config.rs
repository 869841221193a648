use crate::config::ConfigError;
use crate::logging::LogMode;
use serde::{Deserialize, Serialize};

/// Variables set by the serverless platforms we deploy to. The presence of any
/// one of them (with a non-empty value) means the process is not a local run.
pub const PLATFORM_ENV_VARS: &[&str] = &[
    "K_SERVICE",
    "FUNCTION_TARGET",
    "FUNCTION_NAME",
    "GCP_PROJECT",
    "AWS_LAMBDA_FUNCTION_NAME",
    "FUNCTIONS_WORKER_RUNTIME",
];

pub const LOG_FORMAT_VAR: &str = "FNKIT_LOG_FORMAT";
pub const MAX_BODY_BYTES_VAR: &str = "FNKIT_MAX_BODY_BYTES";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Process-wide settings for request contexts.
///
/// Resolved once at startup and handed to every [`crate::ctx::FunctionCtx`],
/// so nothing below this layer looks at the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawToolkitConfig")]
pub struct ToolkitConfig {
    pub log_mode: LogMode,

    /// `EnvFilter` directive string, e.g. "info" or "fnkit_core=debug".
    pub log_filter: String,

    /// Upper bound for request bodies read through the context.
    pub max_body_bytes: usize,
}

/// Deserialization shape. A missing filter follows the (possibly defaulted)
/// mode, so `{}` yields the same value as [`ToolkitConfig::default`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToolkitConfig {
    #[serde(default)]
    log_mode: LogMode,
    #[serde(default)]
    log_filter: Option<String>,
    #[serde(default = "default_max_body_bytes")]
    max_body_bytes: usize,
}

impl From<RawToolkitConfig> for ToolkitConfig {
    fn from(raw: RawToolkitConfig) -> Self {
        Self {
            log_mode: raw.log_mode,
            log_filter: raw
                .log_filter
                .unwrap_or_else(|| raw.log_mode.default_filter().to_string()),
            max_body_bytes: raw.max_body_bytes,
        }
    }
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self::for_mode(LogMode::default())
    }
}

impl ToolkitConfig {
    pub fn for_mode(log_mode: LogMode) -> Self {
        Self {
            log_mode,
            log_filter: log_mode.default_filter().to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup.
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let log_mode = match lookup(LOG_FORMAT_VAR) {
            Some(value) => parse_log_format(&value)?,
            None => detect_log_mode(&lookup),
        };

        let log_filter =
            lookup(LOG_FILTER_VAR).unwrap_or_else(|| log_mode.default_filter().to_string());

        let max_body_bytes = match lookup(MAX_BODY_BYTES_VAR) {
            Some(value) => {
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|source| ConfigError::InvalidBodyLimit {
                        var: MAX_BODY_BYTES_VAR,
                        value,
                        source,
                    })?
            }
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            log_mode,
            log_filter,
            max_body_bytes,
        })
    }
}

/// Structured output when running on a known platform, console output otherwise.
pub fn detect_log_mode<F>(lookup: F) -> LogMode
where
    F: Fn(&str) -> Option<String>,
{
    let deployed = PLATFORM_ENV_VARS
        .iter()
        .any(|name| lookup(name).is_some_and(|v| !v.is_empty()));

    if deployed {
        LogMode::Structured
    } else {
        LogMode::Console
    }
}

fn parse_log_format(value: &str) -> Result<LogMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" | "structured" => Ok(LogMode::Structured),
        "console" | "pretty" | "text" => Ok(LogMode::Console),
        _ => Err(ConfigError::InvalidLogFormat {
            var: LOG_FORMAT_VAR,
            value: value.to_string(),
        }),
    }
}
