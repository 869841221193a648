use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log format '{value}' in {var} (expected 'json' or 'console')")]
    InvalidLogFormat { var: &'static str, value: String },

    #[error("invalid body size limit '{value}' in {var}: {source}")]
    InvalidBodyLimit {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
