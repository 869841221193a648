use thiserror::Error;

/// Failures while reading the inbound body. These go back to the handler,
/// which decides whether to answer with `fail`/`report_error`.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("failed to read request body: {0}")]
    Read(#[source] std::io::Error),

    #[error("request body truncated: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    #[error("request body of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("invalid content-length header '{0}'")]
    InvalidContentLength(String),

    #[error("request body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
}
