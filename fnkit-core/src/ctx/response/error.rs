use thiserror::Error;

/// Failure to produce or deliver a response.
///
/// There is nothing left to tell the client once this happens, so handlers
/// propagate it with `?` and let the host runtime decide between a bare 500
/// and dropping the connection.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Could not send response to user: {0}")]
    Send(#[source] std::io::Error),

    #[error("Could not serialize response: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid content type {0:?}")]
    InvalidContentType(String),
}
