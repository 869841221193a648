use serde::{Deserialize, Serialize};

/// Body of every 200 response written through `write_json`/`write_ok`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<T> {
    pub correlation_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Body of every error response. The underlying cause is only logged, never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub correlation_id: String,

    pub error_code: u16,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}
