use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("{operation} failed with status {status}: {detail}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        detail: String,
    },

    #[error("Failed to decode {operation} response")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to encode download request form")]
    FormEncode(#[source] serde_json::Error),

    #[error("No access token stored; log in first")]
    MissingToken,
}
