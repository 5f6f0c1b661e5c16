use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that reach a handler become a plain 502 page.
impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        error!("Upstream call failed: {}", self);
        (
            StatusCode::BAD_GATEWAY,
            format!("Catalog API unavailable: {}", self),
        )
            .into_response()
    }
}
