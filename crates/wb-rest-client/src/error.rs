// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the REST/WebSocket client

use thiserror::Error;
use wb_api_contract::ApiError;

pub type RestClientResult<T> = Result<T, RestClientError>;

/// Failures raised by the transport layer.
///
/// `Api` carries a structured failure the server actually produced;
/// every other variant is a local or transport problem that the rest of
/// the system treats as `ErrorCode::Network`.
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Channel closed")]
    ChannelClosed,
}

impl RestClientError {
    /// Fold into the wire taxonomy: structured server failures pass
    /// through, everything else becomes a synthesized `network` error.
    pub fn into_api_error(self) -> ApiError {
        match self {
            RestClientError::Api(error) => error,
            other => ApiError::network(other.to_string()),
        }
    }
}
