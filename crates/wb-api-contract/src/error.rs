// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every workspace API operation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error codes, serialized as the server sends them.
///
/// `Network` is never produced by the server; the client synthesizes it
/// when the underlying call cannot reach the service at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthenticated,
    Unauthorized,
    InvalidCredentials,
    BadRequest,
    BadParameter,
    NotFound,
    Quotas,
    #[serde(rename = "server_error")]
    Server,
    Network,
}

/// One field-scoped validation failure inside a `bad_parameter` error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterIssue {
    pub name: String,
    pub issue: String,
}

/// Structured failure returned by any workspace API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {error}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<ParameterIssue>,
}

impl ApiError {
    /// Synthesize a transport-level failure that never reached the server.
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Network,
            error: "Network error".to_string(),
            message: Some(detail.into()),
            parameters: Vec::new(),
        }
    }

    /// Build a `bad_parameter` failure for a single field.
    ///
    /// Used when the client can reject an input locally (e.g. an invalid
    /// rename) with the same shape the server would have returned.
    pub fn bad_parameter(name: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::BadParameter,
            error: "Invalid parameter".to_string(),
            message: None,
            parameters: vec![ParameterIssue { name: name.into(), issue: issue.into() }],
        }
    }

    /// Field-scoped failures are resolved as inline feedback next to the
    /// offending field and never reach the global error relay.
    pub fn is_field_scoped(&self) -> bool {
        self.code == ErrorCode::BadParameter && !self.parameters.is_empty()
    }

    /// Human-readable text for toast display.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.error)
    }
}

/// Errors raised while validating or parsing contract data on the
/// client side, before anything is sent.
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid entry name: {0}")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_use_wire_spelling() {
        assert_eq!(serde_json::to_string(&ErrorCode::Server).unwrap(), r#""server_error""#);
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidCredentials).unwrap(),
            r#""invalid_credentials""#
        );
        let code: ErrorCode = serde_json::from_str(r#""bad_parameter""#).unwrap();
        assert_eq!(code, ErrorCode::BadParameter);
    }

    #[test]
    fn parses_server_error_body() {
        let body = r#"{
            "code": "bad_parameter",
            "error": "Invalid parameter",
            "message": null,
            "parameters": [{"name": "path", "issue": "name already taken"}]
        }"#;
        let error: ApiError = serde_json::from_str(body).unwrap();
        assert!(error.is_field_scoped());
        assert_eq!(error.parameters[0].issue, "name already taken");
    }

    #[test]
    fn parameters_default_to_empty() {
        let body = r#"{"code": "not_found", "error": "No such file"}"#;
        let error: ApiError = serde_json::from_str(body).unwrap();
        assert!(error.parameters.is_empty());
        assert!(!error.is_field_scoped());
    }

    #[test]
    fn network_errors_are_global() {
        let error = ApiError::network("connection refused");
        assert_eq!(error.code, ErrorCode::Network);
        assert!(!error.is_field_scoped());
        assert_eq!(error.display_message(), "connection refused");
    }
}
