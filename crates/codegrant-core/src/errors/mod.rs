// ABOUTME: Unified error handling for the authorization server with protocol-aware error codes
// ABOUTME: Maps every failure to an HTTP status and an RFC 6749 error name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every fallible operation in the server returns [`AppResult`]. An [`AppError`]
//! carries an [`ErrorCode`] that decides the HTTP status and the RFC 6749 error
//! name, a human-readable message that is safe to show to the caller, and an
//! optional source error that is only ever logged.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "http-response")]
mod http_response;

/// Standard error codes used throughout the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    /// Missing or malformed request parameters
    InvalidRequest,
    /// `response_type` other than `code`
    UnsupportedResponseType,
    /// Client identifier is not registered (surfaced like `InvalidRequest`)
    UnknownClient,
    /// Authorization code not found, wrong type, expired or already consumed
    InvalidGrant,
    /// Client id/secret mismatch or inactive client
    InvalidClientCredentials,
    /// Storage failure during a multi-step write, fully rolled back
    TransactionFailure,
    /// HTTP method not supported on this route
    MethodNotAllowed,
    /// Requested record does not exist
    ResourceNotFound,
    /// Configuration value missing or invalid
    ConfigError,
    /// Any other internal failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidRequest
            | Self::UnsupportedResponseType
            | Self::UnknownClient
            | Self::InvalidGrant => 400,
            Self::InvalidClientCredentials => 401,
            Self::ResourceNotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::TransactionFailure | Self::ConfigError | Self::InternalError => 500,
        }
    }

    /// RFC 6749 error name used in JSON error bodies
    #[must_use]
    pub const fn oauth_error(self) -> &'static str {
        match self {
            Self::InvalidRequest | Self::UnknownClient | Self::MethodNotAllowed => {
                "invalid_request"
            }
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidClientCredentials => "invalid_client",
            Self::ResourceNotFound => "not_found",
            Self::TransactionFailure | Self::ConfigError | Self::InternalError => "server_error",
        }
    }

    /// User-facing description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request is missing a required parameter",
            Self::UnsupportedResponseType => "The response type is not supported",
            Self::UnknownClient => "The request could not be processed",
            Self::InvalidGrant => "The authorization grant is invalid",
            Self::InvalidClientCredentials => "Client authentication failed",
            Self::TransactionFailure => "Storage transaction failed",
            Self::MethodNotAllowed => "The HTTP method is not allowed on this route",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether this error is a server-side failure (never caused by the caller)
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the server
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message, safe to return to the caller
    pub message: String,
    /// Underlying cause, logged but never returned to the caller
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Storage failure caused by lock contention, which may succeed if retried
    #[must_use]
    pub fn is_lock_contention(&self) -> bool {
        self.code == ErrorCode::TransactionFailure
            && self
                .source
                .as_ref()
                .is_some_and(|source| is_contention_detail(&source.to_string()))
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing or malformed parameters
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Invalid authorization grant
    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidGrant, message)
    }

    /// Client credentials did not verify
    #[must_use]
    pub fn invalid_client_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidClientCredentials,
            "Invalid client credentials",
        )
    }

    /// Storage failure inside a transaction
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransactionFailure, message)
    }

    /// HTTP method not allowed
    pub fn method_not_allowed(method: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::MethodNotAllowed,
            format!("Method {method} is not allowed"),
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body returned by the token endpoint (RFC 6749 Section 5.2)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuth2ErrorBody {
    /// RFC 6749 error name
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl From<&AppError> for OAuth2ErrorBody {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.code.oauth_error().to_owned(),
            error_description: Some(error.message.clone()),
        }
    }
}

/// Driver error text reporting a locked, busy, or timed-out store
fn is_contention_detail(detail: &str) -> bool {
    let detail = detail.to_lowercase();
    if detail.contains("constraint") {
        return false;
    }
    detail.contains("locked")
        || detail.contains("busy")
        || detail.contains("timeout")
        || detail.contains("timed out")
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let error = Self::transaction("Storage operation failed").with_source(error);
        if error.is_lock_contention() {
            tracing::debug!(error = ?error.source, "Database lock contention");
        } else {
            tracing::error!(error = ?error.source, "Database operation failed");
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Cause(&'static str);

    impl fmt::Display for Cause {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Cause {}

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidRequest.http_status(), 400);
        assert_eq!(ErrorCode::UnsupportedResponseType.http_status(), 400);
        assert_eq!(ErrorCode::UnknownClient.http_status(), 400);
        assert_eq!(ErrorCode::InvalidGrant.http_status(), 400);
        assert_eq!(ErrorCode::InvalidClientCredentials.http_status(), 401);
        assert_eq!(ErrorCode::MethodNotAllowed.http_status(), 405);
        assert_eq!(ErrorCode::TransactionFailure.http_status(), 500);
    }

    #[test]
    fn test_unknown_client_looks_like_invalid_request() {
        assert_eq!(
            ErrorCode::UnknownClient.oauth_error(),
            ErrorCode::InvalidRequest.oauth_error()
        );
        assert_eq!(
            ErrorCode::UnknownClient.http_status(),
            ErrorCode::InvalidRequest.http_status()
        );
    }

    #[test]
    fn test_lock_contention_classification() {
        let contended = |detail: &'static str| {
            AppError::transaction("Storage operation failed").with_source(Cause(detail))
        };

        assert!(contended("database is locked").is_lock_contention());
        assert!(contended("database is busy").is_lock_contention());
        assert!(contended("pool timed out while waiting for an open connection").is_lock_contention());
        assert!(!contended("UNIQUE constraint failed: oauth2_clients.client_id").is_lock_contention());
        assert!(!AppError::transaction("no cause").is_lock_contention());
        assert!(!AppError::invalid_grant("gone")
            .with_source(Cause("database is locked"))
            .is_lock_contention());
    }

    #[test]
    fn test_error_body_hides_source() {
        let error = AppError::transaction("Storage operation failed")
            .with_source(fmt::Error);
        let body = OAuth2ErrorBody::from(&error);

        assert_eq!(body.error, "server_error");
        assert_eq!(
            body.error_description.as_deref(),
            Some("Storage operation failed")
        );
        assert!(error.source.is_some());
    }

    #[test]
    fn test_error_body_serialization() {
        let body = OAuth2ErrorBody::from(&AppError::invalid_client_credentials());
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains("\"error\":\"invalid_client\""));
        assert!(json.contains("Invalid client credentials"));
    }
}
