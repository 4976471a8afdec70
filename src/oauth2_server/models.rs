// ABOUTME: OAuth 2.0 request, response, and page view models for the code grant
// ABOUTME: Parsing and up-front validation happen here, before any storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{fields, oauth2};
use crate::errors::{AppError, AppResult};

/// Parameter value exactly as sent; blank values count as missing
fn param(params: &HashMap<String, String>, name: &str) -> Option<String> {
    params
        .get(name)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}

/// Split a space-delimited scope parameter into entries
#[must_use]
pub fn parse_scopes(scope: Option<&str>) -> Vec<String> {
    scope
        .unwrap_or_default()
        .split(oauth2::SCOPE_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// OAuth 2.0 Authorization Request as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorizeRequest {
    /// Client identifier
    pub client_id: Option<String>,
    /// Redirect URI for response
    pub redirect_uri: Option<String>,
    /// Response type (only `code` is supported)
    pub response_type: Option<String>,
    /// Space-delimited requested scopes
    pub scope: Option<String>,
    /// Client state echoed back on redirect
    pub state: Option<String>,
}

/// Authorization request that passed parameter validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAuthorizeRequest {
    /// Client identifier
    pub client_id: String,
    /// Redirect URI for response
    pub redirect_uri: String,
    /// Requested scopes, one entry per scope
    pub scopes: Vec<String>,
    /// Client state
    pub state: String,
}

impl AuthorizeRequest {
    /// Build from query parameters
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            client_id: param(params, fields::CLIENT_ID),
            redirect_uri: param(params, fields::REDIRECT_URI),
            response_type: param(params, fields::RESPONSE_TYPE),
            scope: param(params, fields::SCOPE),
            state: param(params, fields::STATE),
        }
    }

    /// Check required parameters and the response type
    ///
    /// # Errors
    ///
    /// Returns the failure view describing why the request was rejected
    pub fn validate(self) -> Result<ValidAuthorizeRequest, AuthorizeFailure> {
        let failure = AuthorizeFailure::for_request(&self);
        match (self.client_id, self.redirect_uri, self.response_type, self.state) {
            (Some(client_id), Some(redirect_uri), Some(response_type), Some(state))
                if response_type == oauth2::RESPONSE_TYPE_CODE =>
            {
                Ok(ValidAuthorizeRequest {
                    client_id,
                    redirect_uri,
                    scopes: parse_scopes(self.scope.as_deref()),
                    state,
                })
            }
            _ => Err(failure),
        }
    }

    /// Names of the parameters that were present, for logging
    #[must_use]
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            (fields::CLIENT_ID, self.client_id.is_some()),
            (fields::REDIRECT_URI, self.redirect_uri.is_some()),
            (fields::RESPONSE_TYPE, self.response_type.is_some()),
            (fields::SCOPE, self.scope.is_some()),
            (fields::STATE, self.state.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

/// View for the authorization failure page
///
/// `is_unknown_error` is set only when neither specific cause applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizeFailure {
    /// A required parameter was missing
    pub is_missing_params: bool,
    /// `response_type` was present but not `code`
    pub is_invalid_response_type: bool,
    /// Anything else, including unknown clients
    pub is_unknown_error: bool,
}

impl AuthorizeFailure {
    /// Classify a rejected request
    #[must_use]
    pub fn for_request(request: &AuthorizeRequest) -> Self {
        let is_missing_params = request.client_id.is_none()
            || request.redirect_uri.is_none()
            || request.response_type.is_none()
            || request.state.is_none();
        let is_invalid_response_type = request
            .response_type
            .as_deref()
            .is_some_and(|response_type| response_type != oauth2::RESPONSE_TYPE_CODE);
        Self {
            is_missing_params,
            is_invalid_response_type,
            is_unknown_error: !is_missing_params && !is_invalid_response_type,
        }
    }

    /// Failure that must not reveal its cause
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            is_missing_params: false,
            is_invalid_response_type: false,
            is_unknown_error: true,
        }
    }

    /// Short machine-readable reason
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        if self.is_missing_params {
            "missing_params"
        } else if self.is_invalid_response_type {
            "invalid_response_type"
        } else {
            "unknown_error"
        }
    }
}

/// View for the authorization confirmation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizePage {
    /// Client display name
    pub client_name: String,
    /// Issued authorization code
    pub code: String,
    /// Where the user agent goes next
    pub redirect_uri: String,
    /// Requested scopes, display only
    pub scopes: Vec<String>,
    /// Client state
    pub state: String,
}

impl AuthorizePage {
    /// `redirect_uri` with `code` and `state` appended as query parameters
    #[must_use]
    pub fn redirect_url(&self) -> String {
        let separator = if self.redirect_uri.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{}={}&{}={}",
            self.redirect_uri,
            fields::CODE,
            urlencoding::encode(&self.code),
            fields::STATE,
            urlencoding::encode(&self.state)
        )
    }
}

/// OAuth 2.0 Token Request as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenRequest {
    /// Grant type (only `authorization_code` is supported)
    pub grant_type: Option<String>,
    /// Client ID
    pub client_id: Option<String>,
    /// Client secret
    pub client_secret: Option<String>,
    /// Authorization code
    pub code: Option<String>,
    /// Redirect URI used at authorization
    pub redirect_uri: Option<String>,
}

/// Token request that passed parameter validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTokenRequest {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Authorization code
    pub code: String,
    /// Redirect URI
    pub redirect_uri: String,
}

impl TokenRequest {
    /// Build from form fields
    #[must_use]
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        Self {
            grant_type: param(form, fields::GRANT_TYPE),
            client_id: param(form, fields::CLIENT_ID),
            client_secret: param(form, fields::CLIENT_SECRET),
            code: param(form, fields::CODE),
            redirect_uri: param(form, fields::REDIRECT_URI),
        }
    }

    /// Check the grant type and required fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a missing or unsupported grant type, or for
    /// any missing field
    pub fn validate(self) -> AppResult<ValidTokenRequest> {
        if self.grant_type.as_deref() != Some(oauth2::GRANT_TYPE_AUTHORIZATION_CODE) {
            return Err(AppError::invalid_request("Invalid or missing grant_type"));
        }
        match (self.client_id, self.client_secret, self.code, self.redirect_uri) {
            (Some(client_id), Some(client_secret), Some(code), Some(redirect_uri)) => {
                Ok(ValidTokenRequest {
                    client_id,
                    client_secret,
                    code,
                    redirect_uri,
                })
            }
            _ => Err(AppError::invalid_request("Missing required parameters")),
        }
    }
}

/// OAuth 2.0 Token Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}
