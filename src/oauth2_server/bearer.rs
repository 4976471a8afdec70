// ABOUTME: Bearer token authorizer for resource requests carrying issued access tokens
// ABOUTME: Resolves the Authorization header to the owning user and client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use codegrant_core::models::{OAuth2Client, TokenType};
use serde::Serialize;
use tracing::debug;

use crate::constants::oauth2;
use crate::errors::AppResult;
use crate::resources::ServerResources;

/// Result of checking a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BearerAuthorization {
    /// Whether the token grants access
    pub is_authorized: bool,
    /// Resource owner the token was issued for
    pub user_id: Option<i64>,
    /// Public identifier of the client holding the token
    pub client_id: Option<String>,
}

impl BearerAuthorization {
    /// Result for a missing, malformed, unknown, or expired token
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            is_authorized: false,
            user_id: None,
            client_id: None,
        }
    }
}

/// Checks `Authorization: Bearer <token>` headers against issued access tokens
pub struct BearerAuthorizer {
    resources: Arc<ServerResources>,
}

impl BearerAuthorizer {
    /// Create the authorizer over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Authorize a request from its headers
    ///
    /// Only access tokens owned by an active client authorize; authorization
    /// codes presented as bearer tokens are refused.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lookup fails; every other problem is a
    /// denied result
    pub async fn authorize(&self, headers: &HeaderMap) -> AppResult<BearerAuthorization> {
        let Some(token) = extract_bearer(headers) else {
            return Ok(BearerAuthorization::denied());
        };

        let resources = &self.resources;
        let mut conn = resources.database.pool().acquire().await?;

        let Some(record) = resources
            .tokens
            .read(&mut conn, token)
            .await?
            .filter(|record| record.token_type == TokenType::Access)
        else {
            debug!("Bearer token unknown, expired, or not an access token");
            return Ok(BearerAuthorization::denied());
        };

        let Some(link) = resources
            .client_tokens
            .read_by_token(&mut conn, record.id)
            .await?
        else {
            debug!(token_id = record.id, "Access token has no owning client");
            return Ok(BearerAuthorization::denied());
        };

        let client = resources
            .clients
            .read_by_id(&mut conn, link.client_ref)
            .await?
            .filter(OAuth2Client::is_active);
        let Some(client) = client else {
            debug!(token_id = record.id, "Access token owner is missing or inactive");
            return Ok(BearerAuthorization::denied());
        };

        Ok(BearerAuthorization {
            is_authorized: true,
            user_id: Some(record.user_id),
            client_id: Some(client.client_id),
        })
    }
}

/// Token from an `Authorization: Bearer` header; the scheme is case-insensitive
#[must_use]
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let prefix_len = oauth2::BEARER_PREFIX.len();
    if value.len() <= prefix_len
        || !value.is_char_boundary(prefix_len)
        || !value[..prefix_len].eq_ignore_ascii_case(oauth2::BEARER_PREFIX)
    {
        return None;
    }
    let token = value[prefix_len..].trim();
    (!token.is_empty()).then_some(token)
}
