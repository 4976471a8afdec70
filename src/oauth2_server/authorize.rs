// ABOUTME: Authorization Endpoint issuing single-use authorization codes
// ABOUTME: Validates the request, defers login to the host, and records code ownership atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use codegrant_core::models::{ClientTokenLink, TokenType};
use tracing::info;

use super::models::{AuthorizeFailure, AuthorizePage, AuthorizeRequest, ValidAuthorizeRequest};
use crate::constants::storage;
use crate::database::retry_transaction;
use crate::errors::AppResult;
use crate::host::Locales;
use crate::resources::ServerResources;

/// Result of an authorization request
#[derive(Debug)]
pub enum AuthorizeOutcome {
    /// Code issued; confirmation page (200)
    Issued(String),
    /// Request rejected; failure page (400)
    Rejected(String),
    /// User must log in first; the host's response is returned unchanged
    LoginRequired(Response),
}

impl IntoResponse for AuthorizeOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Issued(html) => (StatusCode::OK, Html(html)).into_response(),
            Self::Rejected(html) => (StatusCode::BAD_REQUEST, Html(html)).into_response(),
            Self::LoginRequired(response) => response,
        }
    }
}

/// Authorization Endpoint (`GET /{authorize_route}`)
pub struct AuthorizationEndpoint {
    resources: Arc<ServerResources>,
}

impl AuthorizationEndpoint {
    /// Create the endpoint over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle an authorization request
    ///
    /// Parameter problems, unknown clients, inactive clients, and redirect URI
    /// mismatches all produce a failure page without touching storage writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the host adapter, storage, or rendering fails; any
    /// code minted before the failure is rolled back
    pub async fn authorize(
        &self,
        parts: &Parts,
        params: &HashMap<String, String>,
    ) -> AppResult<AuthorizeOutcome> {
        let locales = self.resources.host.locales(parts);
        let request = AuthorizeRequest::from_params(params);
        let present = request.present_fields();

        let valid = match request.validate() {
            Ok(valid) => valid,
            Err(failure) => {
                info!(
                    fields = ?present,
                    reason = failure.reason(),
                    "Rejected authorization request"
                );
                return self.reject(&failure, &locales);
            }
        };

        let status = self.resources.host.auth_status(parts).await?;
        let Some(user_id) = status.authenticated_user() else {
            info!(client_id = %valid.client_id, "Authorization requires login, forwarding to host");
            return Ok(AuthorizeOutcome::LoginRequired(
                self.resources.host.forward_to_authentication(parts),
            ));
        };

        let issued = retry_transaction(
            || self.issue_code(&valid, user_id, &locales),
            storage::MAX_TRANSACTION_RETRIES,
        )
        .await?;

        match issued {
            Some(html) => Ok(AuthorizeOutcome::Issued(html)),
            None => self.reject(&AuthorizeFailure::unknown(), &locales),
        }
    }

    /// Mint the code, link it to the client, and render, all in one transaction
    ///
    /// Returns `None` when the client cannot be used, without writing anything.
    async fn issue_code(
        &self,
        request: &ValidAuthorizeRequest,
        user_id: i64,
        locales: &Locales,
    ) -> AppResult<Option<String>> {
        let resources = &self.resources;
        let mut guard = resources.database.begin().await?;

        let client = resources
            .clients
            .read_by_client_id(guard.executor()?, &request.client_id)
            .await?;
        let Some(client) = client else {
            info!(client_id = %request.client_id, "Authorization request for unknown client");
            guard.rollback().await?;
            return Ok(None);
        };
        if !client.is_active() {
            info!(client_id = %client.client_id, "Authorization request for inactive client");
            guard.rollback().await?;
            return Ok(None);
        }
        if client.redirect_uri != request.redirect_uri {
            info!(
                client_id = %client.client_id,
                "Authorization request with unregistered redirect_uri"
            );
            guard.rollback().await?;
            return Ok(None);
        }

        let code = resources
            .tokens
            .create(
                guard.executor()?,
                user_id,
                TokenType::Authorization,
                Some(resources.config.oauth2.auth_code_lifetime_secs),
            )
            .await?;
        resources
            .client_tokens
            .create(
                guard.executor()?,
                ClientTokenLink {
                    client_ref: client.id,
                    token_ref: code.record.id,
                },
            )
            .await?;

        let page = AuthorizePage {
            client_name: client.name,
            code: code.value,
            redirect_uri: request.redirect_uri.clone(), // Safe: String ownership for page view
            scopes: request.scopes.clone(),             // Safe: Vec ownership for page view
            state: request.state.clone(),               // Safe: String ownership for page view
        };
        let html = resources.renderer.render_authorize(&page, locales)?;

        guard.commit().await?;
        info!(
            client_id = %client.client_id,
            user_id = user_id,
            token_id = code.record.id,
            "Authorization code issued"
        );
        Ok(Some(html))
    }

    fn reject(&self, failure: &AuthorizeFailure, locales: &Locales) -> AppResult<AuthorizeOutcome> {
        let html = self.resources.renderer.render_failure(failure, locales)?;
        Ok(AuthorizeOutcome::Rejected(html))
    }
}
