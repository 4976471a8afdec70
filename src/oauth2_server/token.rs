// ABOUTME: Token Endpoint exchanging authorization codes for access tokens
// ABOUTME: Verifies client credentials, mints the access token, and consumes the code in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use codegrant_core::models::{ClientTokenLink, OAuth2Client, TokenType};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::models::{TokenRequest, TokenResponse, ValidTokenRequest};
use crate::constants::{oauth2, storage};
use crate::database::retry_transaction;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Token Endpoint (`POST /{token_route}`)
pub struct TokenEndpoint {
    resources: Arc<ServerResources>,
}

impl TokenEndpoint {
    /// Create the endpoint over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Exchange an authorization code for an access token
    ///
    /// The code is consumed exactly once: when two exchanges race, the loser
    /// re-runs against the committed state and sees `InvalidGrant`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a bad grant type or missing fields
    /// - `InvalidGrant` for unknown, expired, consumed, or mismatched codes
    /// - `InvalidClientCredentials` when the client does not own the code or
    ///   the secret is wrong
    /// - `TransactionFailure` if storage fails; nothing is committed
    pub async fn exchange(&self, form: &HashMap<String, String>) -> AppResult<TokenResponse> {
        let request = TokenRequest::from_form(form).validate().inspect_err(|e| {
            info!(error = %e, "Rejected token request");
        })?;

        retry_transaction(
            || self.exchange_once(&request),
            storage::MAX_TRANSACTION_RETRIES,
        )
        .await
    }

    async fn exchange_once(&self, request: &ValidTokenRequest) -> AppResult<TokenResponse> {
        let resources = &self.resources;
        let mut guard = resources.database.begin().await?;

        let code = resources
            .tokens
            .read(guard.executor()?, &request.code)
            .await?
            .filter(|record| record.token_type == TokenType::Authorization)
            .ok_or_else(|| {
                info!(client_id = %request.client_id, "Token request with unknown or expired code");
                AppError::invalid_grant("Invalid or expired authorization code")
            })?;

        let owner = match resources
            .client_tokens
            .read_by_token(guard.executor()?, code.id)
            .await?
        {
            Some(link) => {
                resources
                    .clients
                    .read_by_id(guard.executor()?, link.client_ref)
                    .await?
            }
            None => None,
        };
        let client = Self::authenticate_client(owner, request)?;

        if client.redirect_uri != request.redirect_uri {
            info!(client_id = %client.client_id, "Token request with mismatched redirect_uri");
            return Err(AppError::invalid_grant(
                "redirect_uri does not match the authorization request",
            ));
        }

        let lifetime = resources.config.oauth2.access_token_lifetime_secs;
        let access = resources
            .tokens
            .create(guard.executor()?, code.user_id, TokenType::Access, Some(lifetime))
            .await?;
        resources
            .client_tokens
            .create(
                guard.executor()?,
                ClientTokenLink {
                    client_ref: client.id,
                    token_ref: access.record.id,
                },
            )
            .await?;

        if !resources.tokens.delete(guard.executor()?, code.id).await? {
            return Err(AppError::invalid_grant(
                "Invalid or expired authorization code",
            ));
        }
        resources
            .client_tokens
            .delete(guard.executor()?, code.id)
            .await?;

        guard.commit().await?;
        info!(
            client_id = %client.client_id,
            user_id = code.user_id,
            token_id = access.record.id,
            "Access token issued"
        );

        Ok(TokenResponse {
            access_token: access.value,
            token_type: oauth2::TOKEN_TYPE_BEARER.to_owned(),
            expires_in: lifetime,
        })
    }

    /// The code's owner, if it is active and presented the right credentials
    fn authenticate_client(
        owner: Option<OAuth2Client>,
        request: &ValidTokenRequest,
    ) -> AppResult<OAuth2Client> {
        let Some(client) = owner else {
            warn!(client_id = %request.client_id, "Authorization code has no owning client");
            return Err(AppError::invalid_client_credentials());
        };

        let secret_matches: bool = client
            .client_secret
            .as_bytes()
            .ct_eq(request.client_secret.as_bytes())
            .into();
        if client.client_id != request.client_id || !secret_matches || !client.is_active() {
            warn!(
                client_id = %request.client_id,
                active = client.is_active(),
                "Client credential verification failed"
            );
            return Err(AppError::invalid_client_credentials());
        }
        Ok(client)
    }
}
