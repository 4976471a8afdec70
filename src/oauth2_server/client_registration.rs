// ABOUTME: Administrative client registration and lifecycle management
// ABOUTME: Generates client credentials and toggles client status in the Client Directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::Utc;
use codegrant_core::models::{ClientStatus, OAuth2Client};
use tracing::info;
use uuid::Uuid;

use crate::database::{ClientRepository, Database, NewClient};
use crate::errors::{AppError, AppResult};

/// OAuth 2.0 Client Registration Manager
///
/// Clients are registered out of band by operators; the protocol endpoints
/// only ever read them.
pub struct ClientRegistrationManager {
    database: Arc<Database>,
    clients: Arc<dyn ClientRepository>,
}

impl ClientRegistrationManager {
    /// Creates a new client registration manager
    #[must_use]
    pub fn new(database: Arc<Database>, clients: Arc<dyn ClientRepository>) -> Self {
        Self { database, clients }
    }

    /// Register a new active client with generated credentials
    ///
    /// The returned client carries the plaintext secret; it is the only time
    /// the caller sees it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the name or redirect URI is unusable, or a
    /// storage error if the insert fails
    pub async fn register_client(&self, name: &str, redirect_uri: &str) -> AppResult<OAuth2Client> {
        Self::validate_registration(name, redirect_uri)?;

        let new_client = NewClient {
            client_id: Self::generate_client_id(),
            client_secret: Self::generate_client_secret(),
            name: name.trim().to_owned(),
            redirect_uri: redirect_uri.trim().to_owned(),
            status: ClientStatus::Active,
            date_created: Utc::now(),
        };

        let mut conn = self.database.pool().acquire().await?;
        let client = self.clients.create(&mut conn, &new_client).await?;
        info!(client_id = %client.client_id, name = %client.name, "Registered OAuth2 client");
        Ok(client)
    }

    /// Look up a client by its public identifier
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such client exists
    pub async fn get_client(&self, client_id: &str) -> AppResult<OAuth2Client> {
        let mut conn = self.database.pool().acquire().await?;
        self.clients
            .read_by_client_id(&mut conn, client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client '{client_id}'")))
    }

    /// All registered clients, oldest first
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails
    pub async fn list_clients(&self) -> AppResult<Vec<OAuth2Client>> {
        let mut conn = self.database.pool().acquire().await?;
        self.clients.list(&mut conn).await
    }

    /// Activate or deactivate a client
    ///
    /// Deactivated clients can neither obtain codes nor exchange them, and
    /// their access tokens stop authorizing.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such client exists
    pub async fn set_status(&self, client_id: &str, status: ClientStatus) -> AppResult<()> {
        let mut conn = self.database.pool().acquire().await?;
        if !self.clients.set_status(&mut conn, client_id, status).await? {
            return Err(AppError::not_found(format!("Client '{client_id}'")));
        }
        info!(client_id = %client_id, status = %status, "Updated OAuth2 client status");
        Ok(())
    }

    fn validate_registration(name: &str, redirect_uri: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::invalid_request("Client name must not be empty"));
        }
        let redirect_uri = redirect_uri.trim();
        if redirect_uri.is_empty() {
            return Err(AppError::invalid_request("redirect_uri must not be empty"));
        }
        if redirect_uri.contains('#') {
            return Err(AppError::invalid_request(
                "redirect_uri must not contain a fragment",
            ));
        }
        if redirect_uri.chars().any(char::is_whitespace) {
            return Err(AppError::invalid_request(
                "redirect_uri must not contain whitespace",
            ));
        }
        Ok(())
    }

    fn generate_client_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn generate_client_secret() -> String {
        Uuid::new_v4().to_string()
    }
}
