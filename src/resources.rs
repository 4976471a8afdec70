// ABOUTME: Server resources bundle wiring storage, token service, host adapter, and renderer
// ABOUTME: Collaborators are passed in explicitly and shared behind Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Everything the endpoints need, built once at startup. The bundled SQLite
//! repositories and token service are used unless replaced with the `with_*`
//! methods before the resources are shared.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::{
    ClientRepository, ClientTokenRepository, Database, SqliteClientRepository,
    SqliteClientTokenRepository,
};
use crate::errors::AppResult;
use crate::host::{HeaderHostAdapter, HostAdapter};
use crate::render::{EmbeddedPageRenderer, PageRenderer};
use crate::tokens::{SqliteTokenService, TokenService};

/// Shared collaborators for the authorization and token endpoints
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Connection pool and transaction entry point
    pub database: Arc<Database>,
    /// Client Directory
    pub clients: Arc<dyn ClientRepository>,
    /// Client-Token Association Store
    pub client_tokens: Arc<dyn ClientTokenRepository>,
    /// Token Service
    pub tokens: Arc<dyn TokenService>,
    /// Host application adapter
    pub host: Arc<dyn HostAdapter>,
    /// Page renderer
    pub renderer: Arc<dyn PageRenderer>,
}

impl ServerResources {
    /// Resources with the bundled repositories, token service, and renderer
    #[must_use]
    pub fn new(config: ServerConfig, database: Database, host: Arc<dyn HostAdapter>) -> Self {
        let tokens = Arc::new(SqliteTokenService::new(&config.oauth2));
        Self {
            config: Arc::new(config),
            database: Arc::new(database),
            clients: Arc::new(SqliteClientRepository),
            client_tokens: Arc::new(SqliteClientTokenRepository),
            tokens,
            host,
            renderer: Arc::new(EmbeddedPageRenderer),
        }
    }

    /// Open the configured database and use the header-trusting host adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the host adapter
    /// configuration is invalid
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database_url).await?;
        let host = Arc::new(HeaderHostAdapter::new(&config.host_adapter)?);
        Ok(Self::new(config, database, host))
    }

    /// Replace the token service
    #[must_use]
    pub fn with_token_service(mut self, tokens: Arc<dyn TokenService>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Replace the page renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the host adapter
    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn HostAdapter>) -> Self {
        self.host = host;
        self
    }
}
