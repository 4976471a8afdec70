// ABOUTME: Token maintenance commands for codegrant-cli
// ABOUTME: Purges expired tokens together with their client associations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use codegrant_server::{
    config::ServerConfig,
    database::{ClientTokenRepository, Database, SqliteClientTokenRepository},
    errors::AppResult,
    tokens::{SqliteTokenService, TokenService},
};
use tracing::info;

type Result<T> = AppResult<T>;

/// Delete expired tokens and their association rows in one transaction
pub async fn purge(database: &Database, config: &ServerConfig) -> Result<()> {
    let tokens = SqliteTokenService::new(&config.oauth2);
    let client_tokens = SqliteClientTokenRepository;

    let mut guard = database.begin().await?;
    let purged = tokens.purge_expired(guard.executor()?).await?;
    for token_id in &purged {
        client_tokens.delete(guard.executor()?, *token_id).await?;
    }
    guard.commit().await?;

    info!(count = purged.len(), "Purged expired tokens");
    println!("Purged {} expired token(s)", purged.len());
    Ok(())
}
