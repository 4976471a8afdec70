// ABOUTME: Token Service interface for opaque token creation, lookup, and deletion
// ABOUTME: The protocol core depends only on this trait, never on token storage details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Token Service
//!
//! Creates, reads, and deletes opaque tokens keyed by a logical
//! [`TokenType`]. Implementations own hashing, storage, and expiry: `read`
//! never returns an expired token. Every call runs on the caller's connection
//! so token writes commit or roll back together with association rows.

mod sqlite;

pub use sqlite::SqliteTokenService;

use async_trait::async_trait;
use codegrant_core::models::{IssuedToken, TokenRecord, TokenType};
use sqlx::SqliteConnection;

use crate::errors::AppResult;

/// Opaque token lifecycle operations
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Mint a token for `user_id`
    ///
    /// `lifetime_secs` overrides the implementation's default for the type.
    async fn create(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        token_type: TokenType,
        lifetime_secs: Option<i64>,
    ) -> AppResult<IssuedToken>;

    /// Resolve a presented token value; `None` if unknown or expired
    async fn read(&self, conn: &mut SqliteConnection, token: &str)
        -> AppResult<Option<TokenRecord>>;

    /// Delete a token by id; returns false if it was already gone
    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool>;

    /// Delete every expired token and return the ids removed
    async fn purge_expired(&self, conn: &mut SqliteConnection) -> AppResult<Vec<i64>>;
}
