// ABOUTME: Bundled SQLite Token Service storing only SHA-256 digests of issued tokens
// ABOUTME: Generates 256-bit random tokens and hides expired tokens from lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use codegrant_core::models::{IssuedToken, TokenRecord, TokenType};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::debug;

use super::TokenService;
use crate::config::OAuth2Config;
use crate::constants::{lifetimes, storage};
use crate::errors::{AppError, AppResult};

/// Token Service over the `oauth2_tokens` table
pub struct SqliteTokenService {
    rng: SystemRandom,
    auth_code_lifetime_secs: i64,
    access_token_lifetime_secs: i64,
}

impl Default for SqliteTokenService {
    fn default() -> Self {
        Self {
            rng: SystemRandom::new(),
            auth_code_lifetime_secs: lifetimes::AUTH_CODE_LIFETIME_SECS,
            access_token_lifetime_secs: lifetimes::ACCESS_TOKEN_LIFETIME_SECS,
        }
    }
}

impl SqliteTokenService {
    /// Token service using the configured per-type lifetimes
    #[must_use]
    pub fn new(config: &OAuth2Config) -> Self {
        Self {
            rng: SystemRandom::new(),
            auth_code_lifetime_secs: config.auth_code_lifetime_secs,
            access_token_lifetime_secs: config.access_token_lifetime_secs,
        }
    }

    const fn default_lifetime(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Authorization => self.auth_code_lifetime_secs,
            TokenType::Access | TokenType::Refresh => self.access_token_lifetime_secs,
        }
    }

    fn generate_token(&self) -> AppResult<String> {
        let mut bytes = [0u8; storage::TOKEN_BYTES];
        self.rng.fill(&mut bytes).map_err(|_| {
            tracing::error!("CRITICAL: SystemRandom failed - cannot generate token");
            AppError::internal("Failed to generate secure random token")
        })?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }
}

/// Hex SHA-256 digest; the raw token value is never stored
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn row_to_record(row: &SqliteRow) -> AppResult<TokenRecord> {
    let token_type: String = row.try_get("token_type")?;
    Ok(TokenRecord {
        id: row.try_get("id")?,
        token_type: token_type.parse().map_err(AppError::internal)?,
        user_id: row.try_get("user_ref")?,
        date_created: row.try_get("date_created")?,
        date_expired: row.try_get("date_expired")?,
    })
}

#[async_trait]
impl TokenService for SqliteTokenService {
    async fn create(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        token_type: TokenType,
        lifetime_secs: Option<i64>,
    ) -> AppResult<IssuedToken> {
        let lifetime = lifetime_secs.unwrap_or_else(|| self.default_lifetime(token_type));
        if lifetime <= 0 {
            return Err(AppError::internal(format!(
                "Token lifetime must be positive, got {lifetime}"
            )));
        }

        let value = self.generate_token()?;
        let date_created = Utc::now();
        let date_expired = date_created + Duration::seconds(lifetime);

        let result = sqlx::query(
            r"
            INSERT INTO oauth2_tokens (token_hash, token_type, user_ref, date_created, date_expired)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(hash_token(&value))
        .bind(token_type.as_str())
        .bind(user_id)
        .bind(date_created)
        .bind(date_expired)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        debug!(token_id = id, token_type = %token_type, user_id = user_id, "Token created");

        Ok(IssuedToken {
            value,
            record: TokenRecord {
                id,
                token_type,
                user_id,
                date_created,
                date_expired,
            },
        })
    }

    async fn read(
        &self,
        conn: &mut SqliteConnection,
        token: &str,
    ) -> AppResult<Option<TokenRecord>> {
        if token.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query(
            r"
            SELECT id, token_type, user_ref, date_created, date_expired
            FROM oauth2_tokens
            WHERE token_hash = ?
            ",
        )
        .bind(hash_token(token))
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record = row_to_record(&row)?;
        if record.is_expired_at(Utc::now()) {
            debug!(token_id = record.id, "Expired token presented");
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM oauth2_tokens WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, conn: &mut SqliteConnection) -> AppResult<Vec<i64>> {
        let expired: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM oauth2_tokens WHERE julianday(date_expired) <= julianday(?) ORDER BY id",
        )
        .bind(Utc::now())
        .fetch_all(&mut *conn)
        .await?;

        for id in &expired {
            sqlx::query("DELETE FROM oauth2_tokens WHERE id = ?")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        debug!(purged = expired.len(), "Expired tokens purged");
        Ok(expired)
    }
}
