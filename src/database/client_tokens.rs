// ABOUTME: Client-Token Association Store binding issued tokens to their owning client
// ABOUTME: One row per authorization code or access token issued through the code grant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use codegrant_core::models::ClientTokenLink;
use sqlx::{Row, SqliteConnection};

use crate::errors::{AppError, AppResult};

/// Association Store
///
/// Only the authorization and token endpoints write here. The token reference
/// is the primary key, so a token belongs to at most one client.
#[async_trait]
pub trait ClientTokenRepository: Send + Sync {
    /// Record that `link.token_ref` belongs to `link.client_ref`
    async fn create(&self, conn: &mut SqliteConnection, link: ClientTokenLink) -> AppResult<()>;

    /// Find the owner of a token
    async fn read_by_token(
        &self,
        conn: &mut SqliteConnection,
        token_ref: i64,
    ) -> AppResult<Option<ClientTokenLink>>;

    /// Remove the association of a token; returns false if none existed
    async fn delete(&self, conn: &mut SqliteConnection, token_ref: i64) -> AppResult<bool>;
}

/// `SQLite` implementation over the `oauth2_client_tokens` table
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteClientTokenRepository;

#[async_trait]
impl ClientTokenRepository for SqliteClientTokenRepository {
    async fn create(&self, conn: &mut SqliteConnection, link: ClientTokenLink) -> AppResult<()> {
        sqlx::query("INSERT INTO oauth2_client_tokens (token_ref, client_ref) VALUES (?, ?)")
            .bind(link.token_ref)
            .bind(link.client_ref)
            .execute(&mut *conn)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::internal(format!(
                        "Token {} is already associated with a client",
                        link.token_ref
                    ))
                }
                other => AppError::from(other),
            })?;
        Ok(())
    }

    async fn read_by_token(
        &self,
        conn: &mut SqliteConnection,
        token_ref: i64,
    ) -> AppResult<Option<ClientTokenLink>> {
        let row =
            sqlx::query("SELECT token_ref, client_ref FROM oauth2_client_tokens WHERE token_ref = ?")
                .bind(token_ref)
                .fetch_optional(&mut *conn)
                .await?;

        row.map(|row| -> AppResult<ClientTokenLink> {
            Ok(ClientTokenLink {
                token_ref: row.try_get("token_ref")?,
                client_ref: row.try_get("client_ref")?,
            })
        })
        .transpose()
    }

    async fn delete(&self, conn: &mut SqliteConnection, token_ref: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM oauth2_client_tokens WHERE token_ref = ?")
            .bind(token_ref)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ClientRepository, Database, NewClient, SqliteClientRepository};
    use chrono::Utc;
    use codegrant_core::models::ClientStatus;

    async fn seeded() -> (Database, i64) {
        let database = Database::new("sqlite::memory:").await.unwrap();
        let mut conn = database.pool().acquire().await.unwrap();
        let client = SqliteClientRepository
            .create(
                &mut conn,
                &NewClient {
                    client_id: "c1".to_owned(),
                    client_secret: "s1".to_owned(),
                    name: "Demo".to_owned(),
                    redirect_uri: "https://app/cb".to_owned(),
                    status: ClientStatus::Active,
                    date_created: Utc::now(),
                },
            )
            .await
            .unwrap();
        drop(conn);
        (database, client.id)
    }

    #[tokio::test]
    async fn test_link_lifecycle() {
        let (database, client_ref) = seeded().await;
        let mut conn = database.pool().acquire().await.unwrap();
        let repo = SqliteClientTokenRepository;
        let link = ClientTokenLink {
            client_ref,
            token_ref: 10,
        };

        repo.create(&mut conn, link).await.unwrap();
        assert_eq!(repo.read_by_token(&mut conn, 10).await.unwrap(), Some(link));

        assert!(repo.delete(&mut conn, 10).await.unwrap());
        assert!(!repo.delete(&mut conn, 10).await.unwrap());
        assert!(repo.read_by_token(&mut conn, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_belongs_to_one_client() {
        let (database, client_ref) = seeded().await;
        let mut conn = database.pool().acquire().await.unwrap();
        let repo = SqliteClientTokenRepository;
        let link = ClientTokenLink {
            client_ref,
            token_ref: 11,
        };

        repo.create(&mut conn, link).await.unwrap();
        assert!(repo.create(&mut conn, link).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_client_is_rejected_by_foreign_key() {
        let (database, _) = seeded().await;
        let mut conn = database.pool().acquire().await.unwrap();

        let result = SqliteClientTokenRepository
            .create(
                &mut conn,
                ClientTokenLink {
                    client_ref: 999,
                    token_ref: 12,
                },
            )
            .await;
        assert!(result.is_err());
    }
}
