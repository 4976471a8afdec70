// ABOUTME: Client Directory repository for registered OAuth 2.0 clients
// ABOUTME: Typed lookups by public client id and internal id, plus administrative writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use codegrant_core::models::{ClientStatus, OAuth2Client};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::errors::{AppError, AppResult};

/// Fields of a client about to be registered
#[derive(Debug, Clone)]
pub struct NewClient {
    /// Public client identifier
    pub client_id: String,
    /// Shared secret
    pub client_secret: String,
    /// Display name
    pub name: String,
    /// Registered redirect URI
    pub redirect_uri: String,
    /// Initial status
    pub status: ClientStatus,
    /// Registration time
    pub date_created: DateTime<Utc>,
}

/// Client Directory
///
/// Read-only from the protocol's point of view; `create` and `set_status`
/// are used by administrative tooling. Every method runs on the caller's
/// connection so reads can share the endpoint's transaction.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Look up a client by its public identifier
    async fn read_by_client_id(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
    ) -> AppResult<Option<OAuth2Client>>;

    /// Look up a client by its internal id
    async fn read_by_id(&self, conn: &mut SqliteConnection, id: i64)
        -> AppResult<Option<OAuth2Client>>;

    /// Register a client; the public identifier must be unused
    async fn create(&self, conn: &mut SqliteConnection, client: &NewClient)
        -> AppResult<OAuth2Client>;

    /// All registered clients, oldest first
    async fn list(&self, conn: &mut SqliteConnection) -> AppResult<Vec<OAuth2Client>>;

    /// Change a client's status; returns false if the client does not exist
    async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
        status: ClientStatus,
    ) -> AppResult<bool>;
}

/// `SQLite` implementation over the `oauth2_clients` table
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteClientRepository;

const SELECT_CLIENT: &str = "SELECT id, client_id, client_secret, name, redirect_uri, status, date_created FROM oauth2_clients";

fn row_to_client(row: &SqliteRow) -> AppResult<OAuth2Client> {
    let status: String = row.try_get("status")?;
    Ok(OAuth2Client {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        client_secret: row.try_get("client_secret")?,
        name: row.try_get("name")?,
        redirect_uri: row.try_get("redirect_uri")?,
        status: status.parse().map_err(AppError::internal)?,
        date_created: row.try_get("date_created")?,
    })
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn read_by_client_id(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
    ) -> AppResult<Option<OAuth2Client>> {
        let row = sqlx::query(&format!("{SELECT_CLIENT} WHERE client_id = ?"))
            .bind(client_id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(row_to_client).transpose()
    }

    async fn read_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
    ) -> AppResult<Option<OAuth2Client>> {
        let row = sqlx::query(&format!("{SELECT_CLIENT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(row_to_client).transpose()
    }

    async fn create(
        &self,
        conn: &mut SqliteConnection,
        client: &NewClient,
    ) -> AppResult<OAuth2Client> {
        let result = sqlx::query(
            r"
            INSERT INTO oauth2_clients (client_id, client_secret, name, redirect_uri, status, date_created)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&client.client_id)
        .bind(&client.client_secret)
        .bind(&client.name)
        .bind(&client.redirect_uri)
        .bind(client.status.as_str())
        .bind(client.date_created)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::invalid_request(format!(
                    "Client id '{}' is already registered",
                    client.client_id
                ))
            }
            other => AppError::from(other),
        })?;

        Ok(OAuth2Client {
            id: result.last_insert_rowid(),
            client_id: client.client_id.clone(), // Safe: owned copy for the returned record
            client_secret: client.client_secret.clone(), // Safe: owned copy for the returned record
            name: client.name.clone(),           // Safe: owned copy for the returned record
            redirect_uri: client.redirect_uri.clone(), // Safe: owned copy for the returned record
            status: client.status,
            date_created: client.date_created,
        })
    }

    async fn list(&self, conn: &mut SqliteConnection) -> AppResult<Vec<OAuth2Client>> {
        let rows = sqlx::query(&format!("{SELECT_CLIENT} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await?;
        rows.iter().map(row_to_client).collect()
    }

    async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
        status: ClientStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE oauth2_clients SET status = ? WHERE client_id = ?")
            .bind(status.as_str())
            .bind(client_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
