// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides server resources, seeded clients, request parts, and row counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `codegrant_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::Request;
use chrono::Utc;
use codegrant_server::{
    config::ServerConfig,
    database::{ClientRepository, Database, NewClient, SqliteClientRepository},
    host::HeaderHostAdapter,
    models::{ClientStatus, OAuth2Client, TokenType},
    oauth2_server::{AuthorizationEndpoint, AuthorizeOutcome},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Header the reference host adapter trusts for the logged-in user
pub const USER_HEADER: &str = "x-authenticated-user";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with_url("sqlite::memory:").await
}

/// Server resources over the given database URL with default configuration
pub async fn create_test_resources_with_url(database_url: &str) -> Arc<ServerResources> {
    init_test_logging();
    let config = ServerConfig {
        database_url: database_url.to_owned(),
        ..ServerConfig::default()
    };
    let database = Database::new(database_url)
        .await
        .expect("Failed to open test database");
    let host = Arc::new(HeaderHostAdapter::new(&config.host_adapter).unwrap());
    Arc::new(ServerResources::new(config, database, host))
}

/// Register a client with fixed credentials
pub async fn seed_client(
    resources: &ServerResources,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    status: ClientStatus,
) -> OAuth2Client {
    let mut conn = resources.database.pool().acquire().await.unwrap();
    SqliteClientRepository
        .create(
            &mut conn,
            &NewClient {
                client_id: client_id.to_owned(),
                client_secret: client_secret.to_owned(),
                name: format!("{client_id} app"),
                redirect_uri: redirect_uri.to_owned(),
                status,
                date_created: Utc::now(),
            },
        )
        .await
        .unwrap()
}

/// The `c1` / `s1` client used across the scenarios
pub async fn seed_default_client(resources: &ServerResources) -> OAuth2Client {
    seed_client(
        resources,
        "c1",
        "s1",
        "https://app/cb",
        ClientStatus::Active,
    )
    .await
}

/// Request parts for `uri`, optionally authenticated as `user_id`
pub fn request_parts(uri: &str, user_id: Option<i64>) -> Parts {
    let mut builder = Request::builder().uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(USER_HEADER, user_id.to_string());
    }
    builder.body(Body::empty()).unwrap().into_parts().0
}

/// Build a parameter map from pairs
pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// Authorization parameters for the default client
pub fn authorize_params() -> HashMap<String, String> {
    params(&[
        ("client_id", "c1"),
        ("redirect_uri", "https://app/cb"),
        ("response_type", "code"),
        ("scope", "read"),
        ("state", "xyz"),
    ])
}

/// Token request form for the default client and `code`
pub fn token_form(code: &str) -> HashMap<String, String> {
    params(&[
        ("grant_type", "authorization_code"),
        ("client_id", "c1"),
        ("client_secret", "s1"),
        ("code", code),
        ("redirect_uri", "https://app/cb"),
    ])
}

/// Pull the issued code out of the confirmation page's redirect link
pub fn extract_code(html: &str) -> String {
    let start = html.find("code=").expect("page carries no code") + "code=".len();
    html[start..]
        .split(['&', '"'])
        .next()
        .map(|code| urlencoding::decode(code).unwrap().into_owned())
        .unwrap()
}

/// Run the authorization endpoint for the default client and return the code
pub async fn issue_code(resources: &Arc<ServerResources>, user_id: i64) -> String {
    let outcome = AuthorizationEndpoint::new(Arc::clone(resources))
        .authorize(
            &request_parts("/authorize", Some(user_id)),
            &authorize_params(),
        )
        .await
        .unwrap();
    match outcome {
        AuthorizeOutcome::Issued(html) => extract_code(&html),
        other => panic!("expected an issued code, got {other:?}"),
    }
}

/// Number of rows in `table`
pub async fn count_rows(database: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(database.pool())
        .await
        .unwrap()
}

/// Number of stored tokens of one type
pub async fn count_tokens(database: &Database, token_type: TokenType) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM oauth2_tokens WHERE token_type = ?")
        .bind(token_type.as_str())
        .fetch_one(database.pool())
        .await
        .unwrap()
}

/// Move every token of one type into the past
pub async fn expire_tokens(database: &Database, token_type: TokenType) {
    sqlx::query("UPDATE oauth2_tokens SET date_expired = ? WHERE token_type = ?")
        .bind(Utc::now() - chrono::Duration::hours(1))
        .bind(token_type.as_str())
        .execute(database.pool())
        .await
        .unwrap();
}
