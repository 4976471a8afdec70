// ABOUTME: Integration tests for the Token Endpoint code-for-token exchange
// ABOUTME: Covers single-use codes, credential checks, validation order, and concurrent exchanges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use codegrant_server::{
    errors::{AppResult, ErrorCode},
    models::{ClientStatus, IssuedToken, TokenRecord, TokenType},
    oauth2_server::{ClientRegistrationManager, TokenEndpoint},
    tokens::{SqliteTokenService, TokenService},
};
use common::{
    count_rows, count_tokens, create_test_resources, create_test_resources_with_url,
    expire_tokens, issue_code, seed_client, seed_default_client, token_form,
};
use sqlx::SqliteConnection;

#[tokio::test]
async fn test_code_exchange_scenario() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;
    let endpoint = TokenEndpoint::new(Arc::clone(&resources));

    let response = endpoint.exchange(&token_form(&code)).await.unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 604_800);
    assert_ne!(response.access_token, code);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 0);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 1);
    assert_eq!(count_rows(&resources.database, "oauth2_client_tokens").await, 1);

    let mut conn = resources.database.pool().acquire().await.unwrap();
    let record = resources
        .tokens
        .read(&mut conn, &response.access_token)
        .await
        .unwrap()
        .unwrap();
    drop(conn);
    assert_eq!(record.token_type, TokenType::Access);
    assert_eq!(record.user_id, 42);

    let replay = endpoint.exchange(&token_form(&code)).await.unwrap_err();
    assert_eq!(replay.code, ErrorCode::InvalidGrant);
    assert_eq!(replay.http_status(), 400);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 1);
}

#[tokio::test]
async fn test_wrong_secret_is_unauthorized_and_changes_nothing() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;

    let mut form = token_form(&code);
    form.insert("client_secret".to_owned(), "wrong".to_owned());
    let err = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&form)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidClientCredentials);
    assert_eq!(err.http_status(), 401);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 1);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 0);
    assert_eq!(count_rows(&resources.database, "oauth2_client_tokens").await, 1);

    // The code survives a failed attempt by the wrong party
    let response = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&token_form(&code))
        .await
        .unwrap();
    assert_eq!(response.token_type, "Bearer");
}

#[tokio::test]
async fn test_padded_secret_is_not_an_exact_match() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;

    let mut form = token_form(&code);
    form.insert("client_secret".to_owned(), "  s1  ".to_owned());
    let err = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&form)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidClientCredentials);
    assert_eq!(err.http_status(), 401);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 1);
}

#[tokio::test]
async fn test_code_cannot_be_redeemed_by_another_client() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    seed_client(&resources, "c2", "s2", "https://app/cb", ClientStatus::Active).await;
    let code = issue_code(&resources, 42).await;

    let mut form = token_form(&code);
    form.insert("client_id".to_owned(), "c2".to_owned());
    form.insert("client_secret".to_owned(), "s2".to_owned());
    let err = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&form)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidClientCredentials);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 1);
}

#[tokio::test]
async fn test_deactivated_client_cannot_exchange() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;

    ClientRegistrationManager::new(
        Arc::clone(&resources.database),
        Arc::clone(&resources.clients),
    )
    .set_status("c1", ClientStatus::Inactive)
    .await
    .unwrap();

    let err = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&token_form(&code))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidClientCredentials);
}

#[tokio::test]
async fn test_redirect_uri_must_match_registration() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;

    let mut form = token_form(&code);
    form.insert("redirect_uri".to_owned(), "https://evil/cb".to_owned());
    let err = TokenEndpoint::new(Arc::clone(&resources))
        .exchange(&form)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidGrant);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 1);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 0);
}

#[tokio::test]
async fn test_expired_and_unknown_codes_are_invalid_grants() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;
    expire_tokens(&resources.database, TokenType::Authorization).await;
    let endpoint = TokenEndpoint::new(Arc::clone(&resources));

    let err = endpoint.exchange(&token_form(&code)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGrant);
    assert_eq!(err.message, "Invalid or expired authorization code");

    let err = endpoint
        .exchange(&token_form("not-a-real-code"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGrant);
}

#[tokio::test]
async fn test_access_token_is_not_an_authorization_code() {
    let resources = create_test_resources().await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;
    let endpoint = TokenEndpoint::new(Arc::clone(&resources));
    let access = endpoint.exchange(&token_form(&code)).await.unwrap();

    let err = endpoint
        .exchange(&token_form(&access.access_token))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGrant);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 1);
}

/// Token service that records how often it was called
struct CountingTokenService {
    inner: SqliteTokenService,
    calls: AtomicUsize,
}

#[async_trait]
impl TokenService for CountingTokenService {
    async fn create(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        token_type: TokenType,
        lifetime_secs: Option<i64>,
    ) -> AppResult<IssuedToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .create(conn, user_id, token_type, lifetime_secs)
            .await
    }

    async fn read(&self, conn: &mut SqliteConnection, token: &str) -> AppResult<Option<TokenRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.read(conn, token).await
    }

    async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(conn, id).await
    }

    async fn purge_expired(&self, conn: &mut SqliteConnection) -> AppResult<Vec<i64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.purge_expired(conn).await
    }
}

#[tokio::test]
async fn test_invalid_request_never_reaches_storage() {
    let base = create_test_resources().await;
    let counting = Arc::new(CountingTokenService {
        inner: SqliteTokenService::default(),
        calls: AtomicUsize::new(0),
    });
    let resources = Arc::new((*base).clone().with_token_service(counting.clone()));
    let endpoint = TokenEndpoint::new(resources);

    let mut form = token_form("K");
    form.insert("grant_type".to_owned(), "password".to_owned());
    let err = endpoint.exchange(&form).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert_eq!(err.message, "Invalid or missing grant_type");

    let mut form = token_form("K");
    form.remove("client_secret");
    let err = endpoint.exchange(&form).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert_eq!(err.message, "Missing required parameters");

    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_exchanges_issue_exactly_one_token() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("grant.db").display());
    let resources = create_test_resources_with_url(&url).await;
    seed_default_client(&resources).await;
    let code = issue_code(&resources, 42).await;

    let attempts: Vec<_> = (0..4)
        .map(|_| {
            let endpoint = TokenEndpoint::new(Arc::clone(&resources));
            let form = token_form(&code);
            tokio::spawn(async move { endpoint.exchange(&form).await })
        })
        .collect();

    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(e.code, ErrorCode::InvalidGrant, "{e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(count_tokens(&resources.database, TokenType::Access).await, 1);
    assert_eq!(count_tokens(&resources.database, TokenType::Authorization).await, 0);
    assert_eq!(count_rows(&resources.database, "oauth2_client_tokens").await, 1);
}
