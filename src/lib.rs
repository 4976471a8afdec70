// ABOUTME: Main library entry point for the OAuth 2.0 authorization-code grant server
// ABOUTME: Exposes endpoints, storage, collaborator traits, and the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Codegrant Server
//!
//! An OAuth 2.0 authorization server implementing the authorization-code
//! grant (RFC 6749 §4.1) for confidential clients.
//!
//! ## Features
//!
//! - **Authorization Endpoint**: issues short-lived, single-use codes to
//!   users the host application has already authenticated
//! - **Token Endpoint**: exchanges a code for a bearer access token after
//!   verifying the owning client's credentials
//! - **Transactional bookkeeping**: token issuance, client association, and
//!   code consumption commit together or not at all
//! - **Pluggable collaborators**: token service, host adapter, and page
//!   renderer are traits wired through [`resources::ServerResources`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codegrant_server::{config::ServerConfig, resources::ServerResources, routes};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let resources = Arc::new(ServerResources::from_config(config).await?);
//! let app = routes::router(resources);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8081").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Environment-driven server configuration
pub mod config;

/// Protocol literals, defaults, and field names
pub mod constants;

/// `SQLite` storage, transactions, and repositories
pub mod database;

/// Unified error handling
pub mod errors;

/// Host application integration
pub mod host;

/// Structured logging setup
pub mod logging;

/// OAuth 2.0 protocol models
pub mod models;

/// Authorization and token endpoints
pub mod oauth2_server;

/// Page rendering
pub mod render;

/// Shared server resources
pub mod resources;

/// HTTP routes and request dispatch
pub mod routes;

/// Token Service
pub mod tokens;
