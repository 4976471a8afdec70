// ABOUTME: Route module organization for the authorization server HTTP surface
// ABOUTME: Builds the standalone router from health routes and the OAuth2 dispatch layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the code grant server
//!
//! The OAuth 2.0 endpoints are mounted as a middleware so their paths follow
//! configuration; the remaining routes are plain axum routes.

/// Health check routes
pub mod health;
/// OAuth 2.0 request dispatch
pub mod oauth2;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::resources::ServerResources;

pub use health::HealthRoutes;
pub use oauth2::{oauth2_dispatch, OAuth2Route};

/// Standalone server router
///
/// Unmatched paths answer 404 with the JSON error body.
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .fallback(|| async { AppError::not_found("Route") })
        .layer(middleware::from_fn_with_state(resources, oauth2_dispatch))
        .layer(TraceLayer::new_for_http())
}
