// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports liveness and service identity for load balancers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use axum::{routing::get, Json, Router};

use crate::constants::{routes, service_names};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": service_names::CODEGRANT_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new().route(routes::HEALTH_CHECK, get(health_handler))
    }
}
