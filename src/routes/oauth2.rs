// ABOUTME: Request Router dispatching the configured OAuth 2.0 routes to their endpoints
// ABOUTME: Axum middleware matching the first path segment; other paths fall through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! OAuth 2.0 request dispatch
//!
//! The route names are configuration, not fixed paths, so dispatch happens in
//! a middleware rather than in `Router::route`. Hosts mount
//! [`oauth2_dispatch`] in front of their own routes:
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use codegrant_server::resources::ServerResources;
//! use codegrant_server::routes::oauth2::oauth2_dispatch;
//! use std::sync::Arc;
//!
//! # async fn handler() -> &'static str { "" }
//! # fn example(resources: Arc<ServerResources>) {
//! let app: Router = Router::new()
//!     .route("/", get(handler))
//!     .layer(middleware::from_fn_with_state(resources, oauth2_dispatch));
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Query, Request, State};
use axum::http::header::{ALLOW, CACHE_CONTROL, PRAGMA};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::oauth2_server::{AuthorizationEndpoint, TokenEndpoint};
use crate::resources::ServerResources;

/// Which endpoint a request path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuth2Route {
    /// Authorization Endpoint
    Authorize,
    /// Token Endpoint
    Token,
}

impl OAuth2Route {
    /// Match the first path segment exactly against the configured route names
    #[must_use]
    pub fn resolve(path: &str, authorize_route: &str, token_route: &str) -> Option<Self> {
        let segment = path.trim_start_matches('/').split('/').next()?;
        if segment == authorize_route {
            Some(Self::Authorize)
        } else if segment == token_route {
            Some(Self::Token)
        } else {
            None
        }
    }
}

/// Dispatch OAuth 2.0 requests; everything else continues to `next`
pub async fn oauth2_dispatch(
    State(resources): State<Arc<ServerResources>>,
    req: Request,
    next: Next,
) -> Response {
    let oauth2 = &resources.config.oauth2;
    let Some(route) = OAuth2Route::resolve(
        req.uri().path(),
        &oauth2.authorize_route,
        &oauth2.token_route,
    ) else {
        return next.run(req).await;
    };

    debug!(route = ?route, method = %req.method(), "Dispatching OAuth2 request");
    let result = match route {
        OAuth2Route::Authorize => handle_authorize(resources, req).await,
        OAuth2Route::Token => handle_token(resources, req).await,
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

async fn handle_authorize(resources: Arc<ServerResources>, req: Request) -> AppResult<Response> {
    if req.method() != Method::GET {
        return Ok(method_not_allowed(req.method(), Method::GET));
    }

    let (parts, _body) = req.into_parts();
    let params = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    let outcome = AuthorizationEndpoint::new(resources)
        .authorize(&parts, &params)
        .await?;
    Ok(outcome.into_response())
}

async fn handle_token(resources: Arc<ServerResources>, req: Request) -> AppResult<Response> {
    if req.method() != Method::POST {
        return Ok(method_not_allowed(req.method(), Method::POST));
    }

    let body = to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::invalid_request("Unreadable request body").with_source(e))?;
    let form: HashMap<String, String> = serde_urlencoded::from_bytes(&body).unwrap_or_default();

    let token = TokenEndpoint::new(resources).exchange(&form).await?;

    let mut response = Json(token).into_response();
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    Ok(response)
}

fn method_not_allowed(received: &Method, allowed: Method) -> Response {
    let mut response = AppError::method_not_allowed(received).into_response();
    if let Ok(value) = HeaderValue::from_str(allowed.as_str()) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
