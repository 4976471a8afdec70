// ABOUTME: Axum response conversion for AppError
// ABOUTME: Renders RFC 6749 JSON error bodies with no-store cache headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, OAuth2ErrorBody};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::{CACHE_CONTROL, PRAGMA};
use http::{HeaderValue, StatusCode};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            tracing::error!(
                code = ?self.code,
                message = %self.message,
                source = ?self.source,
                "Request failed with server error"
            );
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        }

        let mut response = (status, Json(OAuth2ErrorBody::from(&self))).into_response();
        let headers = response.headers_mut();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        response
    }
}
