// ABOUTME: Host application adapter for user authentication status, login forwarding, and locales
// ABOUTME: Includes a reference adapter that trusts an upstream authentication header
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Host Integration
//!
//! The authorization endpoint never authenticates users itself. It asks a
//! [`HostAdapter`] who the current user is, and hands the request back to the
//! host when nobody is logged in.

use async_trait::async_trait;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum::http::HeaderName;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::config::HostConfig;
use crate::constants::host;
use crate::errors::{AppError, AppResult};

/// Authentication state of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    /// Whether a user is logged in
    pub is_authenticated: bool,
    /// The logged-in user, when authenticated
    pub user_id: Option<i64>,
}

impl AuthStatus {
    /// Status for a logged-in user
    #[must_use]
    pub const fn authenticated(user_id: i64) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id),
        }
    }

    /// Status for an anonymous request
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
        }
    }

    /// The user id if, and only if, the request is authenticated
    #[must_use]
    pub const fn authenticated_user(&self) -> Option<i64> {
        if self.is_authenticated {
            self.user_id
        } else {
            None
        }
    }
}

/// Locales handed to page rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    /// Preferred locale of the end user
    pub user: String,
    /// Locale of the host application
    pub app: String,
}

/// Host application collaborator
#[async_trait]
pub trait HostAdapter: Send + Sync {
    /// Determine who, if anyone, is logged in for this request
    async fn auth_status(&self, parts: &Parts) -> AppResult<AuthStatus>;

    /// Response that sends the user to log in and then back to this request
    fn forward_to_authentication(&self, parts: &Parts) -> Response;

    /// Resolve user and application locales
    fn locales(&self, parts: &Parts) -> Locales;
}

/// Reference adapter for deployments behind an authenticating proxy
///
/// Trusts the configured header to carry the numeric user id. Only sound when
/// the proxy strips that header from client traffic.
#[derive(Debug, Clone)]
pub struct HeaderHostAdapter {
    user_header: HeaderName,
    login_url: String,
    app_locale: String,
}

impl HeaderHostAdapter {
    /// Build the adapter from host configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the user header name is not a valid
    /// HTTP header name
    pub fn new(config: &HostConfig) -> AppResult<Self> {
        let user_header = HeaderName::try_from(config.user_header.as_str()).map_err(|e| {
            AppError::config(format!("Invalid user header '{}'", config.user_header))
                .with_source(e)
        })?;
        Ok(Self {
            user_header,
            login_url: config.login_url.clone(), // Safe: String ownership for adapter
            app_locale: config.app_locale.clone(), // Safe: String ownership for adapter
        })
    }

    /// Login URL carrying the original request as the return target
    #[must_use]
    pub fn login_redirect_url(&self, parts: &Parts) -> String {
        let return_to = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), ToString::to_string);
        let separator = if self.login_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{}={}",
            self.login_url,
            host::RETURN_TO_PARAM,
            urlencoding::encode(&return_to)
        )
    }
}

#[async_trait]
impl HostAdapter for HeaderHostAdapter {
    async fn auth_status(&self, parts: &Parts) -> AppResult<AuthStatus> {
        let Some(value) = parts.headers.get(&self.user_header) else {
            return Ok(AuthStatus::anonymous());
        };
        let user_id = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        Ok(user_id.map_or_else(
            || {
                debug!(header = %self.user_header, "Ignoring malformed user header");
                AuthStatus::anonymous()
            },
            AuthStatus::authenticated,
        ))
    }

    fn forward_to_authentication(&self, parts: &Parts) -> Response {
        Redirect::to(&self.login_redirect_url(parts)).into_response()
    }

    fn locales(&self, parts: &Parts) -> Locales {
        let user = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(first_language_tag)
            .unwrap_or_else(|| self.app_locale.clone()); // Safe: String ownership for locale fallback
        Locales {
            user,
            app: self.app_locale.clone(), // Safe: String ownership for locale bundle
        }
    }
}

/// First language tag of an `Accept-Language` value, e.g. `fr-CH` from `fr-CH, fr;q=0.9`
fn first_language_tag(header: &str) -> Option<String> {
    header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .map(str::trim)
        .find(|tag| !tag.is_empty() && *tag != "*")
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::LOCATION, Request, StatusCode};

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap().into_parts().0
    }

    fn adapter() -> HeaderHostAdapter {
        HeaderHostAdapter::new(&HostConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_status_from_header() {
        let adapter = adapter();

        let status = adapter
            .auth_status(&parts("/authorize", &[("x-authenticated-user", "42")]))
            .await
            .unwrap();
        assert_eq!(status, AuthStatus::authenticated(42));

        let status = adapter.auth_status(&parts("/authorize", &[])).await.unwrap();
        assert_eq!(status.authenticated_user(), None);

        let status = adapter
            .auth_status(&parts("/authorize", &[("x-authenticated-user", "bob")]))
            .await
            .unwrap();
        assert!(!status.is_authenticated);
    }

    #[test]
    fn test_forward_keeps_original_request() {
        let adapter = adapter();
        let response = adapter.forward_to_authentication(&parts(
            "/authorize?client_id=c1&state=xyz",
            &[],
        ));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(
            location,
            "/login?return_to=%2Fauthorize%3Fclient_id%3Dc1%26state%3Dxyz"
        );
    }

    #[test]
    fn test_locales_prefer_accept_language() {
        let adapter = adapter();

        let locales = adapter.locales(&parts("/", &[("accept-language", "fr-CH, fr;q=0.9")]));
        assert_eq!(locales.user, "fr-CH");
        assert_eq!(locales.app, "en");

        let locales = adapter.locales(&parts("/", &[("accept-language", "*")]));
        assert_eq!(locales.user, "en");
    }

    #[test]
    fn test_invalid_header_name_is_config_error() {
        let config = HostConfig {
            user_header: "bad header".to_owned(),
            ..HostConfig::default()
        };
        assert!(HeaderHostAdapter::new(&config).is_err());
    }
}
