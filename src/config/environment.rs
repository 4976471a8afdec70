// ABOUTME: Environment-driven server configuration
// ABOUTME: Parses ports, database URL, route names, token lifetimes, and host adapter settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration loaded from environment variables.
//!
//! Every value has a default, so an empty environment yields a working
//! development configuration. Values that are present but unparsable are
//! reported as [`ErrorCode::ConfigError`](crate::errors::ErrorCode).

use std::env;
use std::str::FromStr;

use tracing::info;

use crate::constants::{env_config, host, lifetimes, network, routes, storage};
use crate::errors::{AppError, AppResult};

/// OAuth 2.0 endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Config {
    /// First path segment that selects the authorization endpoint
    pub authorize_route: String,
    /// First path segment that selects the token endpoint
    pub token_route: String,
    /// Lifetime of issued authorization codes
    pub auth_code_lifetime_secs: i64,
    /// Lifetime of issued access tokens
    pub access_token_lifetime_secs: i64,
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            authorize_route: routes::DEFAULT_AUTHORIZE_ROUTE.to_owned(),
            token_route: routes::DEFAULT_TOKEN_ROUTE.to_owned(),
            auth_code_lifetime_secs: lifetimes::AUTH_CODE_LIFETIME_SECS,
            access_token_lifetime_secs: lifetimes::ACCESS_TOKEN_LIFETIME_SECS,
        }
    }
}

/// Settings for the bundled header-trusting host adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Where unauthenticated users are sent
    pub login_url: String,
    /// Request header carrying the authenticated user id
    pub user_header: String,
    /// Application locale passed to page rendering
    pub app_locale: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            login_url: routes::DEFAULT_LOGIN_URL.to_owned(),
            user_header: host::DEFAULT_USER_HEADER.to_owned(),
            app_locale: host::DEFAULT_LOCALE.to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// sqlx database URL
    pub database_url: String,
    /// OAuth 2.0 endpoint settings
    pub oauth2: OAuth2Config,
    /// Host adapter settings
    pub host_adapter: HostConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: network::DEFAULT_HTTP_PORT,
            host: network::DEFAULT_HOST.to_owned(),
            database_url: storage::DEFAULT_DATABASE_URL.to_owned(),
            oauth2: OAuth2Config::default(),
            host_adapter: HostConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a numeric variable cannot be parsed
    /// or a route name is empty
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a numeric variable cannot be parsed
    /// or a route name is empty
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let config = Self {
            http_port: parse_or(&lookup, env_config::HTTP_PORT, defaults.http_port)?,
            host: var_or(env_config::HOST, &defaults.host),
            database_url: var_or(env_config::DATABASE_URL, &defaults.database_url),
            oauth2: OAuth2Config {
                authorize_route: route_name(
                    env_config::ROUTE_AUTHORIZE,
                    &var_or(env_config::ROUTE_AUTHORIZE, &defaults.oauth2.authorize_route),
                )?,
                token_route: route_name(
                    env_config::ROUTE_TOKEN,
                    &var_or(env_config::ROUTE_TOKEN, &defaults.oauth2.token_route),
                )?,
                auth_code_lifetime_secs: positive_secs(
                    env_config::AUTH_CODE_LIFETIME,
                    parse_or(
                        &lookup,
                        env_config::AUTH_CODE_LIFETIME,
                        defaults.oauth2.auth_code_lifetime_secs,
                    )?,
                )?,
                access_token_lifetime_secs: positive_secs(
                    env_config::ACCESS_TOKEN_LIFETIME,
                    parse_or(
                        &lookup,
                        env_config::ACCESS_TOKEN_LIFETIME,
                        defaults.oauth2.access_token_lifetime_secs,
                    )?,
                )?,
            },
            host_adapter: HostConfig {
                login_url: var_or(env_config::LOGIN_URL, &defaults.host_adapter.login_url),
                user_header: var_or(env_config::USER_HEADER, &defaults.host_adapter.user_header)
                    .to_ascii_lowercase(),
                app_locale: var_or(env_config::APP_LOCALE, &defaults.host_adapter.app_locale),
            },
        };

        if config.oauth2.authorize_route == config.oauth2.token_route {
            return Err(AppError::config(format!(
                "{} and {} must differ",
                env_config::ROUTE_AUTHORIZE,
                env_config::ROUTE_TOKEN
            )));
        }

        Ok(config)
    }

    /// Socket address string for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// One-line configuration summary for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "listen={} database={} authorize=/{} token=/{} code_ttl={}s access_ttl={}s locale={}",
            self.bind_address(),
            redact_database_url(&self.database_url),
            self.oauth2.authorize_route,
            self.oauth2.token_route,
            self.oauth2.auth_code_lifetime_secs,
            self.oauth2.access_token_lifetime_secs,
            self.host_adapter.app_locale,
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid {key} value: '{raw}'"))),
    }
}

fn positive_secs(key: &str, value: i64) -> AppResult<i64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(AppError::config(format!("{key} must be positive, got {value}")))
    }
}

fn route_name(key: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim_matches('/');
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(AppError::config(format!(
            "{key} must be a single path segment, got '{value}'"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Only the scheme is shown; file paths and credentials stay out of logs
fn redact_database_url(url: &str) -> &str {
    url.split_once(':').map_or(url, |(scheme, _)| scheme)
}
