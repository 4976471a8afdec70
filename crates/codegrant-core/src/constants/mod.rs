// ABOUTME: Protocol literals and configuration defaults for the authorization server
// ABOUTME: Grouped by domain: OAuth 2.0 wire values, lifetimes, routes, and environment names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// OAuth 2.0 wire values (RFC 6749)
pub mod oauth2 {
    /// The only supported `response_type`
    pub const RESPONSE_TYPE_CODE: &str = "code";
    /// The only supported `grant_type`
    pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
    /// `token_type` returned with issued access tokens
    pub const TOKEN_TYPE_BEARER: &str = "Bearer";
    /// Authorization header scheme prefix
    pub const BEARER_PREFIX: &str = "Bearer ";
    /// Scope separator in the `scope` parameter
    pub const SCOPE_SEPARATOR: char = ' ';
}

/// Token lifetimes
pub mod lifetimes {
    /// Authorization codes are short-lived (10 minutes)
    pub const AUTH_CODE_LIFETIME_SECS: i64 = 600;
    /// Access tokens live for one week
    pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 3600;
}

/// Route names and paths
pub mod routes {
    /// Default first path segment of the authorization endpoint
    pub const DEFAULT_AUTHORIZE_ROUTE: &str = "authorize";
    /// Default first path segment of the token endpoint
    pub const DEFAULT_TOKEN_ROUTE: &str = "token";
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Default host login page
    pub const DEFAULT_LOGIN_URL: &str = "/login";
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "127.0.0.1";
}

/// Storage defaults
pub mod storage {
    /// Default SQLite database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/codegrant.db";
    /// Lock wait applied to every SQLite connection
    pub const BUSY_TIMEOUT_SECS: u64 = 5;
    /// Retries for transactions that hit lock contention
    pub const MAX_TRANSACTION_RETRIES: u32 = 5;
    /// Random bytes in every generated token value
    pub const TOKEN_BYTES: usize = 32;
}

/// Host integration defaults
pub mod host {
    /// Header carrying the authenticated user id set by the host's auth layer
    pub const DEFAULT_USER_HEADER: &str = "x-authenticated-user";
    /// Query parameter the login page uses to send the user back
    pub const RETURN_TO_PARAM: &str = "return_to";
    /// Default application locale
    pub const DEFAULT_LOCALE: &str = "en";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Authorization route name
    pub const ROUTE_AUTHORIZE: &str = "OAUTH2_ROUTE_AUTHORIZE";
    /// Token route name
    pub const ROUTE_TOKEN: &str = "OAUTH2_ROUTE_TOKEN";
    /// Authorization code lifetime in seconds
    pub const AUTH_CODE_LIFETIME: &str = "OAUTH2_AUTH_CODE_LIFETIME_SECS";
    /// Access token lifetime in seconds
    pub const ACCESS_TOKEN_LIFETIME: &str = "OAUTH2_ACCESS_TOKEN_LIFETIME_SECS";
    /// Host login page URL
    pub const LOGIN_URL: &str = "OAUTH2_LOGIN_URL";
    /// Header carrying the authenticated user id
    pub const USER_HEADER: &str = "OAUTH2_USER_HEADER";
    /// Application locale
    pub const APP_LOCALE: &str = "APP_LOCALE";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}
