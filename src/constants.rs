// ABOUTME: Re-exports protocol literals and configuration defaults from the core crate
// ABOUTME: Adds the form and query field names used by the endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module

pub use codegrant_core::constants::{env_config, host, lifetimes, network, oauth2, routes, storage};

/// Request field names for the authorization and token endpoints
pub mod fields {
    /// Public client identifier
    pub const CLIENT_ID: &str = "client_id";
    /// Client shared secret
    pub const CLIENT_SECRET: &str = "client_secret";
    /// Redirect URI
    pub const REDIRECT_URI: &str = "redirect_uri";
    /// Response type
    pub const RESPONSE_TYPE: &str = "response_type";
    /// Requested scope list
    pub const SCOPE: &str = "scope";
    /// Client state echoed back on redirect
    pub const STATE: &str = "state";
    /// Grant type
    pub const GRANT_TYPE: &str = "grant_type";
    /// Authorization code
    pub const CODE: &str = "code";
}

/// Service identity used in logs and health output
pub mod service_names {
    /// Server service name
    pub const CODEGRANT_SERVER: &str = "codegrant-server";
}
