// ABOUTME: OAuth 2.0 authorization-code grant server implementation
// ABOUTME: Authorization and token endpoints, bearer checks, and client registration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # OAuth 2.0 Authorization Server
//!
//! Implements the authorization-code grant of RFC 6749 for confidential
//! clients:
//!
//! 1. `GET /{authorize_route}` issues a short-lived code to a logged-in user
//! 2. `POST /{token_route}` exchanges the code for an access token, once
//!
//! Both endpoints run their storage work inside one transaction so a code
//! and its owning client are always written, or consumed, together.

/// Authorization Endpoint
pub mod authorize;
/// Bearer token checks for resource requests
pub mod bearer;
/// Client registration management
pub mod client_registration;
/// Request, response, and page view models
pub mod models;
/// Token Endpoint
pub mod token;

pub use authorize::{AuthorizationEndpoint, AuthorizeOutcome};
pub use bearer::{BearerAuthorization, BearerAuthorizer};
pub use client_registration::ClientRegistrationManager;
pub use token::TokenEndpoint;
