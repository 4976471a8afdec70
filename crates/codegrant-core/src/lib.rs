// ABOUTME: Core types and constants for the codegrant authorization-code server
// ABOUTME: Foundation crate with error handling, persisted models, and protocol constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Codegrant Core
//!
//! Foundation crate providing shared types and constants for the codegrant
//! OAuth 2.0 authorization server. Nothing in here touches storage or HTTP
//! directly unless the matching feature is enabled.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and RFC 6749 error bodies
//! - **models**: Persisted records (clients, tokens, client-token links)
//! - **constants**: Protocol literals and configuration defaults

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Protocol literals and configuration defaults
pub mod constants;

/// Persisted data models (`OAuth2Client`, `TokenRecord`, `ClientTokenLink`)
pub mod models;
