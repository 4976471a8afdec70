// ABOUTME: Configuration management module for server settings
// ABOUTME: Loads network, storage, route, lifetime, and host integration settings from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: server configuration from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{HostConfig, OAuth2Config, ServerConfig};
