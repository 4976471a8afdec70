// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Keeps `crate::errors::{AppError, AppResult}` paths stable across the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The error types live in `codegrant-core` so the CLI and the server share one
//! definition. This module re-exports them for the rest of the crate.

pub use codegrant_core::errors::{AppError, AppResult, ErrorCode, OAuth2ErrorBody};
