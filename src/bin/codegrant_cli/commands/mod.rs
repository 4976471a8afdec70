// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for codegrant-cli
// ABOUTME: Provides access to client and token management commands

pub mod client;
pub mod token;
