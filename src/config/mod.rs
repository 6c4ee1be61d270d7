// ABOUTME: Configuration module organization for the WhatTheFork server
// ABOUTME: Re-exports environment-based server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Configuration management
//!
//! All runtime configuration is sourced from environment variables; there is
//! no configuration file. See [`environment::ServerConfig::from_env`].

/// Environment-based configuration management
pub mod environment;

pub use environment::{Environment, ServerConfig, TrackerConfig, VisionConfig};
