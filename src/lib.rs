// ABOUTME: Main library entry point for the WhatTheFork nutrition analysis server
// ABOUTME: Exposes the tracker, vision adapter, routes, and configuration modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

#![deny(unsafe_code)]

//! # WhatTheFork Server
//!
//! A small web application that analyzes photos of food with an external
//! vision model and tracks calories consumed today against a configurable
//! daily goal.
//!
//! ## Architecture
//!
//! - **`vision`**: Adapter for the external analysis service (image bytes
//!   in, structured nutrition estimate out)
//! - **`tracker`**: In-memory daily calorie accumulation with automatic
//!   reset on calendar date change
//! - **`intelligence`**: Personalized daily target derivation from user
//!   biometrics
//! - **`routes`** / **`server`**: Axum HTTP surface and the embedded
//!   browser UI
//!
//! All state is memory-resident; nothing survives a restart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whatthefork_server::config::ServerConfig;
//! use whatthefork_server::server::{HttpServer, ServerResources};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::new(config)?);
//!     HttpServer::new(resources).run().await
//! }
//! ```

/// Configuration management
pub mod config;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Nutrition intelligence for personalized calorie targets
pub mod intelligence;

/// Production logging and structured output
pub mod logging;

/// Common data models
pub mod models;

/// `HTTP` routes for analysis, progress, profile, and health
pub mod routes;

/// HTTP server assembly and shared resources
pub mod server;

/// Daily calorie progress tracker
pub mod tracker;

/// Vision provider abstraction for food-image analysis
pub mod vision;
