// ABOUTME: HTTP server assembly, shared resources, and middleware stack
// ABOUTME: Builds the axum router from per-domain route structs and serves it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! HTTP server assembly
//!
//! [`ServerResources`] is the explicit state object handed to every route:
//! the daily tracker, the vision provider, and the stored profile. There is
//! no module-level mutable state anywhere in the crate.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::intelligence::UserProfile;
use crate::routes::{AnalysisRoutes, HealthRoutes, ProfileRoutes, ProgressRoutes, UiRoutes};
use crate::tracker::ProgressTracker;
use crate::vision::{OpenAiCompatibleVisionProvider, VisionProvider};

/// Shared state passed to every request handler
pub struct ServerResources {
    /// Server configuration
    pub config: ServerConfig,
    /// Daily calorie progress tracker
    pub tracker: ProgressTracker,
    /// External food-analysis provider
    pub vision: Box<dyn VisionProvider>,
    /// Most recently submitted user profile, if any
    pub profile: Mutex<Option<UserProfile>>,
}

impl ServerResources {
    /// Assemble resources from configuration with the default vision provider
    ///
    /// # Errors
    ///
    /// Returns an error if the vision client cannot be constructed or the
    /// configured default goal is out of range.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let vision = OpenAiCompatibleVisionProvider::new(config.vision.clone())
            .context("Failed to initialize vision provider")?;
        Self::with_vision(config, Box::new(vision))
    }

    /// Assemble resources with an explicit vision provider (used by tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the configured default goal is out of range.
    pub fn with_vision(config: ServerConfig, vision: Box<dyn VisionProvider>) -> Result<Self> {
        let tracker = ProgressTracker::new(
            Utc::now().date_naive(),
            config.tracker.default_goal_calories,
        )
        .context("Default daily goal is outside the accepted range")?;

        Ok(Self {
            config,
            tracker,
            vision,
            profile: Mutex::new(None),
        })
    }
}

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let max_upload = resources.config.max_upload_bytes;

    Router::new()
        .merge(UiRoutes::routes())
        .merge(HealthRoutes::routes())
        .merge(AnalysisRoutes::routes(resources.clone()))
        .merge(ProgressRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// HTTP server wrapper
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a server around already-assembled resources
    #[must_use]
    pub fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind and serve until the process is terminated
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound.
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.resources.config.http_port));
        let app = router(self.resources);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .await
            .context("HTTP server terminated unexpectedly")
    }
}
