// ABOUTME: Embedded browser UI route
// ABOUTME: Serves the single-page upload/progress interface compiled into the binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Browser UI route
//!
//! The whole interface is one static page embedded at compile time; no asset
//! pipeline, no files on disk at runtime.

use axum::{response::Html, routing::get, Router};

/// The embedded single-page interface
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// UI routes implementation
pub struct UiRoutes;

impl UiRoutes {
    /// Create the UI route
    #[must_use]
    pub fn routes() -> Router {
        async fn index_handler() -> Html<&'static str> {
            Html(INDEX_HTML)
        }

        Router::new().route("/", get(index_handler))
    }
}
