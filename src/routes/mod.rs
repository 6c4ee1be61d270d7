// ABOUTME: Route module organization for WhatTheFork HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Route modules
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the tracker, vision provider, or calculator.

/// Food image analysis routes
pub mod analysis;
/// Health check and system status routes
pub mod health;
/// User profile and calorie target routes
pub mod profile;
/// Daily progress and goal routes
pub mod progress;
/// Embedded browser UI
pub mod ui;

/// Analysis route handlers
pub use analysis::AnalysisRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Profile route handlers
pub use profile::ProfileRoutes;
/// Progress route handlers
pub use progress::ProgressRoutes;
/// UI route handlers
pub use ui::UiRoutes;
