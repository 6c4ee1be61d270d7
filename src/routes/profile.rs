// ABOUTME: User profile route handlers for personalized daily calorie targets
// ABOUTME: Validates biometrics, derives BMR/TDEE/target, and applies the target as the goal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! User profile routes
//!
//! Submitting a profile computes a personalized daily calorie target and
//! applies it as the tracker's goal. The profile is memory-resident only.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::intelligence::{calculate_daily_target, DailyTarget, UserProfile};
use crate::models::ProgressSnapshot;
use crate::server::ServerResources;

/// Response for a submitted profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The derived BMR/TDEE/target breakdown
    pub target: DailyTarget,
    /// Today's progress with the new goal applied
    pub progress: ProgressSnapshot,
}

/// Profile routes implementation
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", post(Self::handle_submit_profile))
            .route("/api/profile", get(Self::handle_get_profile))
            .with_state(resources)
    }

    /// Handle profile submission
    async fn handle_submit_profile(
        State(resources): State<Arc<ServerResources>>,
        Json(profile): Json<UserProfile>,
    ) -> Result<Response, AppError> {
        let target = calculate_daily_target(&profile)?;

        // The target is already clamped into the accepted goal range
        let progress = resources
            .tracker
            .set_goal(target.target_calories, Utc::now().date_naive())?;

        info!(
            name = %profile.name,
            bmr = target.bmr,
            tdee = target.tdee,
            target = target.target_calories,
            "Profile submitted; daily goal updated"
        );

        *resources
            .profile
            .lock()
            .map_err(|_| AppError::internal("Profile lock poisoned"))? = Some(profile);

        Ok((StatusCode::OK, Json(ProfileResponse { target, progress })).into_response())
    }

    /// Handle reading the stored profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let profile = resources
            .profile
            .lock()
            .map_err(|_| AppError::internal("Profile lock poisoned"))?
            .clone();

        match profile {
            Some(profile) => Ok((StatusCode::OK, Json(profile)).into_response()),
            None => Err(AppError::not_found("User profile")),
        }
    }
}
