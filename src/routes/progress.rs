// ABOUTME: Daily progress route handlers for goal configuration and manual meal entry
// ABOUTME: Exposes the tracker's snapshot, goal update, and record-meal operations over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Daily progress routes
//!
//! All handlers inject the current calendar date into the tracker, so the
//! rollover guard runs on every read and write.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::MealRecord;
use crate::server::ServerResources;

/// Request body for updating the daily goal
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    /// New daily goal in calories, must be within [500, 5000]
    pub goal_calories: f64,
}

/// Request body for manually recording a meal
#[derive(Debug, Deserialize)]
pub struct RecordMealRequest {
    /// Calories to record, must be non-negative
    pub calories: f64,
    /// Optional dish name for the meal log
    #[serde(default)]
    pub dish_name: Option<String>,
}

/// Progress routes implementation
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/progress", get(Self::handle_get_progress))
            .route("/api/goal", put(Self::handle_set_goal))
            .route("/api/meals", post(Self::handle_record_meal))
            .with_state(resources)
    }

    /// Handle reading today's progress
    async fn handle_get_progress(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let snapshot = resources.tracker.current_progress(Utc::now().date_naive())?;
        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }

    /// Handle updating the daily goal
    async fn handle_set_goal(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<UpdateGoalRequest>,
    ) -> Result<Response, AppError> {
        let snapshot = resources
            .tracker
            .set_goal(request.goal_calories, Utc::now().date_naive())?;
        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }

    /// Handle manually recording a meal
    async fn handle_record_meal(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RecordMealRequest>,
    ) -> Result<Response, AppError> {
        let dish_name = request
            .dish_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "manual entry".to_owned());
        let meal = MealRecord::new(dish_name, request.calories);

        let snapshot = resources
            .tracker
            .record_meal(meal, Utc::now().date_naive())?;
        Ok((StatusCode::OK, Json(snapshot)).into_response())
    }
}
