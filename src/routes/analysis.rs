// ABOUTME: Food image analysis route handlers
// ABOUTME: Accepts multipart photo uploads, runs the vision provider, and records the meal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Food analysis routes
//!
//! One request per uploaded image. On success the estimated calories are
//! recorded against today's total; a failed analysis leaves the tracker
//! untouched.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{MealRecord, NutritionEstimate, ProgressSnapshot};
use crate::server::ServerResources;

/// Multipart field name carrying the photo
const IMAGE_FIELD: &str = "image";

/// Response for a successful analysis
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// The nutrition estimate for the uploaded photo
    pub estimate: NutritionEstimate,
    /// Today's progress after recording the meal
    pub progress: ProgressSnapshot,
}

/// Analysis routes implementation
pub struct AnalysisRoutes;

impl AnalysisRoutes {
    /// Create all analysis routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/analyze", post(Self::handle_analyze))
            .with_state(resources)
    }

    /// Handle a food photo upload
    async fn handle_analyze(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let mut image: Option<(Vec<u8>, String)> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::invalid_input(format!("Malformed multipart request: {e}"))
        })? {
            if field.name() == Some(IMAGE_FIELD) {
                let mime_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_owned();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::invalid_input(format!("Failed to read uploaded image: {e}"))
                })?;
                image = Some((bytes.to_vec(), mime_type));
            }
        }

        let (bytes, mime_type) =
            image.ok_or_else(|| AppError::missing_field(IMAGE_FIELD))?;
        if bytes.is_empty() {
            return Err(AppError::invalid_input("Uploaded image is empty"));
        }

        info!(
            image_bytes = bytes.len(),
            mime = %mime_type,
            "Analyzing uploaded food photo"
        );

        // The vision call is the only suspending operation; the tracker is
        // only touched after it succeeds.
        let estimate = resources.vision.analyze(&bytes, &mime_type).await?;

        let meal = MealRecord::new(estimate.dish_name.clone(), estimate.calories);
        let progress = resources
            .tracker
            .record_meal(meal, Utc::now().date_naive())?;

        Ok((StatusCode::OK, Json(AnalyzeResponse { estimate, progress })).into_response())
    }
}
