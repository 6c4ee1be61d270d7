// ABOUTME: Vision provider abstraction for pluggable food-image analysis backends
// ABOUTME: Defines the analysis contract plus shared reply-parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! # Vision Provider Interface
//!
//! Contract for the external food-analysis service: image bytes in,
//! structured [`NutritionEstimate`] out. The server treats the model as an
//! opaque collaborator; everything model-specific lives behind
//! [`VisionProvider`].
//!
//! ## Reply format
//!
//! Providers instruct the model to answer with a single JSON object. Vision
//! models routinely wrap that object in prose or markdown fences, so parsing
//! extracts the first `{...}` block from the reply before deserializing and
//! tolerates the historical field spellings (`total_calories`,
//! `total_fats_g`, ...).

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleVisionProvider;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::errors::{AppError, AppResult};
use crate::models::NutritionEstimate;

/// Instruction prompt sent alongside every food image
pub const NUTRITION_PROMPT: &str = "Analyze this food image and provide nutritional information. \
Respond ONLY with valid JSON in this exact format: \
{\"dish_name\": \"grilled chicken salad\", \"total_calories\": 500, \"total_fats_g\": 25, \
\"total_proteins_g\": 30, \"total_carbs_g\": 45}. \
Estimate the total nutritional values for all food items visible in the image.";

/// Fallback dish name when the model omits one
const UNKNOWN_DISH: &str = "unidentified dish";

/// Async contract for food-image analysis backends
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Analyze a food image and return a structured nutrition estimate
    ///
    /// # Errors
    ///
    /// Returns an error for network failures, upstream service errors, or a
    /// reply with no parseable nutrition JSON.
    async fn analyze(&self, image: &[u8], mime_type: &str) -> AppResult<NutritionEstimate>;

    /// Human-readable provider name for logging
    fn name(&self) -> &str;
}

/// Nutrition JSON as the model emits it, before normalization
#[derive(Debug, Deserialize)]
struct RawNutrition {
    #[serde(alias = "dish", alias = "food_name")]
    dish_name: Option<String>,
    #[serde(alias = "total_calories")]
    calories: f64,
    #[serde(alias = "total_fats_g", alias = "total_fat_g")]
    fat_g: f64,
    #[serde(alias = "total_proteins_g", alias = "total_protein_g")]
    protein_g: f64,
    #[serde(alias = "total_carbs_g")]
    carbs_g: f64,
}

fn json_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy dot-matches-newline, mirroring the extraction the reply format
    // was designed around
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap_or_else(|_| unreachable!()))
}

/// Parse a free-form model reply into a [`NutritionEstimate`]
///
/// # Errors
///
/// Returns `InvalidFormat` if the reply contains no JSON object or the
/// object lacks the expected nutrition fields.
pub fn parse_model_reply(reply: &str) -> AppResult<NutritionEstimate> {
    let json_str = json_object_regex()
        .find(reply)
        .map(|m| m.as_str())
        .ok_or_else(|| {
            AppError::invalid_format(format!(
                "Model reply contains no JSON object: {}",
                truncate(reply, 200)
            ))
        })?;

    let raw: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        AppError::invalid_format(format!("Model reply is not valid JSON: {e}")).with_source(e)
    })?;

    let nutrition: RawNutrition = serde_json::from_value(raw.clone()).map_err(|e| {
        AppError::invalid_format(format!("Model reply is missing nutrition fields: {e}"))
            .with_source(e)
    })?;

    if !nutrition.calories.is_finite() || nutrition.calories < 0.0 {
        return Err(AppError::invalid_format(format!(
            "Model reported a nonsensical calorie value: {}",
            nutrition.calories
        )));
    }

    Ok(NutritionEstimate {
        dish_name: nutrition
            .dish_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_DISH.to_owned()),
        calories: nutrition.calories,
        fat_g: nutrition.fat_g,
        protein_g: nutrition.protein_g,
        carbs_g: nutrition.carbs_g,
        raw,
    })
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
