// ABOUTME: Common data models shared between the vision adapter, tracker, and routes
// ABOUTME: Defines nutrition estimates, meal records, and progress snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Common data models
//!
//! These types cross module boundaries: the vision adapter produces a
//! [`NutritionEstimate`], the tracker turns it into a [`MealRecord`], and
//! routes serialize a [`ProgressSnapshot`] for the UI.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured nutrition estimate produced by the vision model
///
/// Immutable, produced fresh per analysis call; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionEstimate {
    /// Name of the identified dish
    pub dish_name: String,
    /// Estimated total calories (kcal)
    pub calories: f64,
    /// Estimated total fat (grams)
    pub fat_g: f64,
    /// Estimated total protein (grams)
    pub protein_g: f64,
    /// Estimated total carbohydrates (grams)
    pub carbs_g: f64,
    /// Raw model payload, passed through opaquely for display
    pub raw: serde_json::Value,
}

/// A single meal recorded against today's total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    /// Unique identifier for this record
    pub id: Uuid,
    /// Dish name if known ("manual entry" for hand-entered meals)
    pub dish_name: String,
    /// Calories recorded for this meal
    pub calories: f64,
    /// When the meal was recorded
    pub recorded_at: DateTime<Utc>,
}

impl MealRecord {
    /// Create a new meal record stamped with the current time
    #[must_use]
    pub fn new(dish_name: impl Into<String>, calories: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            dish_name: dish_name.into(),
            calories,
            recorded_at: Utc::now(),
        }
    }
}

/// Read-only view of today's progress for UI rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Calendar date the totals apply to
    pub date: NaiveDate,
    /// Calories consumed since the last daily rollover
    pub consumed_calories: f64,
    /// Configured daily goal
    pub goal_calories: f64,
    /// Progress fraction, clamped to [0.0, 1.0]
    pub fraction: f64,
    /// Meals recorded today, oldest first
    pub meals: Vec<MealRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_record_new() {
        let meal = MealRecord::new("burger", 295.0);
        assert_eq!(meal.dish_name, "burger");
        assert!((meal.calories - 295.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimate_round_trips_through_json() {
        let estimate = NutritionEstimate {
            dish_name: "pizza".into(),
            calories: 266.0,
            fat_g: 10.0,
            protein_g: 11.0,
            carbs_g: 33.0,
            raw: serde_json::json!({ "total_calories": 266 }),
        };

        let json = serde_json::to_string(&estimate).unwrap();
        let back: NutritionEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dish_name, "pizza");
        assert!((back.calories - 266.0).abs() < f64::EPSILON);
    }
}
