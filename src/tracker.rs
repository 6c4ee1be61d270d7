// ABOUTME: Daily calorie progress tracker with lazy date-rollover semantics
// ABOUTME: Maintains consumed calories and the daily goal behind a mutex for atomic updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! # Daily Progress Tracker
//!
//! Maintains a running total of calories consumed "today" against a
//! user-configured goal. The accumulated state resets automatically when the
//! observed calendar date differs from the stored one (daily rollover).
//!
//! Rollover is a lazy guard executed at the top of every accessor and mutator
//! rather than a background timer, so behavior stays deterministic: callers
//! inject the observed date, and tests simulate day changes without waiting
//! on the wall clock.
//!
//! All operations run under one mutex so the read-then-write date check and
//! the following mutation are atomic across concurrent requests. State is
//! memory-resident only and lost on restart by design.

use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{MealRecord, ProgressSnapshot};

/// Lowest accepted daily calorie goal
pub const GOAL_MIN_CALORIES: f64 = 500.0;

/// Highest accepted daily calorie goal
pub const GOAL_MAX_CALORIES: f64 = 5000.0;

/// Mutable daily accumulation state
#[derive(Debug, Clone)]
struct DailyProgress {
    /// Calendar date the totals apply to
    date: NaiveDate,
    /// Sum of calories recorded since the last rollover
    consumed_calories: f64,
    /// Configured daily goal, always within [`GOAL_MIN_CALORIES`, `GOAL_MAX_CALORIES`]
    goal_calories: f64,
    /// Meals recorded since the last rollover, oldest first
    meals: Vec<MealRecord>,
}

impl DailyProgress {
    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            date: self.date,
            consumed_calories: self.consumed_calories,
            goal_calories: self.goal_calories,
            fraction: (self.consumed_calories / self.goal_calories).min(1.0),
            meals: self.meals.clone(),
        }
    }

    /// Reset accumulated state if the observed date moved past the stored one
    fn roll_over_if_needed(&mut self, today: NaiveDate) {
        if self.date != today {
            info!(
                previous_date = %self.date,
                new_date = %today,
                discarded_calories = self.consumed_calories,
                "Daily rollover: resetting consumed calories"
            );
            self.date = today;
            self.consumed_calories = 0.0;
            self.meals.clear();
        }
    }
}

/// Thread-safe daily progress tracker
///
/// Owned by the server's shared resources and passed explicitly to whichever
/// handler processes a user interaction.
pub struct ProgressTracker {
    inner: Mutex<DailyProgress>,
}

impl ProgressTracker {
    /// Create a tracker for `today` with the given starting goal
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the starting goal is outside the accepted range.
    pub fn new(today: NaiveDate, goal_calories: f64) -> AppResult<Self> {
        Self::validate_goal(goal_calories)?;
        Ok(Self {
            inner: Mutex::new(DailyProgress {
                date: today,
                consumed_calories: 0.0,
                goal_calories,
                meals: Vec::new(),
            }),
        })
    }

    /// Record a meal against today's total
    ///
    /// Performs the daily rollover check first, then accumulates. Negative
    /// calorie values are rejected and leave the state untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative calories.
    pub fn record_meal(&self, meal: MealRecord, today: NaiveDate) -> AppResult<ProgressSnapshot> {
        if !meal.calories.is_finite() || meal.calories < 0.0 {
            return Err(AppError::invalid_input(format!(
                "Meal calories must be a non-negative number, got {}",
                meal.calories
            )));
        }

        let mut state = self.lock()?;
        state.roll_over_if_needed(today);
        state.consumed_calories += meal.calories;
        debug!(
            dish = %meal.dish_name,
            calories = meal.calories,
            consumed_today = state.consumed_calories,
            "Meal recorded"
        );
        state.meals.push(meal);
        Ok(state.snapshot())
    }

    /// Update the daily goal
    ///
    /// Does not affect consumed calories. Values outside
    /// [`GOAL_MIN_CALORIES`, `GOAL_MAX_CALORIES`] are rejected outright
    /// rather than clamped; the UI enforces the same range as a hard input
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for out-of-range goals.
    pub fn set_goal(&self, goal_calories: f64, today: NaiveDate) -> AppResult<ProgressSnapshot> {
        Self::validate_goal(goal_calories)?;

        let mut state = self.lock()?;
        state.roll_over_if_needed(today);
        state.goal_calories = goal_calories;
        info!(goal = goal_calories, "Daily calorie goal updated");
        Ok(state.snapshot())
    }

    /// Read the current progress
    ///
    /// Applies the same rollover guard as the mutators so a read is never
    /// stale across a day boundary.
    ///
    /// # Errors
    ///
    /// Returns an internal error only if the tracker mutex is poisoned.
    pub fn current_progress(&self, today: NaiveDate) -> AppResult<ProgressSnapshot> {
        let mut state = self.lock()?;
        state.roll_over_if_needed(today);
        Ok(state.snapshot())
    }

    fn validate_goal(goal_calories: f64) -> AppResult<()> {
        if !goal_calories.is_finite()
            || !(GOAL_MIN_CALORIES..=GOAL_MAX_CALORIES).contains(&goal_calories)
        {
            return Err(AppError::new(
                ErrorCode::InvalidInput,
                format!(
                    "Daily goal must be between {GOAL_MIN_CALORIES} and {GOAL_MAX_CALORIES} calories, got {goal_calories}"
                ),
            )
            .with_details(serde_json::json!({
                "min": GOAL_MIN_CALORIES,
                "max": GOAL_MAX_CALORIES,
            })));
        }
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, DailyProgress>> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("Progress tracker lock poisoned"))
    }
}
