// ABOUTME: Daily calorie target calculation from user biometrics
// ABOUTME: BMR via Mifflin-St Jeor, TDEE via activity multipliers, goal-adjusted target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Daily Calorie Target Calculator
//!
//! Derives a personalized daily calorie target from user biometrics:
//!
//! 1. BMR via the Mifflin-St Jeor equation
//! 2. TDEE = BMR x activity multiplier
//! 3. Target = TDEE x weight-goal adjustment, clamped into the tracker's
//!    accepted goal range
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::tracker::{GOAL_MAX_CALORIES, GOAL_MIN_CALORIES};

/// Gender for BMR calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male gender (higher BMR)
    Male,
    /// Female gender (lower BMR)
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little/no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or physical job
    VeryActive,
}

impl ActivityLevel {
    /// TDEE multiplier for this activity level
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

/// Weight goal for calorie target adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// 20% caloric deficit
    LoseFast,
    /// 10% caloric deficit
    LoseSlow,
    /// Caloric balance
    Maintain,
    /// 10% caloric surplus
    GainSlow,
    /// 20% caloric surplus
    GainFast,
}

impl WeightGoal {
    /// Multiplier applied on top of maintenance calories
    #[must_use]
    pub const fn adjustment(self) -> f64 {
        match self {
            Self::LoseFast => 0.8,
            Self::LoseSlow => 0.9,
            Self::Maintain => 1.0,
            Self::GainSlow => 1.1,
            Self::GainFast => 1.2,
        }
    }
}

/// User biometric profile for calorie target derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, at least 2 characters
    pub name: String,
    /// Age in years, 10-120
    pub age: u32,
    /// Biological gender for BMR calculation
    pub gender: Gender,
    /// Height in centimeters, 100-250
    pub height_cm: f64,
    /// Body weight in kilograms, 30-300
    pub weight_kg: f64,
    /// Activity level for TDEE multiplier
    pub activity_level: ActivityLevel,
    /// Weight goal for target adjustment
    pub weight_goal: WeightGoal,
}

impl UserProfile {
    /// Validate field ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first violated constraint.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().len() < 2 {
            return Err(AppError::invalid_input(
                "Name must be at least 2 characters",
            ));
        }
        if !(10..=120).contains(&self.age) {
            return Err(AppError::invalid_input(format!(
                "Age must be between 10 and 120 years, got {}",
                self.age
            )));
        }
        if !self.height_cm.is_finite() || !(100.0..=250.0).contains(&self.height_cm) {
            return Err(AppError::invalid_input(format!(
                "Height must be between 100 and 250 cm, got {}",
                self.height_cm
            )));
        }
        if !self.weight_kg.is_finite() || !(30.0..=300.0).contains(&self.weight_kg) {
            return Err(AppError::invalid_input(format!(
                "Weight must be between 30 and 300 kg, got {}",
                self.weight_kg
            )));
        }
        Ok(())
    }
}

/// Result of a daily calorie target calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTarget {
    /// Basal Metabolic Rate (kcal/day)
    pub bmr: f64,
    /// Total Daily Energy Expenditure (kcal/day)
    pub tdee: f64,
    /// Goal-adjusted daily calorie target (kcal/day), clamped into the
    /// tracker's accepted goal range
    pub target_calories: f64,
    /// Activity level used
    pub activity_level: ActivityLevel,
    /// Weight goal used
    pub weight_goal: WeightGoal,
}

/// Calculate BMR using the Mifflin-St Jeor equation
///
/// male:   10 x weight + 6.25 x height - 5 x age + 5
/// female: 10 x weight + 6.25 x height - 5 x age - 161
#[must_use]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calculate TDEE from BMR and activity level
#[must_use]
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Calculate the full daily calorie target for a profile
///
/// The adjusted target is rounded to whole calories and clamped into the
/// tracker's accepted goal range so the result is always directly usable as
/// a daily goal.
///
/// # Errors
///
/// Returns `InvalidInput` if the profile fails validation.
pub fn calculate_daily_target(profile: &UserProfile) -> AppResult<DailyTarget> {
    profile.validate()?;

    let bmr = calculate_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.gender,
    );
    let tdee = calculate_tdee(bmr, profile.activity_level);
    let target_calories = (tdee * profile.weight_goal.adjustment())
        .round()
        .clamp(GOAL_MIN_CALORIES, GOAL_MAX_CALORIES);

    Ok(DailyTarget {
        bmr,
        tdee,
        target_calories,
        activity_level: profile.activity_level,
        weight_goal: profile.weight_goal,
    })
}
