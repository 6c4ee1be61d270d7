// ABOUTME: Intelligence module for nutrition calculations and goal derivation
// ABOUTME: Re-exports the daily calorie target calculator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Nutrition intelligence
//!
//! Derives a personalized daily calorie target from a user profile using
//! published metabolic formulas.

/// BMR, TDEE, and daily calorie target calculations
pub mod nutrition_calculator;

pub use nutrition_calculator::{
    calculate_bmr, calculate_daily_target, calculate_tdee, ActivityLevel, DailyTarget, Gender,
    UserProfile, WeightGoal,
};
