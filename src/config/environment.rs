// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default HTTP port for the server
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default base URL for the vision endpoint (Ollama)
const DEFAULT_VISION_BASE_URL: &str = "http://localhost:11434/v1";

/// Default vision model
const DEFAULT_VISION_MODEL: &str = "llava";

/// Default daily calorie goal applied until the user sets one
const DEFAULT_DAILY_GOAL: f64 = 2000.0;

/// Default upper bound on uploaded image size (8 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Connection timeout for local inference servers (more lenient than cloud)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local vision inference can be slow)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Configuration for the external vision model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Base URL of the `OpenAI`-compatible endpoint
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Optional bearer token (empty for local servers)
    pub api_key: Option<String>,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VISION_BASE_URL.into(),
            model: DEFAULT_VISION_MODEL.into(),
            api_key: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Configuration for the daily progress tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Daily calorie goal applied at startup, before the user sets one
    pub default_goal_calories: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_goal_calories: DEFAULT_DAILY_GOAL,
        }
    }
}

/// Server configuration assembled from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Vision model endpoint settings
    pub vision: VisionConfig,
    /// Daily tracker settings
    pub tracker: TrackerConfig,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables:
    /// - `HTTP_PORT`: listen port (default 8080)
    /// - `ENVIRONMENT`: development | production | testing
    /// - `VISION_LLM_BASE_URL`: `OpenAI`-compatible endpoint (default Ollama)
    /// - `VISION_LLM_MODEL`: model name (default `llava`)
    /// - `VISION_LLM_API_KEY`: optional bearer token
    /// - `DEFAULT_DAILY_GOAL`: startup calorie goal (default 2000)
    /// - `MAX_UPLOAD_BYTES`: upload size limit (default 8 MiB)
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is present but unparseable.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT value: {port}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        let vision = VisionConfig {
            base_url: env::var("VISION_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_VISION_BASE_URL.into()),
            model: env::var("VISION_LLM_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.into()),
            api_key: env::var("VISION_LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let default_goal_calories = match env::var("DEFAULT_DAILY_GOAL") {
            Ok(goal) => goal
                .parse()
                .with_context(|| format!("Invalid DEFAULT_DAILY_GOAL value: {goal}"))?,
            Err(_) => DEFAULT_DAILY_GOAL,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(bytes) => bytes
                .parse()
                .with_context(|| format!("Invalid MAX_UPLOAD_BYTES value: {bytes}"))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            http_port,
            environment,
            vision,
            tracker: TrackerConfig {
                default_goal_calories,
            },
            max_upload_bytes,
        })
    }

    /// One-line configuration summary for startup logging
    ///
    /// The API key is never included.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={}, environment={}, vision_endpoint={}, vision_model={}, default_goal={}",
            self.http_port,
            self.environment,
            self.vision.base_url,
            self.vision.model,
            self.tracker.default_goal_calories
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            environment: Environment::Development,
            vision: VisionConfig::default(),
            tracker: TrackerConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        for var in [
            "HTTP_PORT",
            "ENVIRONMENT",
            "VISION_LLM_BASE_URL",
            "VISION_LLM_MODEL",
            "VISION_LLM_API_KEY",
            "DEFAULT_DAILY_GOAL",
            "MAX_UPLOAD_BYTES",
        ] {
            std::env::remove_var(var);
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.vision.model, "llava");
        assert!(config.vision.api_key.is_none());
        assert!((config.tracker.default_goal_calories - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("HTTP_PORT", "9090");
        std::env::set_var("VISION_LLM_MODEL", "llava:13b");
        std::env::set_var("DEFAULT_DAILY_GOAL", "1800");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.vision.model, "llava:13b");
        assert!((config.tracker.default_goal_calories - 1800.0).abs() < f64::EPSILON);

        std::env::remove_var("HTTP_PORT");
        std::env::remove_var("VISION_LLM_MODEL");
        std::env::remove_var("DEFAULT_DAILY_GOAL");
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_error() {
        std::env::set_var("HTTP_PORT", "not-a-port");
        assert!(ServerConfig::from_env().is_err());
        std::env::remove_var("HTTP_PORT");
    }

    #[test]
    #[serial]
    fn test_empty_api_key_treated_as_unset() {
        std::env::set_var("VISION_LLM_API_KEY", "");
        let config = ServerConfig::from_env().unwrap();
        assert!(config.vision.api_key.is_none());
        std::env::remove_var("VISION_LLM_API_KEY");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("testing"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything-else"),
            Environment::Development
        );
        assert!(Environment::Production.is_production());
    }
}
