// ABOUTME: OpenAI-compatible vision provider for local and cloud endpoints
// ABOUTME: Supports Ollama, vLLM, LocalAI, and any OpenAI-compatible chat completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! # `OpenAI`-Compatible Vision Provider
//!
//! Generic implementation for any `OpenAI`-compatible chat-completions
//! endpoint with vision support. This enables integration with local
//! inference servers like Ollama, vLLM, and `LocalAI` as well as cloud
//! endpoints.
//!
//! ## Configuration
//!
//! - `VISION_LLM_BASE_URL`: Base URL (default: <http://localhost:11434/v1> for Ollama)
//! - `VISION_LLM_MODEL`: Model to use (default: `llava`)
//! - `VISION_LLM_API_KEY`: API key (optional, empty for local servers)
//!
//! The image is sent as a base64 `data:` URL content part next to the
//! instruction prompt, with a low temperature and a small completion budget
//! so the model stays on the JSON format.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{parse_model_reply, VisionProvider, NUTRITION_PROMPT};
use crate::config::VisionConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::NutritionEstimate;

/// Temperature for nutrition estimation (very consistent for JSON format)
const TEMPERATURE: f32 = 0.1;

/// Completion budget (the reply is one small JSON object)
const MAX_TOKENS: u32 = 200;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<VisionMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct VisionMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

/// Multimodal content part
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider
// ============================================================================

/// Vision provider backed by an `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleVisionProvider {
    client: Client,
    config: VisionConfig,
}

impl OpenAiCompatibleVisionProvider {
    /// Create a provider from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be constructed.
    pub fn new(config: VisionConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::config(format!("Failed to build vision HTTP client: {e}")).with_source(e)
            })?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Vision provider initialized"
        );

        Ok(Self { client, config })
    }

    /// Create a provider from environment configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be constructed.
    pub fn from_env() -> AppResult<Self> {
        let config = crate::config::ServerConfig::from_env()
            .map_err(AppError::from)?
            .vision;
        Self::new(config)
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if an API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Assemble the multimodal request for one image
    fn build_request(&self, image: &[u8], mime_type: &str) -> ChatCompletionRequest {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: NUTRITION_PROMPT.to_owned(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:{mime_type};base64,{encoded}"),
                        },
                    },
                ],
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Parse error response from the API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!(
                        "Vision API authentication failed: {}",
                        error_response.error.message
                    ),
                ),
                404 => AppError::not_found(format!(
                    "Vision model or endpoint ({})",
                    error_response.error.message
                )),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    "Vision service rate limit reached. Please wait a moment and try again.",
                ),
                400 => AppError::invalid_input(format!(
                    "Vision API rejected the request: {}",
                    error_response.error.message
                )),
                503 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!(
                        "Vision service unavailable (is the local server running?): {}",
                        error_response.error.message
                    ),
                ),
                _ => AppError::external_service(
                    "VisionLLM",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            // Non-JSON error bodies are common with local servers
            match status.as_u16() {
                502..=504 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    "Vision server is not responding. Is Ollama/vLLM running?",
                ),
                _ => AppError::external_service(
                    "VisionLLM",
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiCompatibleVisionProvider {
    #[instrument(skip(self, image), fields(model = %self.config.model, image_bytes = image.len()))]
    async fn analyze(&self, image: &[u8], mime_type: &str) -> AppResult<NutritionEstimate> {
        if image.is_empty() {
            return Err(AppError::invalid_input("Uploaded image is empty"));
        }

        let request = self.build_request(image, mime_type);
        debug!(
            endpoint = %self.api_url("chat/completions"),
            "Sending food image for nutrition analysis"
        );

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let hint = if e.is_connect() {
                    "Cannot reach vision server. Is Ollama/vLLM running?"
                } else if e.is_timeout() {
                    "Vision request timed out"
                } else {
                    "Vision request failed"
                };
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("{hint}: {e}"),
                )
                .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Vision API returned an error");
            return Err(Self::parse_error_response(status, &body));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::invalid_format(format!("Vision API returned malformed JSON: {e}"))
                .with_source(e)
        })?;

        let reply = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| AppError::invalid_format("Vision API reply contained no content"))?;

        debug!(reply_len = reply.len(), "Parsing model reply");
        let estimate = parse_model_reply(reply)?;
        info!(
            dish = %estimate.dish_name,
            calories = estimate.calories,
            "Nutrition estimate received"
        );
        Ok(estimate)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let provider = OpenAiCompatibleVisionProvider::new(VisionConfig {
            base_url: "http://localhost:11434/v1/".into(),
            ..VisionConfig::default()
        })
        .unwrap();

        assert_eq!(
            provider.api_url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_build_request_embeds_data_url() {
        let provider =
            OpenAiCompatibleVisionProvider::new(VisionConfig::default()).unwrap();
        let request = provider.build_request(&[0xFF, 0xD8, 0xFF], "image/jpeg");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llava");
        let parts = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        let url = parts[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_error_mapping_by_status() {
        let body = r#"{"error": {"message": "model not loaded", "type": "invalid_request_error"}}"#;

        let err = OpenAiCompatibleVisionProvider::parse_error_response(
            reqwest::StatusCode::NOT_FOUND,
            body,
        );
        assert_eq!(err.code, ErrorCode::ResourceNotFound);

        let err = OpenAiCompatibleVisionProvider::parse_error_response(
            reqwest::StatusCode::UNAUTHORIZED,
            body,
        );
        assert_eq!(err.code, ErrorCode::ExternalAuthFailed);

        let err = OpenAiCompatibleVisionProvider::parse_error_response(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            body,
        );
        assert_eq!(err.code, ErrorCode::ExternalRateLimited);
    }

    #[test]
    fn test_non_json_gateway_error_maps_to_unavailable() {
        let err = OpenAiCompatibleVisionProvider::parse_error_response(
            reqwest::StatusCode::BAD_GATEWAY,
            "<html>502 Bad Gateway</html>",
        );
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }
}
