// ABOUTME: Integration tests for the OpenAI-compatible vision adapter
// ABOUTME: Exercises request shape, reply parsing, and upstream error mapping against a mock server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use httpmock::prelude::*;
use serde_json::json;

use whatthefork_server::config::VisionConfig;
use whatthefork_server::errors::ErrorCode;
use whatthefork_server::vision::{OpenAiCompatibleVisionProvider, VisionProvider};

const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

fn provider_for(server: &MockServer) -> OpenAiCompatibleVisionProvider {
    OpenAiCompatibleVisionProvider::new(VisionConfig {
        base_url: format!("{}/v1", server.base_url()),
        model: "llava".into(),
        api_key: None,
        connect_timeout_secs: 5,
        request_timeout_secs: 5,
    })
    .unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "model": "llava"
    })
}

#[tokio::test]
async fn test_successful_analysis() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body_partial(r#"{"model": "llava"}"#);
        then.status(200).json_body(completion_body(
            r#"{"dish_name": "cheeseburger", "total_calories": 550, "total_fats_g": 29, "total_proteins_g": 27, "total_carbs_g": 44}"#,
        ));
    });

    let provider = provider_for(&server);
    let estimate = provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap();

    mock.assert();
    assert_eq!(estimate.dish_name, "cheeseburger");
    assert!((estimate.calories - 550.0).abs() < f64::EPSILON);
    assert!((estimate.protein_g - 27.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_request_carries_base64_image_data_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("data:image/png;base64,");
        then.status(200).json_body(completion_body(
            r#"{"total_calories": 100, "total_fats_g": 1, "total_proteins_g": 2, "total_carbs_g": 3}"#,
        ));
    });

    let provider = provider_for(&server);
    provider.analyze(FAKE_JPEG, "image/png").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_prose_wrapped_reply_is_parsed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body(
            "Here is my estimate:\n{\"dish_name\": \"ramen\", \"total_calories\": 480, \"total_fats_g\": 16, \"total_proteins_g\": 20, \"total_carbs_g\": 62}\nHope that helps!",
        ));
    });

    let provider = provider_for(&server);
    let estimate = provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap();
    assert_eq!(estimate.dish_name, "ramen");
}

#[tokio::test]
async fn test_reply_without_json_is_invalid_format() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(completion_body("I cannot identify any food in this image."));
    });

    let provider = provider_for(&server);
    let err = provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
}

#[tokio::test]
async fn test_unavailable_service_maps_to_external_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).json_body(json!({
            "error": { "message": "model is loading", "type": "server_error" }
        }));
    });

    let provider = provider_for(&server);
    let err = provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_auth_failure_maps_to_external_auth_failed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).json_body(json!({
            "error": { "message": "invalid api key", "type": "auth_error" }
        }));
    });

    let provider = provider_for(&server);
    let err = provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
}

#[tokio::test]
async fn test_bearer_header_sent_only_when_key_configured() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer secret-key");
        then.status(200).json_body(completion_body(
            r#"{"total_calories": 100, "total_fats_g": 1, "total_proteins_g": 2, "total_carbs_g": 3}"#,
        ));
    });

    let provider = OpenAiCompatibleVisionProvider::new(VisionConfig {
        base_url: format!("{}/v1", server.base_url()),
        model: "llava".into(),
        api_key: Some("secret-key".into()),
        connect_timeout_secs: 5,
        request_timeout_secs: 5,
    })
    .unwrap();

    provider.analyze(FAKE_JPEG, "image/jpeg").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_empty_image_rejected_before_any_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body("{}"));
    });

    let provider = provider_for(&server);
    let err = provider.analyze(&[], "image/jpeg").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    mock.assert_hits(0);
}
