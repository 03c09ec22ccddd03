// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route tests for the request boundary service

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tryon_node::api::{build_router, AppState};
use tryon_node::codec::ImagePayload;
use tryon_node::config::QuotaPolicy;
use tryon_node::errors::GenerationError;
use tryon_node::orchestrator::{Orchestrator, RemoteStrategy};

struct FixedRemote(Result<ImagePayload, GenerationError>);

#[async_trait]
impl RemoteStrategy for FixedRemote {
    async fn generate(
        &self,
        _model: &ImagePayload,
        _cloth: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError> {
        self.0.clone()
    }
}

fn app(remote_result: Result<ImagePayload, GenerationError>) -> axum::Router {
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(FixedRemote(remote_result)),
        None,
        std::env::temp_dir(),
        QuotaPolicy::Surface,
    ));
    build_router(AppState { orchestrator })
}

fn jpeg_payload() -> ImagePayload {
    ImagePayload {
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        mime: "image/jpeg".to_string(),
    }
}

fn try_on_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/virtual-try-on")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_always_ok() {
    let response = app(Ok(jpeg_payload()))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_try_on_success_returns_embedded_result() {
    let payload = jpeg_payload();
    let request_body = json!({
        "modelImage": payload.to_embedded(),
        "clothImage": payload.to_embedded(),
    });

    let response = app(Ok(jpeg_payload()))
        .oneshot(try_on_request(request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let result = body["resultImage"].as_str().unwrap();
    assert!(result.starts_with("data:image/jpeg;base64,"));

    let round_tripped = ImagePayload::from_embedded(result).unwrap();
    assert_eq!(round_tripped, jpeg_payload());
}

#[tokio::test]
async fn test_missing_cloth_image_is_400() {
    let payload = jpeg_payload();
    let request_body = json!({ "modelImage": payload.to_embedded() });

    let response = app(Ok(jpeg_payload()))
        .oneshot(try_on_request(request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_input");
    assert!(body["message"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn test_blank_model_image_is_400() {
    let payload = jpeg_payload();
    let request_body = json!({
        "modelImage": "   ",
        "clothImage": payload.to_embedded(),
    });

    let response = app(Ok(jpeg_payload()))
        .oneshot(try_on_request(request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_image_is_400_invalid_encoding() {
    let request_body = json!({
        "modelImage": "data:image/png;base64,@@@@",
        "clothImage": "data:image/png;base64,@@@@",
    });

    let response = app(Ok(jpeg_payload()))
        .oneshot(try_on_request(request_body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_image_encoding");
}

#[tokio::test]
async fn test_terminal_remote_failure_is_500_with_classification() {
    let payload = jpeg_payload();
    let request_body = json!({
        "modelImage": payload.to_embedded(),
        "clothImage": payload.to_embedded(),
    });

    let response = app(Err(GenerationError::InvalidImageFormat(
        "Invalid Model Image".to_string(),
    )))
    .oneshot(try_on_request(request_body))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_image_format");
    assert!(body["message"].as_str().unwrap().contains("Invalid Model Image"));
}
