// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! REST client for the third-party try-on diffusion endpoint

use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::codec::ImagePayload;
use crate::errors::GenerationError;
use crate::orchestrator::RemoteStrategy;

/// Garment regions accepted by the remote endpoint
pub const CLOTH_CATEGORIES: &[&str] = &["Upper body", "Lower body", "Dress"];

/// Request-level timeout; the orchestrator's overall budget is larger
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

fn default_category() -> String {
    "Upper body".to_string()
}

/// Wire body sent to the remote endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TryOnApiRequest {
    pub model_image: String,
    pub cloth_image: String,
    pub category: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub seed: u64,
    pub base64: bool,
}

impl TryOnApiRequest {
    /// Build the request body from bare-base64 image payloads.
    ///
    /// The remote endpoint expects raw base64 without the data-URI prefix;
    /// step count and guidance match what the endpoint was tuned for.
    pub fn new(model_b64: String, cloth_b64: String, category: Option<String>) -> Self {
        Self {
            model_image: model_b64,
            cloth_image: cloth_b64,
            category: category.unwrap_or_else(default_category),
            num_inference_steps: 35,
            guidance_scale: 2.0,
            seed: rand::thread_rng().gen_range(0..1_000_000),
            base64: true,
        }
    }

    /// Validate the request fields
    pub fn validate(&self) -> Result<(), String> {
        if !CLOTH_CATEGORIES.contains(&self.category.as_str()) {
            return Err(format!(
                "invalid category '{}'; allowed: {}",
                self.category,
                CLOTH_CATEGORIES.join(", ")
            ));
        }
        Ok(())
    }
}

/// Classify a non-success remote response by known body substrings
pub fn classify_failure(status: u16, body: &str) -> GenerationError {
    let lower = body.to_lowercase();
    if lower.contains("no human") {
        GenerationError::NoSubjectDetected
    } else if lower.contains("quota") || lower.contains("credit") {
        GenerationError::InsufficientQuota
    } else if lower.contains("invalid model image")
        || lower.contains("invalid cloth image")
        || lower.contains("invalid image")
    {
        GenerationError::InvalidImageFormat(body.trim().to_string())
    } else {
        GenerationError::RemoteServiceError(format!("HTTP {}: {}", status, body.trim()))
    }
}

/// Ordered extraction rules for the result image field.
///
/// The endpoint has shipped the image under different names across revisions;
/// the first rule that yields a string wins.
pub fn extract_result_image(body: &Value) -> Option<String> {
    const RULES: &[fn(&Value) -> Option<&str>] = &[
        |v| v.get("output").and_then(Value::as_str),
        |v| v.get("image").and_then(Value::as_str),
        |v| {
            v.get("images")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(Value::as_str)
        },
    ];
    RULES.iter().find_map(|rule| rule(body)).map(str::to_owned)
}

/// Client for the remote try-on generation endpoint
pub struct TryOnClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl TryOnClient {
    /// Create a new TryOnClient with the default request timeout
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, GenerationError> {
        Self::with_timeout(endpoint, api_key, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(
        endpoint: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::RemoteServiceError(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Try-on API client configured: endpoint={}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probe the endpoint; used for a startup log record only
    pub async fn health_check(&self) -> bool {
        match self.client.get(&self.endpoint).send().await {
            Ok(resp) => !resp.status().is_server_error(),
            Err(e) => {
                debug!("Try-on API health check failed: {}", e);
                false
            }
        }
    }

    /// Send one generation request and normalize the outcome.
    ///
    /// Images travel as bare base64; the composite comes back the same way
    /// and is returned as raw bytes (the endpoint emits JPEG).
    pub async fn generate(
        &self,
        model: &ImagePayload,
        cloth: &ImagePayload,
        category: Option<String>,
    ) -> Result<ImagePayload, GenerationError> {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        let request = TryOnApiRequest::new(
            BASE64.encode(&model.bytes),
            BASE64.encode(&cloth.bytes),
            category,
        );
        request
            .validate()
            .map_err(GenerationError::RemoteServiceError)?;
        debug!(
            "Try-on API POST {} (steps={}, seed={})",
            self.endpoint, request.num_inference_steps, request.seed
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::RemoteServiceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let classified = classify_failure(status.as_u16(), &body);
            warn!(
                "Try-on API returned {}: classified as {}",
                status,
                classified.kind()
            );
            return Err(classified);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| GenerationError::MalformedRemoteResponse)?;

        let result_b64 =
            extract_result_image(&body).ok_or(GenerationError::MalformedRemoteResponse)?;
        let bytes = BASE64
            .decode(result_b64.as_bytes())
            .map_err(|_| GenerationError::MalformedRemoteResponse)?;

        info!("Try-on API produced {} result bytes", bytes.len());
        Ok(ImagePayload {
            bytes,
            mime: "image/jpeg".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RemoteStrategy for TryOnClient {
    async fn generate(
        &self,
        model: &ImagePayload,
        cloth: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError> {
        TryOnClient::generate(self, model, cloth, None).await
    }
}
