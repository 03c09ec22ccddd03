// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation orchestrator
//!
//! Coordinates the remote strategies: validate the request, try the REST
//! endpoint, classify its failure, optionally fall back to browser
//! automation, and finally degrade to the embedded placeholder. Each strategy
//! runs at most once per request. Transient upload files are released on
//! every exit path of the automation attempt.

pub mod placeholder;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::codec::{materialize, ImagePayload};
use crate::config::QuotaPolicy;
use crate::errors::GenerationError;

pub use placeholder::placeholder_payload;

/// An ordered pair of images to compose; both sides are mandatory
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub model_image: Option<ImagePayload>,
    pub cloth_image: Option<ImagePayload>,
}

impl GenerationRequest {
    pub fn new(model_image: ImagePayload, cloth_image: ImagePayload) -> Self {
        Self {
            model_image: Some(model_image),
            cloth_image: Some(cloth_image),
        }
    }
}

/// Which mechanism produced the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    RemoteApi,
    BrowserAutomation,
    /// Synthetic result substituted after all remote strategies failed
    Placeholder,
}

/// A successful orchestration: exactly one image, tagged with its origin
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub image: ImagePayload,
    pub source: GenerationSource,
}

/// Direct REST call strategy seam
#[async_trait]
pub trait RemoteStrategy: Send + Sync {
    async fn generate(
        &self,
        model: &ImagePayload,
        cloth: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError>;
}

/// Browser-automation strategy seam; operates on materialized files
#[async_trait]
pub trait AutomationStrategy: Send + Sync {
    async fn run(
        &self,
        model_file: &Path,
        cloth_file: &Path,
    ) -> Result<ImagePayload, GenerationError>;
}

/// The coordinating state machine for one try-on request
pub struct Orchestrator {
    remote: Arc<dyn RemoteStrategy>,
    automation: Option<Arc<dyn AutomationStrategy>>,
    scratch_dir: PathBuf,
    quota_policy: QuotaPolicy,
}

impl Orchestrator {
    pub fn new(
        remote: Arc<dyn RemoteStrategy>,
        automation: Option<Arc<dyn AutomationStrategy>>,
        scratch_dir: PathBuf,
        quota_policy: QuotaPolicy,
    ) -> Self {
        Self {
            remote,
            automation,
            scratch_dir,
            quota_policy,
        }
    }

    /// Produce a composite for the request, or a terminal classified error.
    ///
    /// Retryable remote failures are masked: first by the browser path when
    /// it is enabled, then by the placeholder. The underlying classification
    /// survives only in the log.
    pub async fn orchestrate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let (model, cloth) = match (&request.model_image, &request.cloth_image) {
            (Some(model), Some(cloth)) => (model, cloth),
            _ => return Err(GenerationError::MissingInput),
        };

        let remote_err = match self.remote.generate(model, cloth).await {
            Ok(image) => {
                info!("Composite produced by remote API");
                return Ok(GenerationOutcome {
                    image,
                    source: GenerationSource::RemoteApi,
                });
            }
            Err(err) => err,
        };

        if remote_err.is_terminal(self.quota_policy) {
            warn!("Remote API failed terminally: {}", remote_err);
            return Err(remote_err);
        }
        warn!(
            "Remote API failed ({}), trying alternate strategy",
            remote_err.kind()
        );

        if let Some(automation) = &self.automation {
            match self.run_automation(automation.as_ref(), model, cloth).await {
                Ok(image) => {
                    info!("Composite produced by browser automation");
                    return Ok(GenerationOutcome {
                        image,
                        source: GenerationSource::BrowserAutomation,
                    });
                }
                Err(err) => {
                    warn!("Browser automation failed ({}): {}", err.kind(), err);
                }
            }
        }

        info!("All remote strategies failed, substituting placeholder result");
        Ok(GenerationOutcome {
            image: placeholder_payload(),
            source: GenerationSource::Placeholder,
        })
    }

    /// Materialize both images, run the driver, release both files
    /// unconditionally afterward.
    async fn run_automation(
        &self,
        automation: &dyn AutomationStrategy,
        model: &ImagePayload,
        cloth: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError> {
        let mut model_file = materialize(model, &self.scratch_dir)
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(format!("scratch file: {}", e)))?;
        let mut cloth_file = match materialize(cloth, &self.scratch_dir).await {
            Ok(file) => file,
            Err(e) => {
                let _ = model_file.release().await;
                return Err(GenerationError::AutomationUnavailable(format!(
                    "scratch file: {}",
                    e
                )));
            }
        };

        let result = automation.run(model_file.path(), cloth_file.path()).await;

        if let Err(e) = model_file.release().await {
            warn!("Failed to release model scratch file: {}", e);
        }
        if let Err(e) = cloth_file.release().await {
            warn!("Failed to release cloth scratch file: {}", e);
        }

        result
    }
}
