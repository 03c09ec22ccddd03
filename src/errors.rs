// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the try-on generation pipeline
//!
//! Every failure a strategy can produce is classified into one of these
//! variants before it reaches the orchestrator; the orchestrator decides
//! fallback eligibility from the classification alone.

use thiserror::Error;

use crate::config::QuotaPolicy;

/// Classified failures across validation, the remote API and the browser path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Request arrived without one or both images
    #[error("Both model and cloth images are required")]
    MissingInput,

    /// Embedded image string could not be decoded to bytes
    #[error("Invalid image encoding: {0}")]
    InvalidImageEncoding(String),

    /// Remote service rejected the image itself; no strategy can recover
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// Remote service found no person in the model image
    #[error("No subject detected in model image")]
    NoSubjectDetected,

    /// API quota or credits exhausted
    #[error("Remote API quota exhausted")]
    InsufficientQuota,

    /// Unclassified remote failure (transport error, 5xx, unknown body)
    #[error("Remote service error: {0}")]
    RemoteServiceError(String),

    /// Remote returned success but no recognizable result image field
    #[error("Malformed remote response: no result image found")]
    MalformedRemoteResponse,

    /// Browser could not be launched or the attempt could not start
    #[error("Browser automation unavailable: {0}")]
    AutomationUnavailable(String),

    /// A bounded wait inside the automation attempt expired
    #[error("Browser automation timed out while {0}")]
    AutomationTimeout(String),

    /// Page structure no longer matches the assumed upload/submit/result layout
    #[error("Try-on page layout mismatch: {0}")]
    AutomationPageLayoutMismatch(String),
}

impl GenerationError {
    /// Stable snake_case tag used in wire-level error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MissingInput => "missing_input",
            GenerationError::InvalidImageEncoding(_) => "invalid_image_encoding",
            GenerationError::InvalidImageFormat(_) => "invalid_image_format",
            GenerationError::NoSubjectDetected => "no_subject_detected",
            GenerationError::InsufficientQuota => "insufficient_quota",
            GenerationError::RemoteServiceError(_) => "remote_service_error",
            GenerationError::MalformedRemoteResponse => "malformed_remote_response",
            GenerationError::AutomationUnavailable(_) => "automation_unavailable",
            GenerationError::AutomationTimeout(_) => "automation_timeout",
            GenerationError::AutomationPageLayoutMismatch(_) => "automation_page_layout_mismatch",
        }
    }

    /// Whether this failure ends the request instead of triggering a fallback.
    ///
    /// A malformed image fails identically on every strategy, so retrying via
    /// the browser path is pointless. Quota exhaustion is terminal only when
    /// the deployment chose to surface it.
    pub fn is_terminal(&self, policy: QuotaPolicy) -> bool {
        match self {
            GenerationError::MissingInput
            | GenerationError::InvalidImageEncoding(_)
            | GenerationError::InvalidImageFormat(_) => true,
            GenerationError::InsufficientQuota => policy == QuotaPolicy::Surface,
            _ => false,
        }
    }
}
