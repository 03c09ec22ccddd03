// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! All configuration is read from the environment exactly once in `main` and
//! passed into constructors; request-handling code never touches env vars.

use std::env;
use std::path::PathBuf;

/// Default remote try-on endpoint (Segmind try-on-diffusion)
pub const DEFAULT_API_URL: &str = "https://api.segmind.com/v1/try-on-diffusion";

/// Default public web UI driven by the browser-automation fallback
pub const DEFAULT_PAGE_URL: &str =
    "https://huggingface.co/spaces/Kwai-Kolors/Kolors-Virtual-Try-On";

/// How quota exhaustion on the remote API is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaPolicy {
    /// Mask with the fallback chain like any other remote failure (default)
    Fallback,
    /// Surface to the caller as a terminal error
    Surface,
}

/// Top-level node configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key sent in the x-api-key header to the remote endpoint
    pub api_key: String,
    /// Base URL of the remote try-on endpoint
    pub api_url: String,
    /// HTTP port the boundary service listens on
    pub port: u16,
    /// Directory for transient upload files
    pub scratch_dir: PathBuf,
    /// Quota exhaustion handling
    pub quota_policy: QuotaPolicy,
    /// Browser-automation fallback settings
    pub automation: AutomationConfig,
}

/// Browser-automation fallback configuration
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Whether the fallback strategy is available at all
    pub enabled: bool,
    /// Try-on page the driver navigates to
    pub page_url: String,
    /// Bound on page navigation
    pub nav_timeout_secs: u64,
    /// Bound on locating the file-upload controls
    pub locator_timeout_secs: u64,
    /// Bound on waiting for the generated result image
    pub result_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("TRYON_API_KEY").unwrap_or_default(),
            api_url: env::var("TRYON_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            quota_policy: match env::var("QUOTA_POLICY").as_deref() {
                Ok("surface") => QuotaPolicy::Surface,
                _ => QuotaPolicy::Fallback,
            },
            automation: AutomationConfig::from_env(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("TRYON_API_URL must not be empty".to_string());
        }
        self.automation.validate()
    }
}

impl AutomationConfig {
    /// Load automation settings from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("AUTOMATION_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            page_url: env::var("AUTOMATION_PAGE_URL")
                .unwrap_or_else(|_| DEFAULT_PAGE_URL.to_string()),
            nav_timeout_secs: env::var("AUTOMATION_NAV_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            locator_timeout_secs: env::var("AUTOMATION_LOCATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            result_timeout_secs: env::var("AUTOMATION_RESULT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }

    /// Validate the automation settings
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.page_url.trim().is_empty() {
            return Err("AUTOMATION_PAGE_URL must not be empty when automation is enabled"
                .to_string());
        }
        if self.nav_timeout_secs == 0
            || self.locator_timeout_secs == 0
            || self.result_timeout_secs == 0
        {
            return Err("automation timeouts must be greater than 0".to_string());
        }
        Ok(())
    }
}
