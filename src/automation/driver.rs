// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Headless browser driver for the try-on web page
//!
//! Linear state machine: launch, navigate, locate inputs, upload, trigger,
//! await result, capture, teardown. Teardown runs on every exit path; a
//! failed locator must not leak a live browser session.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::locators::{
    matches_button_text, SubmitLocator, FILE_INPUT_SELECTOR, RESULT_IMAGE_SELECTORS,
    SUBMIT_LOCATORS, USER_AGENT, VIEWPORT,
};
use crate::codec::ImagePayload;
use crate::config::AutomationConfig;
use crate::errors::GenerationError;

/// Interval between locator poll attempts
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One isolated browser instance plus its CDP event pump.
///
/// Never shared across requests; closed on every exit path of the attempt.
pub struct AutomationSession {
    browser: Browser,
    event_task: JoinHandle<()>,
}

impl AutomationSession {
    /// Launch a fresh headless browser for one attempt
    pub async fn launch() -> Result<Self, GenerationError> {
        let config = BrowserConfig::builder()
            .window_size(VIEWPORT.0, VIEWPORT.1)
            .build()
            .map_err(GenerationError::AutomationUnavailable)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;

        // The handler stream must be pumped for the session to make progress
        let event_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser session launched");
        Ok(Self {
            browser,
            event_task,
        })
    }

    /// Tear the session down; consumed so it cannot be reused
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        self.event_task.abort();
        debug!("Browser session closed");
    }
}

/// Browser-automation strategy over the public try-on page
pub struct BrowserDriver {
    config: AutomationConfig,
}

impl BrowserDriver {
    pub fn new(config: AutomationConfig) -> Self {
        Self { config }
    }

    /// Run one full automation attempt.
    ///
    /// The model file goes to the first upload control and the cloth file to
    /// the second. The order is a correctness contract: swapping them yields
    /// a semantically wrong composite, not an error.
    pub async fn run(
        &self,
        model_file: &Path,
        cloth_file: &Path,
    ) -> Result<ImagePayload, GenerationError> {
        info!("Starting browser automation attempt");
        let session = AutomationSession::launch().await?;
        let result = self.attempt(&session, model_file, cloth_file).await;
        session.close().await;
        result
    }

    async fn attempt(
        &self,
        session: &AutomationSession,
        model_file: &Path,
        cloth_file: &Path,
    ) -> Result<ImagePayload, GenerationError> {
        let page = session
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
        page.set_user_agent(USER_AGENT)
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;

        self.navigate(&page).await?;

        let inputs = self.wait_for_file_inputs(&page).await?;
        self.upload(&page, &inputs[0], model_file).await?;
        self.upload(&page, &inputs[1], cloth_file).await?;

        let submit = self.find_submit(&page).await?;
        submit
            .click()
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
        debug!("Submit control clicked, awaiting result");

        let result = self.await_result(&page).await?;

        let bytes = result
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
        info!("Captured {} result bytes from page", bytes.len());

        Ok(ImagePayload {
            bytes,
            mime: "image/png".to_string(),
        })
    }

    /// Navigate to the try-on page under the navigation bound
    async fn navigate(&self, page: &Page) -> Result<(), GenerationError> {
        let bound = Duration::from_secs(self.config.nav_timeout_secs);
        debug!("Navigating to {}", self.config.page_url);

        tokio::time::timeout(bound, async {
            page.goto(self.config.page_url.as_str())
                .await
                .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|_| GenerationError::AutomationTimeout("navigating to try-on page".to_string()))?
    }

    /// Wait until at least two file-upload controls are attached
    async fn wait_for_file_inputs(&self, page: &Page) -> Result<Vec<Element>, GenerationError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.locator_timeout_secs);
        loop {
            let inputs = page
                .find_elements(FILE_INPUT_SELECTOR)
                .await
                .unwrap_or_default();
            if inputs.len() >= 2 {
                debug!("Found {} file inputs", inputs.len());
                return Ok(inputs);
            }
            if Instant::now() >= deadline {
                return Err(GenerationError::AutomationPageLayoutMismatch(format!(
                    "found {} file upload inputs, need at least 2",
                    inputs.len()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Assign a transient file to an upload control via CDP
    async fn upload(
        &self,
        page: &Page,
        input: &Element,
        file: &Path,
    ) -> Result<(), GenerationError> {
        let params = SetFileInputFilesParams::builder()
            .files(vec![file.display().to_string()])
            .backend_node_id(input.backend_node_id)
            .build()
            .map_err(GenerationError::AutomationUnavailable)?;
        page.execute(params)
            .await
            .map_err(|e| GenerationError::AutomationUnavailable(e.to_string()))?;
        debug!("Uploaded {}", file.display());
        Ok(())
    }

    /// Find the submit/generate control via the ordered candidate list
    async fn find_submit(&self, page: &Page) -> Result<Element, GenerationError> {
        for locator in SUBMIT_LOCATORS {
            match locator {
                SubmitLocator::ButtonText(text) => {
                    let buttons = page.find_elements("button").await.unwrap_or_default();
                    for button in buttons {
                        if let Ok(Some(label)) = button.inner_text().await {
                            if matches_button_text(&label, text) {
                                debug!("Submit control matched text '{}'", text);
                                return Ok(button);
                            }
                        }
                    }
                }
                SubmitLocator::Css(selector) => {
                    if let Ok(element) = page.find_element(*selector).await {
                        debug!("Submit control matched selector '{}'", selector);
                        return Ok(element);
                    }
                }
            }
        }
        Err(GenerationError::AutomationPageLayoutMismatch(
            "no submit control matched any candidate locator".to_string(),
        ))
    }

    /// Poll for the rendered result image; remote inference is slow, so this
    /// carries the longest bound in the pipeline
    async fn await_result(&self, page: &Page) -> Result<Element, GenerationError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.result_timeout_secs);
        loop {
            for selector in RESULT_IMAGE_SELECTORS {
                if let Ok(element) = page.find_element(*selector).await {
                    debug!("Result image matched selector '{}'", selector);
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(GenerationError::AutomationTimeout(
                    "waiting for generated result image".to_string(),
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait::async_trait]
impl crate::orchestrator::AutomationStrategy for BrowserDriver {
    async fn run(
        &self,
        model_file: &Path,
        cloth_file: &Path,
    ) -> Result<ImagePayload, GenerationError> {
        BrowserDriver::run(self, model_file, cloth_file).await
    }
}
