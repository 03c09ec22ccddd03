// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Declarative page locators for the try-on space
//!
//! The page contract is implicit: at least two file inputs, a clickable
//! generate control, and a result image element. Each capability is an
//! ordered candidate list so minor markup drift does not break the driver,
//! and the matching logic stays testable without a browser.

/// Viewport presented to the page
pub const VIEWPORT: (u32, u32) = (1280, 800);

/// Realistic desktop Chrome user-agent
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Selector for the upload controls; the page must expose at least two
pub const FILE_INPUT_SELECTOR: &str = "input[type='file']";

/// One way of finding the submit/generate control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitLocator {
    /// A `button` whose visible text contains the given label
    ButtonText(&'static str),
    /// A plain CSS selector
    Css(&'static str),
}

/// Candidates for the submit control, tried in order; first match wins
pub const SUBMIT_LOCATORS: &[SubmitLocator] = &[
    SubmitLocator::ButtonText("Run"),
    SubmitLocator::ButtonText("Submit"),
    SubmitLocator::ButtonText("Generate"),
    SubmitLocator::Css("button.primary"),
    SubmitLocator::Css("button[type='submit']"),
];

/// Candidates for the rendered result image, tried in order while polling
pub const RESULT_IMAGE_SELECTORS: &[&str] = &[
    "img.output-image",
    ".output-container img",
    ".result-container img",
];

/// Case-insensitive substring match on a button's visible text
pub fn matches_button_text(label: &str, candidate: &str) -> bool {
    label.trim().to_lowercase().contains(&candidate.to_lowercase())
}
