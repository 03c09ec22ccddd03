// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Browser automation fallback strategy
//!
//! Treats the public try-on web page as an ad hoc protocol: upload two files,
//! click generate, wait for the rendered result, screenshot it. The page
//! markup is not under our control, so every lookup runs an ordered list of
//! tolerant candidates (see `locators`) under an explicit timeout.

pub mod driver;
pub mod locators;

pub use driver::{AutomationSession, BrowserDriver};
