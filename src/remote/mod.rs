// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote try-on API strategy
//!
//! One synchronous REST call to the third-party generation endpoint, with
//! failure classification and tolerant result extraction.

pub mod client;

pub use client::{classify_failure, extract_result_image, TryOnClient, CLOTH_CATEGORIES};
