// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Counting mock strategies for orchestrator tests

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tryon_node::codec::ImagePayload;
use tryon_node::errors::GenerationError;
use tryon_node::orchestrator::{AutomationStrategy, RemoteStrategy};

pub fn jpeg_payload(tag: u8) -> ImagePayload {
    ImagePayload {
        bytes: vec![0xFF, 0xD8, 0xFF, tag],
        mime: "image/jpeg".to_string(),
    }
}

pub struct MockRemote {
    result: Result<ImagePayload, GenerationError>,
    calls: AtomicUsize,
}

impl MockRemote {
    pub fn new(result: Result<ImagePayload, GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStrategy for MockRemote {
    async fn generate(
        &self,
        _model: &ImagePayload,
        _cloth: &ImagePayload,
    ) -> Result<ImagePayload, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub struct MockAutomation {
    result: Result<ImagePayload, GenerationError>,
    calls: AtomicUsize,
    /// Whether both transient files existed when the driver ran
    saw_both_files: AtomicUsize,
}

impl MockAutomation {
    pub fn new(result: Result<ImagePayload, GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            saw_both_files: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn saw_both_files(&self) -> bool {
        self.saw_both_files.load(Ordering::SeqCst) == self.call_count()
    }
}

#[async_trait]
impl AutomationStrategy for MockAutomation {
    async fn run(
        &self,
        model_file: &Path,
        cloth_file: &Path,
    ) -> Result<ImagePayload, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if model_file.exists() && cloth_file.exists() {
            self.saw_both_files.fetch_add(1, Ordering::SeqCst);
        }
        self.result.clone()
    }
}
