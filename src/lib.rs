// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod automation;
pub mod codec;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod remote;
pub mod version;

// Re-export the main types
pub use codec::{materialize, ImagePayload, TransientFile};
pub use config::{AppConfig, AutomationConfig, QuotaPolicy};
pub use errors::GenerationError;
pub use orchestrator::{
    placeholder_payload, AutomationStrategy, GenerationOutcome, GenerationRequest,
    GenerationSource, Orchestrator, RemoteStrategy,
};
pub use remote::TryOnClient;
