// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request boundary service
//!
//! One endpoint accepting a try-on request and one liveness endpoint.
//! Structured errors carry the classification tag and a status code
//! reflecting the error category.

pub mod errors;
pub mod handlers;
pub mod http_server;

pub use errors::{status_for, ErrorBody};
pub use handlers::{HealthResponse, TryOnRequest, TryOnResponse};
pub use http_server::{build_router, start_server, AppState};
