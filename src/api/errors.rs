// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP mapping for classified generation errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Wire-level error body: classification tag plus a human message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Status code for an error category.
///
/// Validation problems are the caller's fault; everything the remote
/// strategies produce is a server-side failure.
pub fn status_for(err: &GenerationError) -> StatusCode {
    match err {
        GenerationError::MissingInput | GenerationError::InvalidImageEncoding(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrapper so handlers can `?` a GenerationError straight into a response
pub struct ApiErrorResponse(pub GenerationError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<GenerationError> for ApiErrorResponse {
    fn from(err: GenerationError) -> Self {
        Self(err)
    }
}
