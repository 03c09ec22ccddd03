// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image payload codec and transient file handling
//!
//! Converts between the embedded `data:<mime>;base64,<payload>` form used at
//! JSON boundaries and raw bytes, and materializes bytes as short-lived files
//! for interfaces that cannot accept in-memory buffers (the browser's file
//! upload control). Transient files are request-scoped: release is idempotent
//! and `Drop` removes anything a failure path left behind.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;
use uuid::Uuid;

use crate::errors::GenerationError;

/// An image in transit: raw bytes plus declared MIME type
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImagePayload {
    /// Construct a payload from bytes, sniffing the MIME type from magic bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes).to_string();
        Self { bytes, mime }
    }

    /// Decode an embedded image string.
    ///
    /// Strips a `data:<mime>;base64,` prefix when present; bare base64 input
    /// is accepted too, with the MIME type inferred from the decoded bytes.
    pub fn from_embedded(embedded: &str) -> Result<Self, GenerationError> {
        let (declared_mime, data) = match embedded.strip_prefix("data:") {
            Some(rest) => {
                let (mime, payload) = rest.split_once(";base64,").ok_or_else(|| {
                    GenerationError::InvalidImageEncoding(
                        "expected data:<mime>;base64,<payload>".to_string(),
                    )
                })?;
                (Some(mime.to_string()), payload)
            }
            None => (None, embedded),
        };

        let bytes = BASE64
            .decode(data.trim())
            .map_err(|e| GenerationError::InvalidImageEncoding(e.to_string()))?;

        let mime = declared_mime.unwrap_or_else(|| sniff_mime(&bytes).to_string());
        Ok(Self { bytes, mime })
    }

    /// Encode to the self-describing embedded form; inverse of `from_embedded`
    pub fn to_embedded(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    /// File extension matching the MIME type, for materialized files
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Infer a MIME type from image magic bytes; defaults to PNG
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

/// Owned handle to a scratch file that must not outlive its request
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
    deleted: bool,
}

impl TransientFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the underlying file. Idempotent; a missing file is not an error.
    pub async fn release(&mut self) -> std::io::Result<()> {
        if self.deleted {
            return Ok(());
        }
        self.deleted = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Released transient file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        // Backstop for paths that never reached release()
        if !self.deleted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Write a payload to a uniquely named file in the scratch directory.
///
/// The name combines a millisecond clock reading with a random UUID so
/// concurrent requests cannot collide. The caller owns the returned handle.
pub async fn materialize(
    payload: &ImagePayload,
    scratch_dir: &Path,
) -> std::io::Result<TransientFile> {
    tokio::fs::create_dir_all(scratch_dir).await?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let name = format!(
        "tryon-{}-{}.{}",
        millis,
        Uuid::new_v4(),
        payload.extension()
    );
    let path = scratch_dir.join(name);

    tokio::fs::write(&path, &payload.bytes).await?;
    debug!("Materialized {} bytes at {}", payload.bytes.len(), path.display());

    Ok(TransientFile {
        path,
        deleted: false,
    })
}
