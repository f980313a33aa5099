//! Content fingerprinting.
//!
//! One hash function for everything the engine compares: lowercase hex
//! SHA-256 over exact raw bytes. Content is never decoded before hashing, so
//! platform line-ending or encoding differences cannot produce false
//! "changed" detections.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, PublishError};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// A page's storage-format text together with the fingerprint of its raw bytes.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub text: String,
    pub digest: String,
}

/// Read a rendered page content file; the digest covers the bytes on disk.
pub fn read_page_content(path: &Path) -> Result<PageContent, PublishError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let digest = sha256_hex(&bytes);
    let text = String::from_utf8(bytes).map_err(|_| PublishError::NonUtf8Content {
        path: path.to_path_buf(),
    })?;
    Ok(PageContent { text, digest })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
