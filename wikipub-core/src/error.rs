//! Error types for wikipub-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading and validating publish metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load — includes file path and line context from serde_json.
    #[error("failed to parse metadata at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata file did not exist at the expected path.
    #[error("metadata file not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// Two attachment source paths on the same page resolve to the same file name.
    #[error("page '{page_title}' has two attachments resolving to file name '{file_name}'")]
    DuplicateAttachmentFileName {
        page_title: String,
        file_name: String,
    },

    /// An attachment source path has no final path segment to derive a file name from.
    #[error("page '{page_title}' has attachment path '{}' with no file name", path.display())]
    InvalidAttachmentPath { page_title: String, path: PathBuf },

    /// Two sibling pages share a title; title lookups against the remote store
    /// would no longer be unambiguous.
    #[error("duplicate sibling page title '{title}'")]
    DuplicateSiblingTitle { title: String },

    /// A page entry with an empty title.
    #[error("page with content file '{}' has an empty title", path.display())]
    EmptyTitle { path: PathBuf },
}

/// Convenience constructor for [`MetadataError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MetadataError {
    MetadataError::Io {
        path: path.into(),
        source,
    }
}
