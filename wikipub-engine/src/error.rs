//! Error types for wikipub-engine.

use std::path::PathBuf;

use thiserror::Error;

use wikipub_client::ClientError;

/// All errors that can abort a publish run.
///
/// The engine never retries: the first error propagates to the caller and
/// terminates the run, leaving previously completed remote writes applied.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Invalid publish configuration, detected before any remote call.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A remote operation failed.
    #[error("remote client error: {0}")]
    Client(#[from] ClientError),

    /// Local content or attachment file could not be read.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page content file that is not valid UTF-8 cannot be sent as
    /// storage-format text.
    #[error("content file {} is not valid UTF-8", path.display())]
    NonUtf8Content { path: PathBuf },
}

/// Convenience constructor for [`PublishError::Config`].
pub(crate) fn config_err(message: impl Into<String>) -> PublishError {
    PublishError::Config {
        message: message.into(),
    }
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
