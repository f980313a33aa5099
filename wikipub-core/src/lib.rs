//! Wikipub core library — local page-tree model, metadata file loading, errors.
//!
//! Public API surface:
//! - [`types`] — [`PageNode`] and [`PublishMetadata`]
//! - [`error`] — [`MetadataError`]
//! - [`metadata`] — load / resolve the publish metadata file

pub mod error;
pub mod metadata;
pub mod types;

pub use error::MetadataError;
pub use types::{PageNode, PublishMetadata};
