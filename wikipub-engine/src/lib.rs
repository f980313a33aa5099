//! # wikipub-engine
//!
//! Hash-gated reconciliation of a local page tree against the remote store.
//!
//! Build a [`Publisher`] from a [`wikipub_core::PublishMetadata`] tree and a
//! [`wikipub_client::RemoteClient`], then call [`Publisher::publish`]. The
//! engine walks the tree depth-first, creates or updates remote pages only
//! when their content fingerprint or title drifted, reconciles attachments
//! and labels per page, and finally deletes (or preserves) orphaned remote
//! subtrees. All change-detection state lives in remote `content-hash`
//! properties; nothing is cached locally between runs.

pub mod attachments;
pub mod digest;
pub mod error;
pub mod labels;
pub mod listener;
pub mod publisher;
pub mod report;

#[cfg(test)]
pub(crate) mod fake_remote;

pub use error::PublishError;
pub use listener::{NoopListener, PublishListener};
pub use publisher::{
    OrphanPolicy, Publisher, PublishingStrategy, PublishOptions, CONTENT_HASH_PROPERTY_KEY,
    INITIAL_PAGE_VERSION,
};
pub use report::PublishReport;
