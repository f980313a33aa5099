//! # wikipub-client
//!
//! Typed access to the remote content store.
//!
//! The [`RemoteClient`] trait is the seam the publishing engine works
//! against: one method per remote operation, typed failures, no retries.
//! [`RestClient`] is the production implementation over the store's paginated
//! REST API using a blocking HTTP client.

pub mod api;
pub mod error;
pub(crate) mod payloads;
pub mod rest;
pub mod types;

pub use api::RemoteClient;
pub use error::{ClientError, RequestFailure};
pub use rest::RestClient;
pub use types::{RemoteAttachment, RemotePage};
