//! Remote read models.
//!
//! Instances are transient: fetched for one reconciliation step and
//! discarded, never cached across a publish run.

/// A page as the remote store reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// Opaque id assigned by the remote store, stable for the page's lifetime.
    pub id: String,
    pub title: String,
    /// `None` when only identity/version was fetched (child listings).
    pub content: Option<String>,
    pub version: i32,
}

impl RemotePage {
    pub fn with_content(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        version: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: Some(content.into()),
            version,
        }
    }

    pub fn without_content(id: impl Into<String>, title: impl Into<String>, version: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: None,
            version,
        }
    }
}

/// An attachment as the remote store reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttachment {
    pub id: String,
    /// The attachment's file name.
    pub title: String,
    pub download_link: String,
    pub version: i32,
}
