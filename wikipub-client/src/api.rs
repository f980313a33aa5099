//! The remote-operation seam the publishing engine works against.

use crate::error::ClientError;
use crate::types::{RemoteAttachment, RemotePage};

/// Typed remote operations against the content store.
///
/// Implementations execute each call synchronously and translate every
/// non-success outcome into a [`ClientError`]; they perform no retries. Call
/// order matters to callers (version numbers are read-modify-write), so an
/// implementation must not reorder or coalesce calls.
pub trait RemoteClient {
    /// Create a page under `parent_id`; returns the new page's id.
    fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        content: &str,
        version_message: Option<&str>,
    ) -> Result<String, ClientError>;

    /// Overwrite a page's title/content at `new_version` (= current + 1).
    /// `new_parent_id` re-homes the page when `Some`.
    #[allow(clippy::too_many_arguments)]
    fn update_page(
        &self,
        page_id: &str,
        new_parent_id: Option<&str>,
        title: &str,
        content: &str,
        new_version: i32,
        version_message: Option<&str>,
        notify_watchers: bool,
    ) -> Result<(), ClientError>;

    fn delete_page(&self, page_id: &str) -> Result<(), ClientError>;

    /// Resolve a page id by title within the children of `parent_id`.
    ///
    /// Zero matches raise [`ClientError::NotFound`], more than one raise
    /// [`ClientError::AmbiguousResult`].
    fn find_page_by_title(&self, parent_id: &str, title: &str) -> Result<String, ClientError>;

    /// Fetch a page including its full content and current version.
    fn page_with_content_and_version(&self, page_id: &str) -> Result<RemotePage, ClientError>;

    /// All direct children of `parent_id` (content not populated). The
    /// implementation drains every pagination batch before returning.
    fn child_pages(&self, parent_id: &str) -> Result<Vec<RemotePage>, ClientError>;

    fn create_attachment(
        &self,
        page_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<RemoteAttachment, ClientError>;

    /// Replace an attachment's content in place (no versioned append).
    fn update_attachment_content(
        &self,
        page_id: &str,
        attachment_id: &str,
        data: &[u8],
        notify_watchers: bool,
    ) -> Result<(), ClientError>;

    fn delete_attachment(&self, attachment_id: &str) -> Result<(), ClientError>;

    /// Same zero/one/many contract as [`RemoteClient::find_page_by_title`].
    fn find_attachment_by_file_name(
        &self,
        page_id: &str,
        file_name: &str,
    ) -> Result<RemoteAttachment, ClientError>;

    /// All attachments of `page_id`, drained across pagination batches.
    fn attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ClientError>;

    /// Read a key/value property; `Ok(None)` when the key is absent.
    fn property(&self, entity_id: &str, key: &str) -> Result<Option<String>, ClientError>;

    fn set_property(&self, entity_id: &str, key: &str, value: &str) -> Result<(), ClientError>;

    /// Deleting an absent key is not an error.
    fn delete_property(&self, entity_id: &str, key: &str) -> Result<(), ClientError>;

    fn labels(&self, page_id: &str) -> Result<Vec<String>, ClientError>;

    /// Add several labels in one remote call.
    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ClientError>;

    /// Deleting an absent label is not an error.
    fn delete_label(&self, page_id: &str, label: &str) -> Result<(), ClientError>;
}
