//! Publish lifecycle notifications.

use wikipub_client::RemotePage;

/// Observer for publish lifecycle events.
///
/// All methods default to no-ops, so implementors override only what they
/// report on. `publish_completed` is the last notification of a successful
/// run and fires exactly once.
pub trait PublishListener {
    fn page_added(&mut self, _page: &RemotePage) {}

    fn page_updated(&mut self, _existing: &RemotePage, _updated: &RemotePage) {}

    fn page_deleted(&mut self, _page: &RemotePage) {}

    fn attachment_added(&mut self, _file_name: &str, _page_id: &str) {}

    fn attachment_updated(&mut self, _file_name: &str, _page_id: &str) {}

    fn attachment_deleted(&mut self, _file_name: &str, _page_id: &str) {}

    fn publish_completed(&mut self) {}
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl PublishListener for NoopListener {}
