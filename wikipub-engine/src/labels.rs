//! Label reconciliation: a plain set diff per page.
//!
//! Stale remote labels are deleted individually (the remote protocol has no
//! batch delete); missing labels are added in a single batched call. Equal
//! sets issue no write at all.

use std::collections::BTreeSet;

use wikipub_client::RemoteClient;

use crate::error::PublishError;
use crate::listener::PublishListener;
use crate::publisher::Publisher;

impl<C, L> Publisher<C, L>
where
    C: RemoteClient,
    L: PublishListener,
{
    pub(crate) fn reconcile_labels(
        &mut self,
        page_id: &str,
        local: &BTreeSet<String>,
    ) -> Result<(), PublishError> {
        let remote: BTreeSet<String> = self.client.labels(page_id)?.into_iter().collect();

        for stale in remote.difference(local) {
            self.client.delete_label(page_id, stale)?;
            self.report.labels_deleted += 1;
            tracing::debug!("deleted label '{stale}' (page id {page_id})");
        }

        let to_add: Vec<String> = local.difference(&remote).cloned().collect();
        if !to_add.is_empty() {
            self.client.add_labels(page_id, &to_add)?;
            self.report.labels_added += to_add.len() as u32;
            tracing::debug!("added {} label(s) (page id {page_id})", to_add.len());
        }
        Ok(())
    }
}
