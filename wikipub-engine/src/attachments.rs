//! Attachment reconciliation.
//!
//! Per page: first delete remote attachments with no local counterpart
//! (including their hash properties), then walk the local set in file-name
//! order and create or replace only what drifted. An attachment's fingerprint
//! lives in a page property keyed `"<fileName>-hash"`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use wikipub_client::RemoteClient;

use crate::digest::sha256_hex;
use crate::error::{io_err, PublishError};
use crate::listener::PublishListener;
use crate::publisher::Publisher;

/// Property key storing the fingerprint of an attachment's content.
pub fn attachment_hash_key(file_name: &str) -> String {
    format!("{file_name}-hash")
}

impl<C, L> Publisher<C, L>
where
    C: RemoteClient,
    L: PublishListener,
{
    /// Make `page_id`'s remote attachment set match `local`
    /// (file name → source path).
    pub(crate) fn reconcile_attachments(
        &mut self,
        page_id: &str,
        local: &BTreeMap<String, PathBuf>,
    ) -> Result<(), PublishError> {
        self.delete_attachments_not_present(page_id, local)?;
        for (file_name, source) in local {
            self.add_or_update_attachment(page_id, file_name, source)?;
        }
        Ok(())
    }

    fn delete_attachments_not_present(
        &mut self,
        page_id: &str,
        local: &BTreeMap<String, PathBuf>,
    ) -> Result<(), PublishError> {
        let remote = self.client.attachments(page_id)?;
        for attachment in remote
            .into_iter()
            .filter(|a| !local.contains_key(&a.title))
        {
            // The property may already be gone; absent keys are tolerated.
            self.client
                .delete_property(page_id, &attachment_hash_key(&attachment.title))?;
            self.client.delete_attachment(&attachment.id)?;
            self.report.attachments_deleted += 1;
            self.listener.attachment_deleted(&attachment.title, page_id);
            tracing::info!("deleted attachment '{}' (page id {page_id})", attachment.title);
        }
        Ok(())
    }

    fn add_or_update_attachment(
        &mut self,
        page_id: &str,
        file_name: &str,
        source: &PathBuf,
    ) -> Result<(), PublishError> {
        let data = std::fs::read(source).map_err(|e| io_err(source, e))?;
        let digest = sha256_hex(&data);
        let hash_key = attachment_hash_key(file_name);

        match self.client.find_attachment_by_file_name(page_id, file_name) {
            Ok(existing) => {
                let stored_hash = self.client.property(page_id, &hash_key)?;
                if stored_hash.as_deref() == Some(digest.as_str()) {
                    tracing::debug!("attachment '{file_name}' unchanged (page id {page_id})");
                    return Ok(());
                }
                self.client.delete_property(page_id, &hash_key)?;
                self.client.update_attachment_content(
                    page_id,
                    &existing.id,
                    &data,
                    self.options.notify_watchers,
                )?;
                self.client.set_property(page_id, &hash_key, &digest)?;
                self.report.attachments_updated += 1;
                self.listener.attachment_updated(file_name, page_id);
                tracing::info!("updated attachment '{file_name}' (page id {page_id})");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.client.create_attachment(page_id, file_name, &data)?;
                self.client.set_property(page_id, &hash_key, &digest)?;
                self.report.attachments_added += 1;
                self.listener.attachment_added(file_name, page_id);
                tracing::info!("added attachment '{file_name}' (page id {page_id})");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
