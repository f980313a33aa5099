//! Page reconciliation and orphan collection.
//!
//! ## Reconciliation of one tree level
//!
//! 1. For each local node, resolve its remote id: look the title up under the
//!    target parent; create the page when absent, otherwise update it only
//!    when the content fingerprint or title drifted.
//! 2. Reconcile the node's attachments and labels against the resolved id.
//! 3. Recurse into the node's children with the resolved id as parent.
//! 4. List the parent's full remote child set; every remote child this run
//!    did not produce is an orphan and is deleted (or kept) per policy.
//!
//! The walk is single-threaded and synchronous: version numbers are updated
//! read-modify-write with no concurrency token, so a deterministic call
//! order is required.

use std::collections::HashSet;

use wikipub_client::{RemoteClient, RemotePage};
use wikipub_core::{PageNode, PublishMetadata};

use crate::digest::{read_page_content, PageContent};
use crate::error::{config_err, PublishError};
use crate::listener::PublishListener;
use crate::report::PublishReport;

/// Property key under which a page's content fingerprint is stored remotely.
pub const CONTENT_HASH_PROPERTY_KEY: &str = "content-hash";

/// Version assigned by the remote store to a freshly created page.
pub const INITIAL_PAGE_VERSION: i32 = 1;

/// How local root pages map onto the remote anchor page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishingStrategy {
    /// Every local root becomes a direct child of the anchor; any number of
    /// roots is allowed.
    AppendToAncestor,
    /// The single local root overwrites the anchor page itself.
    ReplaceAncestor,
}

/// What happens to remote pages with no local counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    RemoveOrphans,
    KeepOrphans,
}

/// Per-run publishing configuration.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub strategy: PublishingStrategy,
    pub orphan_policy: OrphanPolicy,
    /// Free-text message recorded with every page create/update.
    pub version_message: Option<String>,
    /// Forwarded to page updates and attachment content replacements.
    pub notify_watchers: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            strategy: PublishingStrategy::AppendToAncestor,
            orphan_policy: OrphanPolicy::RemoveOrphans,
            version_message: None,
            notify_watchers: true,
        }
    }
}

/// One publish run: local tree in, minimal remote writes out.
pub struct Publisher<C, L> {
    pub(crate) client: C,
    pub(crate) listener: L,
    pub(crate) metadata: PublishMetadata,
    pub(crate) options: PublishOptions,
    pub(crate) report: PublishReport,
}

impl<C, L> Publisher<C, L>
where
    C: RemoteClient,
    L: PublishListener,
{
    pub fn new(client: C, metadata: PublishMetadata, options: PublishOptions, listener: L) -> Self {
        Self {
            client,
            listener,
            metadata,
            options,
            report: PublishReport::default(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Reclaim the client and listener after a run.
    pub fn into_parts(self) -> (C, L) {
        (self.client, self.listener)
    }

    /// Reconcile the whole tree. Fails fast on the first error; completed
    /// remote writes stay applied.
    pub fn publish(&mut self) -> Result<PublishReport, PublishError> {
        self.validate()?;

        let ancestor_id = self.metadata.ancestor_id.clone();
        let roots = self.metadata.pages.clone();
        match self.options.strategy {
            PublishingStrategy::AppendToAncestor => {
                self.reconcile_level(&ancestor_id, &roots)?;
            }
            PublishingStrategy::ReplaceAncestor => {
                // validate() guarantees exactly one root.
                self.replace_ancestor(&ancestor_id, &roots[0])?;
            }
        }

        self.listener.publish_completed();
        Ok(std::mem::take(&mut self.report))
    }

    // -----------------------------------------------------------------------
    // Pre-flight validation — no remote calls before this passes
    // -----------------------------------------------------------------------

    fn validate(&self) -> Result<(), PublishError> {
        if self.metadata.space_key.trim().is_empty() {
            return Err(config_err("space key must not be empty"));
        }
        if self.metadata.ancestor_id.trim().is_empty() {
            return Err(config_err("ancestor id must not be empty"));
        }
        if self.options.strategy == PublishingStrategy::ReplaceAncestor
            && self.metadata.pages.len() != 1
        {
            return Err(config_err(format!(
                "replace-ancestor requires exactly one root page, got {}",
                self.metadata.pages.len()
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Page reconciliation
    // -----------------------------------------------------------------------

    fn reconcile_level(&mut self, parent_id: &str, nodes: &[PageNode]) -> Result<(), PublishError> {
        let mut kept_ids = HashSet::new();
        for node in nodes {
            let page_id = self.add_or_update_page(parent_id, node)?;
            self.reconcile_attachments(&page_id, &node.attachments)?;
            self.reconcile_labels(&page_id, &node.labels)?;
            self.reconcile_level(&page_id, &node.children)?;
            kept_ids.insert(page_id);
        }
        self.collect_orphans(parent_id, &kept_ids)
    }

    /// Resolve `node`'s remote id under `parent_id`, creating or updating as
    /// needed.
    fn add_or_update_page(
        &mut self,
        parent_id: &str,
        node: &PageNode,
    ) -> Result<String, PublishError> {
        let content = read_page_content(&node.content_file)?;

        match self.client.find_page_by_title(parent_id, &node.title) {
            Ok(page_id) => {
                self.update_page_if_changed(&page_id, None, &node.title, &content)?;
                Ok(page_id)
            }
            Err(e) if e.is_not_found() => {
                let page_id = self.client.create_page(
                    parent_id,
                    &node.title,
                    &content.text,
                    self.options.version_message.as_deref(),
                )?;
                self.client
                    .set_property(&page_id, CONTENT_HASH_PROPERTY_KEY, &content.digest)?;
                self.report.pages_added += 1;
                let added = RemotePage::with_content(
                    page_id.clone(),
                    node.title.clone(),
                    content.text,
                    INITIAL_PAGE_VERSION,
                );
                self.listener.page_added(&added);
                tracing::info!("created page '{}' (id {page_id})", node.title);
                Ok(page_id)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update the remote page when its stored fingerprint or title drifted.
    ///
    /// A title change alone forces an update (and a version bump): the title
    /// is not covered by the content hash, and the remote protocol requires a
    /// full update call to rename.
    fn update_page_if_changed(
        &mut self,
        page_id: &str,
        new_parent_id: Option<&str>,
        title: &str,
        content: &PageContent,
    ) -> Result<bool, PublishError> {
        let existing = self.client.page_with_content_and_version(page_id)?;
        let stored_hash = self.client.property(page_id, CONTENT_HASH_PROPERTY_KEY)?;

        // Absent property means the remote content is of unknown provenance.
        let content_changed = stored_hash.as_deref() != Some(content.digest.as_str());
        let title_changed = existing.title != title;
        if !content_changed && !title_changed {
            self.report.pages_unchanged += 1;
            tracing::debug!("page '{title}' unchanged (id {page_id})");
            return Ok(false);
        }

        let new_version = existing.version + 1;
        self.client
            .delete_property(page_id, CONTENT_HASH_PROPERTY_KEY)?;
        self.client.update_page(
            page_id,
            new_parent_id,
            title,
            &content.text,
            new_version,
            self.options.version_message.as_deref(),
            self.options.notify_watchers,
        )?;
        self.client
            .set_property(page_id, CONTENT_HASH_PROPERTY_KEY, &content.digest)?;

        self.report.pages_updated += 1;
        let updated = RemotePage::with_content(
            page_id.to_owned(),
            title.to_owned(),
            content.text.clone(),
            new_version,
        );
        self.listener.page_updated(&existing, &updated);
        tracing::info!(
            "updated page '{title}' (id {page_id}, version {} -> {new_version})",
            existing.version
        );
        Ok(true)
    }

    /// Replace-ancestor: the single root overwrites the anchor page; the
    /// root's children become (or remain) children of the anchor.
    fn replace_ancestor(&mut self, ancestor_id: &str, root: &PageNode) -> Result<(), PublishError> {
        let content = read_page_content(&root.content_file)?;
        self.update_page_if_changed(ancestor_id, None, &root.title, &content)?;
        self.reconcile_attachments(ancestor_id, &root.attachments)?;
        self.reconcile_labels(ancestor_id, &root.labels)?;
        self.reconcile_level(ancestor_id, &root.children)
    }

    // -----------------------------------------------------------------------
    // Orphan collection
    // -----------------------------------------------------------------------

    /// Delete every remote child of `parent_id` this run did not produce.
    fn collect_orphans(
        &mut self,
        parent_id: &str,
        kept_ids: &HashSet<String>,
    ) -> Result<(), PublishError> {
        if self.options.orphan_policy == OrphanPolicy::KeepOrphans {
            // Orphans are left untouched, including their own descendants.
            return Ok(());
        }

        let remote_children = self.client.child_pages(parent_id)?;
        for orphan in remote_children
            .into_iter()
            .filter(|child| !kept_ids.contains(&child.id))
        {
            self.delete_subtree(&orphan.id)?;
        }
        Ok(())
    }

    /// Post-order delete: every descendant id is deleted exactly once before
    /// its parent. Each node's full content/version snapshot is fetched
    /// before deletion so listeners see what was removed.
    fn delete_subtree(&mut self, page_id: &str) -> Result<(), PublishError> {
        for child in self.client.child_pages(page_id)? {
            self.delete_subtree(&child.id)?;
        }
        let snapshot = self.client.page_with_content_and_version(page_id)?;
        self.client.delete_page(page_id)?;
        self.report.pages_deleted += 1;
        self.listener.page_deleted(&snapshot);
        tracing::info!("deleted orphaned page '{}' (id {page_id})", snapshot.title);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
