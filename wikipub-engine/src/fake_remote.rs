//! In-memory remote store for engine tests.
//!
//! Implements [`RemoteClient`] over a `RefCell`-backed store and records
//! every call in order, so tests can assert on exactly which remote
//! operations a run issued.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use wikipub_client::{ClientError, RemoteAttachment, RemoteClient, RemotePage};

use crate::listener::PublishListener;

#[derive(Debug, Clone)]
struct StoredPage {
    parent: Option<String>,
    title: String,
    content: String,
    version: i32,
}

#[derive(Debug, Clone)]
struct StoredAttachment {
    page_id: String,
    file_name: String,
    version: i32,
}

#[derive(Default)]
struct Store {
    next_id: u32,
    pages: HashMap<String, StoredPage>,
    attachments: HashMap<String, StoredAttachment>,
    properties: HashMap<(String, String), String>,
    labels: HashMap<String, BTreeSet<String>>,
    calls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    store: RefCell<Store>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    // -- seeding ------------------------------------------------------------

    pub fn seed_page(&self, id: &str, parent: Option<&str>, title: &str, content: &str, version: i32) {
        self.store.borrow_mut().pages.insert(
            id.to_owned(),
            StoredPage {
                parent: parent.map(str::to_owned),
                title: title.to_owned(),
                content: content.to_owned(),
                version,
            },
        );
    }

    pub fn seed_property(&self, entity_id: &str, key: &str, value: &str) {
        self.store
            .borrow_mut()
            .properties
            .insert((entity_id.to_owned(), key.to_owned()), value.to_owned());
    }

    pub fn seed_attachment(&self, id: &str, page_id: &str, file_name: &str) {
        self.store.borrow_mut().attachments.insert(
            id.to_owned(),
            StoredAttachment {
                page_id: page_id.to_owned(),
                file_name: file_name.to_owned(),
                version: 1,
            },
        );
    }

    pub fn seed_labels(&self, page_id: &str, labels: &[&str]) {
        self.store.borrow_mut().labels.insert(
            page_id.to_owned(),
            labels.iter().map(|l| (*l).to_owned()).collect(),
        );
    }

    // -- inspection ---------------------------------------------------------

    pub fn calls(&self) -> Vec<String> {
        self.store.borrow().calls.clone()
    }

    /// Calls that mutate remote state (creates, updates, deletes, property
    /// and label writes).
    pub fn write_calls(&self) -> Vec<String> {
        const WRITE_PREFIXES: [&str; 10] = [
            "createPage",
            "updatePage",
            "deletePage",
            "createAttachment",
            "updateAttachmentContent",
            "deleteAttachment",
            "setProperty",
            "deleteProperty",
            "addLabels",
            "deleteLabel",
        ];
        self.calls()
            .into_iter()
            .filter(|call| WRITE_PREFIXES.iter().any(|p| call.starts_with(p)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.store.borrow_mut().calls.clear();
    }

    pub fn has_page(&self, id: &str) -> bool {
        self.store.borrow().pages.contains_key(id)
    }

    pub fn page_version(&self, id: &str) -> i32 {
        self.store.borrow().pages[id].version
    }

    pub fn page_title(&self, id: &str) -> String {
        self.store.borrow().pages[id].title.clone()
    }

    pub fn page_content(&self, id: &str) -> String {
        self.store.borrow().pages[id].content.clone()
    }

    pub fn property_of(&self, entity_id: &str, key: &str) -> Option<String> {
        self.store
            .borrow()
            .properties
            .get(&(entity_id.to_owned(), key.to_owned()))
            .cloned()
    }

    pub fn labels_of(&self, page_id: &str) -> BTreeSet<String> {
        self.store
            .borrow()
            .labels
            .get(page_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Ids of the direct children of `parent_id`, sorted.
    pub fn child_ids(&self, parent_id: &str) -> Vec<String> {
        let store = self.store.borrow();
        let mut ids: Vec<String> = store
            .pages
            .iter()
            .filter(|(_, p)| p.parent.as_deref() == Some(parent_id))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    fn record(&self, call: String) {
        self.store.borrow_mut().calls.push(call);
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let mut store = self.store.borrow_mut();
        store.next_id += 1;
        format!("{prefix}{}", store.next_id)
    }
}

impl RemoteClient for FakeRemote {
    fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        content: &str,
        _version_message: Option<&str>,
    ) -> Result<String, ClientError> {
        self.record(format!("createPage {parent_id} '{title}'"));
        let id = self.fresh_id("p");
        self.store.borrow_mut().pages.insert(
            id.clone(),
            StoredPage {
                parent: Some(parent_id.to_owned()),
                title: title.to_owned(),
                content: content.to_owned(),
                version: 1,
            },
        );
        Ok(id)
    }

    fn update_page(
        &self,
        page_id: &str,
        new_parent_id: Option<&str>,
        title: &str,
        content: &str,
        new_version: i32,
        _version_message: Option<&str>,
        _notify_watchers: bool,
    ) -> Result<(), ClientError> {
        self.record(format!("updatePage {page_id} v{new_version}"));
        let mut store = self.store.borrow_mut();
        let page = store
            .pages
            .get_mut(page_id)
            .ok_or_else(|| ClientError::not_found("page", page_id))?;
        if let Some(parent) = new_parent_id {
            page.parent = Some(parent.to_owned());
        }
        page.title = title.to_owned();
        page.content = content.to_owned();
        page.version = new_version;
        Ok(())
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ClientError> {
        self.record(format!("deletePage {page_id}"));
        self.store.borrow_mut().pages.remove(page_id);
        Ok(())
    }

    fn find_page_by_title(&self, parent_id: &str, title: &str) -> Result<String, ClientError> {
        self.record(format!("findPageByTitle {parent_id} '{title}'"));
        let store = self.store.borrow();
        let mut matches: Vec<String> = store
            .pages
            .iter()
            .filter(|(_, p)| p.parent.as_deref() == Some(parent_id) && p.title == title)
            .map(|(id, _)| id.clone())
            .collect();
        matches.sort();
        match matches.len() {
            0 => Err(ClientError::not_found("page", title)),
            1 => Ok(matches.remove(0)),
            _ => Err(ClientError::ambiguous("page", title)),
        }
    }

    fn page_with_content_and_version(&self, page_id: &str) -> Result<RemotePage, ClientError> {
        self.record(format!("getPage {page_id}"));
        let store = self.store.borrow();
        let page = store
            .pages
            .get(page_id)
            .ok_or_else(|| ClientError::not_found("page", page_id))?;
        Ok(RemotePage::with_content(
            page_id,
            page.title.clone(),
            page.content.clone(),
            page.version,
        ))
    }

    fn child_pages(&self, parent_id: &str) -> Result<Vec<RemotePage>, ClientError> {
        self.record(format!("childPages {parent_id}"));
        let store = self.store.borrow();
        let mut children: Vec<(String, StoredPage)> = store
            .pages
            .iter()
            .filter(|(_, p)| p.parent.as_deref() == Some(parent_id))
            .map(|(id, p)| (id.clone(), p.clone()))
            .collect();
        children.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(children
            .into_iter()
            .map(|(id, p)| RemotePage::without_content(id, p.title, p.version))
            .collect())
    }

    fn create_attachment(
        &self,
        page_id: &str,
        file_name: &str,
        _data: &[u8],
    ) -> Result<RemoteAttachment, ClientError> {
        self.record(format!("createAttachment {page_id} '{file_name}'"));
        let id = self.fresh_id("att");
        self.store.borrow_mut().attachments.insert(
            id.clone(),
            StoredAttachment {
                page_id: page_id.to_owned(),
                file_name: file_name.to_owned(),
                version: 1,
            },
        );
        Ok(RemoteAttachment {
            id: id.clone(),
            title: file_name.to_owned(),
            download_link: format!("/download/{id}"),
            version: 1,
        })
    }

    fn update_attachment_content(
        &self,
        page_id: &str,
        attachment_id: &str,
        _data: &[u8],
        _notify_watchers: bool,
    ) -> Result<(), ClientError> {
        self.record(format!("updateAttachmentContent {page_id} {attachment_id}"));
        let mut store = self.store.borrow_mut();
        let attachment = store
            .attachments
            .get_mut(attachment_id)
            .ok_or_else(|| ClientError::not_found("attachment", attachment_id))?;
        attachment.version += 1;
        Ok(())
    }

    fn delete_attachment(&self, attachment_id: &str) -> Result<(), ClientError> {
        self.record(format!("deleteAttachment {attachment_id}"));
        self.store.borrow_mut().attachments.remove(attachment_id);
        Ok(())
    }

    fn find_attachment_by_file_name(
        &self,
        page_id: &str,
        file_name: &str,
    ) -> Result<RemoteAttachment, ClientError> {
        self.record(format!("findAttachment {page_id} '{file_name}'"));
        let store = self.store.borrow();
        let mut matches: Vec<(String, StoredAttachment)> = store
            .attachments
            .iter()
            .filter(|(_, a)| a.page_id == page_id && a.file_name == file_name)
            .map(|(id, a)| (id.clone(), a.clone()))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0));
        match matches.len() {
            0 => Err(ClientError::not_found("attachment", file_name)),
            1 => {
                let (id, attachment) = matches.remove(0);
                Ok(RemoteAttachment {
                    download_link: format!("/download/{id}"),
                    id,
                    title: attachment.file_name,
                    version: attachment.version,
                })
            }
            _ => Err(ClientError::ambiguous("attachment", file_name)),
        }
    }

    fn attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ClientError> {
        self.record(format!("listAttachments {page_id}"));
        let store = self.store.borrow();
        let mut all: Vec<(String, StoredAttachment)> = store
            .attachments
            .iter()
            .filter(|(_, a)| a.page_id == page_id)
            .map(|(id, a)| (id.clone(), a.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all
            .into_iter()
            .map(|(id, a)| RemoteAttachment {
                download_link: format!("/download/{id}"),
                id,
                title: a.file_name,
                version: a.version,
            })
            .collect())
    }

    fn property(&self, entity_id: &str, key: &str) -> Result<Option<String>, ClientError> {
        self.record(format!("getProperty {entity_id} {key}"));
        Ok(self.property_of(entity_id, key))
    }

    fn set_property(&self, entity_id: &str, key: &str, value: &str) -> Result<(), ClientError> {
        self.record(format!("setProperty {entity_id} {key}"));
        self.store
            .borrow_mut()
            .properties
            .insert((entity_id.to_owned(), key.to_owned()), value.to_owned());
        Ok(())
    }

    fn delete_property(&self, entity_id: &str, key: &str) -> Result<(), ClientError> {
        self.record(format!("deleteProperty {entity_id} {key}"));
        self.store
            .borrow_mut()
            .properties
            .remove(&(entity_id.to_owned(), key.to_owned()));
        Ok(())
    }

    fn labels(&self, page_id: &str) -> Result<Vec<String>, ClientError> {
        self.record(format!("listLabels {page_id}"));
        Ok(self.labels_of(page_id).into_iter().collect())
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ClientError> {
        self.record(format!("addLabels {page_id} [{}]", labels.join(",")));
        self.store
            .borrow_mut()
            .labels
            .entry(page_id.to_owned())
            .or_default()
            .extend(labels.iter().cloned());
        Ok(())
    }

    fn delete_label(&self, page_id: &str, label: &str) -> Result<(), ClientError> {
        self.record(format!("deleteLabel {page_id} '{label}'"));
        if let Some(labels) = self.store.borrow_mut().labels.get_mut(page_id) {
            labels.remove(label);
        }
        Ok(())
    }
}

/// Listener that records event names in order.
#[derive(Default)]
pub(crate) struct RecordingListener {
    pub events: Vec<String>,
}

impl PublishListener for RecordingListener {
    fn page_added(&mut self, page: &RemotePage) {
        self.events.push(format!("pageAdded '{}'", page.title));
    }

    fn page_updated(&mut self, existing: &RemotePage, updated: &RemotePage) {
        self.events.push(format!(
            "pageUpdated '{}' v{} -> v{}",
            updated.title, existing.version, updated.version
        ));
    }

    fn page_deleted(&mut self, page: &RemotePage) {
        self.events.push(format!("pageDeleted '{}'", page.title));
    }

    fn attachment_added(&mut self, file_name: &str, page_id: &str) {
        self.events.push(format!("attachmentAdded '{file_name}' {page_id}"));
    }

    fn attachment_updated(&mut self, file_name: &str, page_id: &str) {
        self.events
            .push(format!("attachmentUpdated '{file_name}' {page_id}"));
    }

    fn attachment_deleted(&mut self, file_name: &str, page_id: &str) {
        self.events
            .push(format!("attachmentDeleted '{file_name}' {page_id}"));
    }

    fn publish_completed(&mut self) {
        self.events.push("publishCompleted".to_owned());
    }
}
