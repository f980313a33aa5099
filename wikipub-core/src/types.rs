//! Domain types for the local page tree.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Paths are absolute after [`crate::metadata::load`] has resolved them against
//! the metadata file's directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single locally authored page, plus its subtree.
///
/// The tree mirrors a file-system hierarchy: acyclic, finite, and no two
/// siblings share a title. Attachments and labels use ordered collections so
/// the remote call order during publishing is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub title: String,
    /// Path to the pre-rendered storage-format content for this page.
    pub content_file: PathBuf,
    /// Attachment file name → source path. File names are unique per page.
    #[serde(default)]
    pub attachments: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// A page with only a title and content file; useful as a builder seed.
    pub fn new(title: impl Into<String>, content_file: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            content_file: content_file.into(),
            attachments: BTreeMap::new(),
            labels: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Total number of pages in this subtree, including `self`.
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(PageNode::page_count).sum::<usize>()
    }
}

/// Root of a publish run: where the tree goes and what it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMetadata {
    /// Key of the remote space the pages live in.
    pub space_key: String,
    /// Id of the remote page the local roots are attached under (or replace).
    pub ancestor_id: String,
    #[serde(default)]
    pub pages: Vec<PageNode>,
}

impl PublishMetadata {
    /// Total number of pages across all roots.
    pub fn page_count(&self) -> usize {
        self.pages.iter().map(PageNode::page_count).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
