//! Publish metadata file loading.
//!
//! # File format
//!
//! ```json
//! {
//!   "spaceKey": "DOCS",
//!   "ancestorId": "72189173",
//!   "pages": [
//!     {
//!       "title": "Home",
//!       "contentFile": "home.xhtml",
//!       "attachments": ["images/overview.png"],
//!       "labels": ["published"],
//!       "children": []
//!     }
//!   ]
//! }
//! ```
//!
//! Relative `contentFile` and attachment paths are resolved against the
//! directory containing the metadata file. Attachment file names are derived
//! from the last path segment of the source reference and must be unique per
//! page; sibling page titles must be unique as well — both are rejected here
//! so the publishing engine never has to deal with ambiguous local input.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, MetadataError};
use crate::types::{PageNode, PublishMetadata};

// ---------------------------------------------------------------------------
// Raw (on-disk) representation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    space_key: String,
    ancestor_id: String,
    #[serde(default)]
    pages: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    title: String,
    content_file: PathBuf,
    #[serde(default)]
    attachments: Vec<PathBuf>,
    #[serde(default)]
    labels: BTreeSet<String>,
    #[serde(default)]
    children: Vec<RawPage>,
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load and validate the publish metadata file at `path`.
///
/// Returns [`MetadataError::NotFound`] if absent and
/// [`MetadataError::Parse`] (with path + line context) if malformed JSON.
pub fn load(path: &Path) -> Result<PublishMetadata, MetadataError> {
    if !path.exists() {
        return Err(MetadataError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let raw: RawMetadata = serde_json::from_str(&contents).map_err(|e| MetadataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Content root: the directory the metadata file lives in.
    let content_root = path.parent().unwrap_or_else(|| Path::new("."));

    let pages = resolve_pages(raw.pages, content_root)?;
    Ok(PublishMetadata {
        space_key: raw.space_key,
        ancestor_id: raw.ancestor_id,
        pages,
    })
}

fn resolve_pages(raw: Vec<RawPage>, content_root: &Path) -> Result<Vec<PageNode>, MetadataError> {
    let mut seen_titles = HashSet::new();
    let mut pages = Vec::with_capacity(raw.len());
    for page in raw {
        if !seen_titles.insert(page.title.clone()) {
            return Err(MetadataError::DuplicateSiblingTitle { title: page.title });
        }
        pages.push(resolve_page(page, content_root)?);
    }
    Ok(pages)
}

fn resolve_page(raw: RawPage, content_root: &Path) -> Result<PageNode, MetadataError> {
    if raw.title.trim().is_empty() {
        return Err(MetadataError::EmptyTitle {
            path: raw.content_file,
        });
    }

    let mut attachments = BTreeMap::new();
    for source in raw.attachments {
        let file_name = match source.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                return Err(MetadataError::InvalidAttachmentPath {
                    page_title: raw.title,
                    path: source,
                })
            }
        };
        let resolved = resolve(content_root, &source);
        if attachments.insert(file_name.clone(), resolved).is_some() {
            return Err(MetadataError::DuplicateAttachmentFileName {
                page_title: raw.title,
                file_name,
            });
        }
    }

    let children = resolve_pages(raw.children, content_root)?;
    Ok(PageNode {
        content_file: resolve(content_root, &raw.content_file),
        title: raw.title,
        attachments,
        labels: raw.labels,
        children,
    })
}

fn resolve(content_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        content_root.join(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_metadata(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("metadata.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_and_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [{
                    "title": "Home",
                    "contentFile": "home.xhtml",
                    "attachments": ["images/a.png"],
                    "labels": ["docs"],
                    "children": [{"title": "Child", "contentFile": "child.xhtml"}]
                }]
            }"#,
        );

        let meta = load(&path).expect("load");
        assert_eq!(meta.space_key, "DOCS");
        assert_eq!(meta.ancestor_id, "100");
        assert_eq!(meta.page_count(), 2);

        let home = &meta.pages[0];
        assert_eq!(home.content_file, tmp.path().join("home.xhtml"));
        assert_eq!(
            home.attachments.get("a.png"),
            Some(&tmp.path().join("images/a.png"))
        );
        assert_eq!(home.children[0].title, "Child");
    }

    #[test]
    fn absolute_paths_are_kept_as_is() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [{"title": "Home", "contentFile": "/srv/content/home.xhtml"}]
            }"#,
        );
        let meta = load(&path).unwrap();
        assert_eq!(
            meta.pages[0].content_file,
            PathBuf::from("/srv/content/home.xhtml")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, MetadataError::NotFound { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(tmp.path(), "{not json");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, MetadataError::Parse { .. }));
    }

    #[test]
    fn duplicate_attachment_file_names_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [{
                    "title": "Home",
                    "contentFile": "home.xhtml",
                    "attachments": ["a/logo.png", "b/logo.png"]
                }]
            }"#,
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            MetadataError::DuplicateAttachmentFileName { ref file_name, .. } if file_name == "logo.png"
        ));
    }

    #[test]
    fn duplicate_sibling_titles_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [
                    {"title": "Same", "contentFile": "a.xhtml"},
                    {"title": "Same", "contentFile": "b.xhtml"}
                ]
            }"#,
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, MetadataError::DuplicateSiblingTitle { ref title } if title == "Same"));
    }

    #[test]
    fn duplicate_titles_in_different_branches_are_fine() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [
                    {"title": "A", "contentFile": "a.xhtml",
                     "children": [{"title": "Notes", "contentFile": "an.xhtml"}]},
                    {"title": "B", "contentFile": "b.xhtml",
                     "children": [{"title": "Notes", "contentFile": "bn.xhtml"}]}
                ]
            }"#,
        );
        assert!(load(&path).is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_metadata(
            tmp.path(),
            r#"{
                "spaceKey": "DOCS",
                "ancestorId": "100",
                "pages": [{"title": "  ", "contentFile": "a.xhtml"}]
            }"#,
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, MetadataError::EmptyTitle { .. }));
    }
}
