//! JSON request payloads for the remote REST protocol.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct PagePayload {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<SpacePayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<AncestorPayload>,
    pub body: BodyPayload,
    pub version: VersionPayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpacePayload {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AncestorPayload {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BodyPayload {
    pub storage: StoragePayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct StoragePayload {
    pub value: String,
    pub representation: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VersionPayload {
    pub number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "minorEdit", skip_serializing_if = "Option::is_none")]
    pub minor_edit: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PropertyPayload {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LabelPayload {
    pub prefix: &'static str,
    pub name: String,
}

impl PagePayload {
    /// Payload for creating a page under `parent_id` in `space_key`.
    pub fn create(
        space_key: &str,
        parent_id: &str,
        title: &str,
        content: &str,
        version_message: Option<&str>,
    ) -> Self {
        Self {
            content_type: "page",
            title: title.to_owned(),
            space: Some(SpacePayload {
                key: space_key.to_owned(),
            }),
            ancestors: vec![AncestorPayload {
                id: parent_id.to_owned(),
            }],
            body: storage_body(content),
            version: VersionPayload {
                number: 1,
                message: version_message.map(str::to_owned),
                minor_edit: None,
            },
        }
    }

    /// Payload for overwriting an existing page at `new_version`.
    ///
    /// A suppressed watcher notification is expressed as a minor edit.
    pub fn update(
        new_parent_id: Option<&str>,
        title: &str,
        content: &str,
        new_version: i32,
        version_message: Option<&str>,
        notify_watchers: bool,
    ) -> Self {
        Self {
            content_type: "page",
            title: title.to_owned(),
            space: None,
            ancestors: new_parent_id
                .map(|id| vec![AncestorPayload { id: id.to_owned() }])
                .unwrap_or_default(),
            body: storage_body(content),
            version: VersionPayload {
                number: new_version,
                message: version_message.map(str::to_owned),
                minor_edit: Some(!notify_watchers),
            },
        }
    }
}

fn storage_body(content: &str) -> BodyPayload {
    BodyPayload {
        storage: StoragePayload {
            value: content.to_owned(),
            representation: "storage",
        },
    }
}

pub(crate) fn label_payloads(labels: &[String]) -> Vec<LabelPayload> {
    labels
        .iter()
        .map(|name| LabelPayload {
            prefix: "global",
            name: name.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
