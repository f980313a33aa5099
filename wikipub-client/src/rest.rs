//! Blocking REST implementation of [`RemoteClient`].
//!
//! Wire protocol:
//!
//! ```text
//! POST   /rest/api/content                                  create page
//! PUT    /rest/api/content/{id}                             update page
//! DELETE /rest/api/content/{id}                             delete page/attachment
//! GET    /rest/api/content/{id}?expand=body.storage,version full page read
//! GET    /rest/api/content/{id}/child/page                  children (paginated)
//! GET    /rest/api/content/search?cql=…                     title lookup, parent-scoped
//! POST   /rest/api/content/{id}/child/attachment            create attachment (multipart)
//! POST   /rest/api/content/{id}/child/attachment/{aid}/data replace attachment content
//! GET    /rest/api/content/{id}/child/attachment            list / filename lookup
//! GET|POST|DELETE /rest/api/content/{id}/property[/{key}]   hash properties
//! GET|POST|DELETE /rest/api/content/{id}/label              labels
//! ```
//!
//! Every call blocks until its response is available; a 30s call-level
//! timeout is enforced here (the engine itself never retries or times out).
//! Success is any status in 200..=206. Property and label deletes tolerate
//! 404 — deleting something already gone is not an error.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::RemoteClient;
use crate::error::ClientError;
use crate::payloads::{label_payloads, PagePayload, PropertyPayload};
use crate::types::{RemoteAttachment, RemotePage};

/// Results per pagination batch. A batch of exactly this size does not prove
/// more data exists, but always triggers one extra fetch to confirm.
const PAGE_LIMIT: usize = 25;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production client for the remote content store's REST API.
#[derive(Debug)]
pub struct RestClient {
    base_url: String,
    space_key: String,
    credentials: Option<(String, String)>,
    http: Client,
}

impl RestClient {
    /// Build a client for the store at `base_url` (no trailing slash needed),
    /// scoped to `space_key`, optionally authenticating with basic auth.
    pub fn new(
        base_url: &str,
        space_key: &str,
        credentials: Option<(String, String)>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Init { source })?;
        Ok(Self {
            base_url,
            space_key: space_key.to_owned(),
            credentials,
            http,
        })
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String, ClientError> {
        let full = format!("{}/rest/api{}", self.base_url, path);
        if params.is_empty() {
            return Ok(full);
        }
        let url =
            Url::parse_with_params(&full, params).map_err(|e| ClientError::InvalidUrl {
                url: full.clone(),
                message: e.to_string(),
            })?;
        Ok(url.into())
    }

    fn authenticated(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }

    /// Send `builder`, translating transport failures; the response status is
    /// not inspected here.
    fn dispatch(
        &self,
        method: &Method,
        url: &str,
        request_body: Option<&str>,
        builder: RequestBuilder,
    ) -> Result<Response, ClientError> {
        tracing::debug!("{method} {url}");
        self.authenticated(builder).send().map_err(|e| {
            ClientError::transport_failure(
                method.as_str(),
                url,
                request_body.map(str::to_owned),
                e.to_string(),
            )
        })
    }

    /// JSON request with optional payload; fails on any non-2xx status.
    fn json_request<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&B>,
    ) -> Result<Response, ClientError> {
        let request_body = match payload {
            Some(p) => Some(serde_json::to_string(p).map_err(|e| {
                ClientError::UnexpectedResponse {
                    url: url.to_owned(),
                    message: format!("could not serialize request payload: {e}"),
                }
            })?),
            None => None,
        };
        let mut builder = self.http.request(method.clone(), url);
        if let Some(body) = &request_body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        let response = self.dispatch(&method, url, request_body.as_deref(), builder)?;
        require_success(response, method.as_str(), url, request_body)
    }

    /// Multipart upload; `X-Atlassian-Token: nocheck` disables XSRF rejection
    /// of programmatic file uploads.
    fn multipart_request(
        &self,
        url: &str,
        form: Form,
        body_description: String,
    ) -> Result<Response, ClientError> {
        let builder = self
            .http
            .post(url)
            .header("X-Atlassian-Token", "nocheck")
            .multipart(form);
        let response = self.dispatch(&Method::POST, url, Some(&body_description), builder)?;
        require_success(response, "POST", url, Some(body_description))
    }

    fn get_paginated<T, R>(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
        map: impl Fn(R) -> T,
    ) -> Result<Vec<T>, ClientError>
    where
        R: DeserializeOwned,
    {
        drain_paginated(PAGE_LIMIT, |start, limit| {
            let start = start.to_string();
            let limit = limit.to_string();
            let mut params = vec![("limit", limit.as_str()), ("start", start.as_str())];
            params.extend_from_slice(extra_params);
            let url = self.endpoint(path, &params)?;
            let response = self.json_request::<()>(Method::GET, &url, None)?;
            let envelope: ResultsEnvelope<R> = parse_json(response, &url)?;
            Ok(envelope.results.into_iter().map(&map).collect())
        })
    }
}

/// Keep fetching batches until one comes back strictly smaller than `limit`.
pub(crate) fn drain_paginated<T, F>(limit: usize, mut fetch: F) -> Result<Vec<T>, ClientError>
where
    F: FnMut(usize, usize) -> Result<Vec<T>, ClientError>,
{
    let mut all = Vec::new();
    let mut start = 0;
    loop {
        let batch = fetch(start, limit)?;
        let fetched = batch.len();
        all.extend(batch);
        if fetched < limit {
            return Ok(all);
        }
        start += fetched;
    }
}

fn require_success(
    response: Response,
    method: &str,
    url: &str,
    request_body: Option<String>,
) -> Result<Response, ClientError> {
    let status = response.status().as_u16();
    if (200..=206).contains(&status) {
        return Ok(response);
    }
    let response_body = response.text().unwrap_or_default();
    Err(ClientError::status_failure(
        method,
        url,
        request_body,
        status,
        response_body,
    ))
}

fn parse_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ClientError> {
    response.json().map_err(|e| ClientError::UnexpectedResponse {
        url: url.to_owned(),
        message: e.to_string(),
    })
}

/// Escape a string for use inside a double-quoted CQL literal.
fn cql_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IdResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageResult {
    id: String,
    #[serde(default)]
    title: String,
    version: Option<VersionResult>,
    body: Option<BodyResult>,
}

#[derive(Debug, Deserialize)]
struct VersionResult {
    number: i32,
}

#[derive(Debug, Deserialize)]
struct BodyResult {
    storage: Option<StorageResult>,
}

#[derive(Debug, Deserialize)]
struct StorageResult {
    value: String,
}

#[derive(Debug, Deserialize)]
struct AttachmentResult {
    id: String,
    #[serde(default)]
    title: String,
    version: Option<VersionResult>,
    #[serde(rename = "_links")]
    links: Option<LinksResult>,
}

#[derive(Debug, Deserialize)]
struct LinksResult {
    download: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResult {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PropertyResult {
    value: serde_json::Value,
}

fn remote_page_without_content(page: PageResult) -> RemotePage {
    let version = page.version.map(|v| v.number).unwrap_or(1);
    RemotePage::without_content(page.id, page.title, version)
}

fn remote_attachment(attachment: AttachmentResult) -> RemoteAttachment {
    RemoteAttachment {
        version: attachment.version.map(|v| v.number).unwrap_or(1),
        download_link: attachment
            .links
            .and_then(|l| l.download)
            .unwrap_or_default(),
        id: attachment.id,
        title: attachment.title,
    }
}

fn property_value_as_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RemoteClient implementation
// ---------------------------------------------------------------------------

impl RemoteClient for RestClient {
    fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        content: &str,
        version_message: Option<&str>,
    ) -> Result<String, ClientError> {
        let url = self.endpoint("/content", &[])?;
        let payload =
            PagePayload::create(&self.space_key, parent_id, title, content, version_message);
        let response = self.json_request(Method::POST, &url, Some(&payload))?;
        let created: IdResult = parse_json(response, &url)?;
        Ok(created.id)
    }

    fn update_page(
        &self,
        page_id: &str,
        new_parent_id: Option<&str>,
        title: &str,
        content: &str,
        new_version: i32,
        version_message: Option<&str>,
        notify_watchers: bool,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{page_id}"), &[])?;
        let payload = PagePayload::update(
            new_parent_id,
            title,
            content,
            new_version,
            version_message,
            notify_watchers,
        );
        self.json_request(Method::PUT, &url, Some(&payload))?;
        Ok(())
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{page_id}"), &[])?;
        self.json_request::<()>(Method::DELETE, &url, None)?;
        Ok(())
    }

    fn find_page_by_title(&self, parent_id: &str, title: &str) -> Result<String, ClientError> {
        let cql = format!("parent={parent_id} AND title={}", cql_quote(title));
        let url = self.endpoint("/content/search", &[("cql", cql.as_str()), ("limit", "5")])?;
        let response = self.json_request::<()>(Method::GET, &url, None)?;
        let envelope: ResultsEnvelope<IdResult> = parse_json(response, &url)?;
        let mut results = envelope.results;
        match results.len() {
            0 => Err(ClientError::not_found("page", title)),
            1 => Ok(results.remove(0).id),
            _ => Err(ClientError::ambiguous("page", title)),
        }
    }

    fn page_with_content_and_version(&self, page_id: &str) -> Result<RemotePage, ClientError> {
        let url = self.endpoint(
            &format!("/content/{page_id}"),
            &[("expand", "body.storage,version")],
        )?;
        let response = self.json_request::<()>(Method::GET, &url, None)?;
        let page: PageResult = parse_json(response, &url)?;
        let content = page
            .body
            .and_then(|b| b.storage)
            .map(|s| s.value)
            .ok_or_else(|| ClientError::UnexpectedResponse {
                url: url.clone(),
                message: "page body.storage missing from expanded response".to_owned(),
            })?;
        let version = page.version.map(|v| v.number).unwrap_or(1);
        Ok(RemotePage::with_content(page.id, page.title, content, version))
    }

    fn child_pages(&self, parent_id: &str) -> Result<Vec<RemotePage>, ClientError> {
        self.get_paginated(
            &format!("/content/{parent_id}/child/page"),
            &[("expand", "version")],
            remote_page_without_content,
        )
    }

    fn create_attachment(
        &self,
        page_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<RemoteAttachment, ClientError> {
        let url = self.endpoint(&format!("/content/{page_id}/child/attachment"), &[])?;
        let part = Part::bytes(data.to_vec()).file_name(file_name.to_owned());
        let form = Form::new().part("file", part);
        let description = format!("multipart file '{file_name}' ({} bytes)", data.len());
        let response = self.multipart_request(&url, form, description)?;
        let envelope: ResultsEnvelope<AttachmentResult> = parse_json(response, &url)?;
        envelope
            .results
            .into_iter()
            .next()
            .map(remote_attachment)
            .ok_or_else(|| ClientError::UnexpectedResponse {
                url,
                message: "attachment upload returned no result".to_owned(),
            })
    }

    fn update_attachment_content(
        &self,
        page_id: &str,
        attachment_id: &str,
        data: &[u8],
        notify_watchers: bool,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(
            &format!("/content/{page_id}/child/attachment/{attachment_id}/data"),
            &[],
        )?;
        let part = Part::bytes(data.to_vec());
        let mut form = Form::new().part("file", part);
        if !notify_watchers {
            form = form.text("minorEdit", "true");
        }
        let description = format!("multipart content replace ({} bytes)", data.len());
        self.multipart_request(&url, form, description)?;
        Ok(())
    }

    fn delete_attachment(&self, attachment_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{attachment_id}"), &[])?;
        self.json_request::<()>(Method::DELETE, &url, None)?;
        Ok(())
    }

    fn find_attachment_by_file_name(
        &self,
        page_id: &str,
        file_name: &str,
    ) -> Result<RemoteAttachment, ClientError> {
        let url = self.endpoint(
            &format!("/content/{page_id}/child/attachment"),
            &[("filename", file_name), ("expand", "version")],
        )?;
        let response = self.json_request::<()>(Method::GET, &url, None)?;
        let envelope: ResultsEnvelope<AttachmentResult> = parse_json(response, &url)?;
        let mut results = envelope.results;
        match results.len() {
            0 => Err(ClientError::not_found("attachment", file_name)),
            1 => Ok(remote_attachment(results.remove(0))),
            _ => Err(ClientError::ambiguous("attachment", file_name)),
        }
    }

    fn attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ClientError> {
        self.get_paginated(
            &format!("/content/{page_id}/child/attachment"),
            &[("expand", "version")],
            remote_attachment,
        )
    }

    fn property(&self, entity_id: &str, key: &str) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(
            &format!("/content/{entity_id}/property/{key}"),
            &[("expand", "value")],
        )?;
        let builder = self.http.get(&url);
        let response = self.dispatch(&Method::GET, &url, None, builder)?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = require_success(response, "GET", &url, None)?;
        let property: PropertyResult = parse_json(response, &url)?;
        Ok(Some(property_value_as_string(property.value)))
    }

    fn set_property(&self, entity_id: &str, key: &str, value: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{entity_id}/property"), &[])?;
        let payload = PropertyPayload {
            key: key.to_owned(),
            value: value.to_owned(),
        };
        self.json_request(Method::POST, &url, Some(&payload))?;
        Ok(())
    }

    fn delete_property(&self, entity_id: &str, key: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{entity_id}/property/{key}"), &[])?;
        let builder = self.http.delete(&url);
        let response = self.dispatch(&Method::DELETE, &url, None, builder)?;
        if response.status().as_u16() == 404 {
            return Ok(());
        }
        require_success(response, "DELETE", &url, None)?;
        Ok(())
    }

    fn labels(&self, page_id: &str) -> Result<Vec<String>, ClientError> {
        self.get_paginated(&format!("/content/{page_id}/label"), &[], |label: LabelResult| {
            label.name
        })
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ClientError> {
        if labels.is_empty() {
            return Ok(());
        }
        let url = self.endpoint(&format!("/content/{page_id}/label"), &[])?;
        let payload = label_payloads(labels);
        self.json_request(Method::POST, &url, Some(&payload))?;
        Ok(())
    }

    fn delete_label(&self, page_id: &str, label: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/content/{page_id}/label"), &[("name", label)])?;
        let builder = self.http.delete(&url);
        let response = self.dispatch(&Method::DELETE, &url, None, builder)?;
        if response.status().as_u16() == 404 {
            return Ok(());
        }
        require_success(response, "DELETE", &url, None)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
