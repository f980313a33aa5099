//! Error types for wikipub-client.

use std::fmt;

use thiserror::Error;

/// All failures a remote operation can raise.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A title or file-name lookup returned zero results. Callers treat this
    /// as "must create", not as a failure.
    #[error("no result found for {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// A title or file-name lookup returned more than one result — a naming
    /// collision the caller cannot safely resolve.
    #[error("multiple results found for {kind} '{name}'")]
    AmbiguousResult { kind: &'static str, name: String },

    /// Transport error or non-success response status.
    #[error("{0}")]
    RequestFailed(RequestFailure),

    /// The response status was fine but the body was not what the protocol
    /// promises (missing fields, unparseable JSON).
    #[error("unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    /// The underlying HTTP client could not be constructed.
    #[error("could not initialise HTTP client: {source}")]
    Init {
        #[source]
        source: reqwest::Error,
    },

    /// A request URL could not be assembled from base URL + parameters.
    #[error("could not build request URL from '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Diagnostic payload for a failed remote request.
///
/// `reason` is populated only when a lower-level transport failure triggered
/// the error; for a non-success status it stays `None` and `status` /
/// `response_body` carry the diagnosis instead.
#[derive(Debug)]
pub struct RequestFailure {
    pub method: String,
    pub url: String,
    pub request_body: Option<String>,
    pub status: Option<u16>,
    pub response_body: Option<String>,
    pub reason: Option<String>,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed", self.method, self.url)?;
        if let Some(status) = self.status {
            write!(f, " with status {status}")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        if let Some(body) = &self.request_body {
            write!(f, "; request body: {body}")?;
        }
        if let Some(body) = &self.response_body {
            write!(f, "; response body: {body}")?;
        }
        Ok(())
    }
}

impl ClientError {
    /// A non-2xx response.
    pub fn status_failure(
        method: impl Into<String>,
        url: impl Into<String>,
        request_body: Option<String>,
        status: u16,
        response_body: String,
    ) -> Self {
        ClientError::RequestFailed(RequestFailure {
            method: method.into(),
            url: url.into(),
            request_body,
            status: Some(status),
            response_body: Some(response_body),
            reason: None,
        })
    }

    /// A request that never produced a response.
    pub fn transport_failure(
        method: impl Into<String>,
        url: impl Into<String>,
        request_body: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        ClientError::RequestFailed(RequestFailure {
            method: method.into(),
            url: url.into(),
            request_body,
            status: None,
            response_body: None,
            reason: Some(reason.into()),
        })
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        ClientError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn ambiguous(kind: &'static str, name: impl Into<String>) -> Self {
        ClientError::AmbiguousResult {
            kind,
            name: name.into(),
        }
    }

    /// True for [`ClientError::NotFound`]; the one failure callers recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
