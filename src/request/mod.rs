pub mod checked;
pub mod unchecked;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::Specification;

pub use checked::{CheckedApi, CheckedRequests};
pub use unchecked::{UncheckedApi, UncheckedRequests};

/// Resource endpoint families exposed by the build server REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Users,
    Projects,
    BuildTypes,
    /// Steps live nested under their owning build type.
    Steps { build_type_id: String },
}

impl Endpoint {
    /// Collection path, used by create.
    pub fn base_path(&self) -> String {
        match self {
            Self::Users => "app/rest/users".to_string(),
            Self::Projects => "app/rest/projects".to_string(),
            Self::BuildTypes => "app/rest/buildTypes".to_string(),
            Self::Steps { build_type_id } => {
                format!("app/rest/buildTypes/{build_type_id}/steps")
            }
        }
    }

    /// Item path, used by read, update and delete.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.base_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Raw outcome of a request: status code plus body text. Unchecked
/// operations hand this to the test unjudged; checked operations interpret
/// it against the expected success class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] of kind [`RequestErrorKind::MalformedBody`]
    /// when the body does not decode into `T`; the raw body travels in the
    /// error detail.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        serde_json::from_str(&self.body).map_err(|e| RequestError {
            kind: RequestErrorKind::MalformedBody,
            message: format!("failed to decode response body: {e}"),
            detail: Some(self.body.clone()),
        })
    }
}

/// Error from the request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub message: String,
    /// The response body, when one was received.
    pub detail: Option<String>,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestError {}

/// Classification of request-layer errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The HTTP call itself failed to complete.
    Transport,
    /// Checked mode only: the status fell outside the expected success class.
    UnexpectedStatus(u16),
    /// A body could not be encoded or decoded.
    MalformedBody,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected status {status}"),
            Self::MalformedBody => write!(f, "malformed body"),
        }
    }
}

/// Assemble and send one HTTP call. Both request modes funnel through here,
/// so method, path, headers and body construction cannot drift between them.
fn send(
    spec: &Specification,
    method: Method,
    path: &str,
    body: Option<&str>,
) -> Result<RawResponse, RequestError> {
    let config = ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(spec.timeout))
        .build();
    let agent = ureq::Agent::new_with_config(config);
    let url = format!("{}/{path}", spec.base_url.trim_end_matches('/'));

    let mut headers: Vec<(&str, String)> = vec![("Accept", "application/json".to_string())];
    if body.is_some() {
        headers.push(("Content-Type", "application/json".to_string()));
    }
    if let Some(auth) = spec.credential.authorization() {
        headers.push(("Authorization", auth));
    }

    let result = match method {
        Method::Get | Method::Delete => {
            let mut req = if method == Method::Get {
                agent.get(&url)
            } else {
                agent.delete(&url)
            };
            for (key, value) in &headers {
                req = req.header(*key, value);
            }
            req.call()
        }
        Method::Post | Method::Put => {
            let mut req = if method == Method::Post {
                agent.post(&url)
            } else {
                agent.put(&url)
            };
            for (key, value) in &headers {
                req = req.header(*key, value);
            }
            match body {
                Some(payload) => req.send(payload.as_bytes()),
                None => req.send_empty(),
            }
        }
    };

    match result {
        Ok(mut response) => {
            let status = response.status().as_u16();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| RequestError {
                    kind: RequestErrorKind::Transport,
                    message: format!("failed to read response body: {e}"),
                    detail: None,
                })?;
            Ok(RawResponse { status, body })
        }
        Err(e) => Err(RequestError {
            kind: RequestErrorKind::Transport,
            message: format!("request to {url} failed: {e}"),
            detail: None,
        }),
    }
}

fn to_json(entity: &impl Serialize) -> Result<String, RequestError> {
    serde_json::to_string(entity).map_err(|e| RequestError {
        kind: RequestErrorKind::MalformedBody,
        message: format!("failed to serialize request body: {e}"),
        detail: None,
    })
}

// The four CRUD primitives shared verbatim by the checked and unchecked
// surfaces.

fn raw_create(
    spec: &Specification,
    endpoint: &Endpoint,
    entity: &impl Serialize,
) -> Result<RawResponse, RequestError> {
    let body = to_json(entity)?;
    send(spec, Method::Post, &endpoint.base_path(), Some(&body))
}

fn raw_read(
    spec: &Specification,
    endpoint: &Endpoint,
    id: &str,
) -> Result<RawResponse, RequestError> {
    send(spec, Method::Get, &endpoint.item_path(id), None)
}

fn raw_update(
    spec: &Specification,
    endpoint: &Endpoint,
    id: &str,
    entity: &impl Serialize,
) -> Result<RawResponse, RequestError> {
    let body = to_json(entity)?;
    send(spec, Method::Put, &endpoint.item_path(id), Some(&body))
}

fn raw_delete(
    spec: &Specification,
    endpoint: &Endpoint,
    id: &str,
) -> Result<RawResponse, RequestError> {
    send(spec, Method::Delete, &endpoint.item_path(id), None)
}
