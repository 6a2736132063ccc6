//! Shared request plumbing: URL building, auth header, status mapping.

use crate::error::{ClientError, Result};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Join `path` onto the normalized base URL.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    Url::parse(&format!("{}{}", base_url, path))
        .map_err(|e| ClientError::InvalidUrl(format!("{}{}: {}", base_url, path, e)))
}

/// `{base}/entries/{id}` with the ID percent-encoded as one path segment.
///
/// Blank, `.` and `..` IDs are rejected: they would not name an entry.
pub(crate) fn entry_endpoint(base_url: &str, id: &str) -> Result<Url> {
    if matches!(id.trim(), "" | "." | "..") {
        return Err(ClientError::InvalidUrl(format!("Invalid entry id: {:?}", id)));
    }

    let mut url = endpoint(base_url, "/entries")?;
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(format!("{}: cannot hold a path", base_url)))?
        .push(id);
    Ok(url)
}

/// Send one request.
///
/// The bearer header is attached only when a token is given, and the JSON
/// content type only when a body is given. Any non-2xx status becomes
/// `ClientError::Api`; nothing is retried here.
pub(crate) async fn send<B>(
    http: &Client,
    method: Method,
    url: Url,
    token: Option<&str>,
    body: Option<&B>,
) -> Result<Response>
where
    B: Serialize + ?Sized,
{
    debug!(method = %method, url = %url, authenticated = token.is_some(), "Sending request");

    let mut request = http.request(method, url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = if error_text.trim().is_empty() {
        status_line(status)
    } else {
        error_text
    };

    warn!(status = status.as_u16(), error = %message, "Request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body; `what` names the payload in parse errors.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
