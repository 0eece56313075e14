//! Schema and interface loading.
//!
//! Handles schema text from files and strings, saved interface responses,
//! and live interface descriptions fetched from the platform over HTTP.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::schema::Schema;
use crate::types::{InterfaceData, InterfaceResponse};

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Interface endpoint, relative to the platform's base URL.
pub const INTERFACE_ENDPOINT: &str = "/api/interface/get";

/// Editor residue the platform leaves inside stored schema text.
const COMMENT_RESIDUE: &str = "注释\\n\\t";

/// Remove platform editor residue from raw schema text.
///
/// Strips literal `注释\n\t` sequences (escaped newline and tab, as they
/// appear inside JSON strings) and `<p>` tags in any case.
pub fn sanitize_schema_text(text: &str) -> String {
    let text = text.replace(COMMENT_RESIDUE, "");
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("<p>")) {
            rest = &tail[3..];
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Load a schema from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the cleaned text isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    let value: Value = serde_json::from_str(&sanitize_schema_text(content))
        .map_err(|source| LoadError::InvalidJson { source })?;
    Ok(Schema::from_value(value))
}

/// Load a schema from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    load_schema_str(&read_file(path)?)
}

/// Parse a saved interface response.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` for malformed text and
/// `LoadError::Acquisition` if the response reports a failure.
pub fn load_interface_str(content: &str) -> Result<InterfaceData, LoadError> {
    let response: InterfaceResponse =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    response.into_data()
}

/// Load a saved interface response from a file.
pub fn load_interface(path: &Path) -> Result<InterfaceData, LoadError> {
    load_interface_str(&read_file(path)?)
}

/// Fetch an interface description from the platform.
///
/// Sends `GET {base_url}/api/interface/get?id={id}`, forwarding `cookie`
/// (the user's session) when given.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the body isn't
/// JSON, and `LoadError::Acquisition` if the platform reports a failure.
#[cfg(feature = "remote")]
pub fn load_interface_url(
    base_url: &str,
    id: &str,
    cookie: Option<&str>,
) -> Result<InterfaceData, LoadError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), INTERFACE_ENDPOINT);
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.clone(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let mut request = client.get(&url).query(&[("id", id)]);
    if let Some(cookie) = cookie {
        request = request.header(reqwest::header::COOKIE, cookie);
    }

    tracing::debug!(url = %url, id, "fetching interface");
    let response = request
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(network_error)?;

    let envelope: InterfaceResponse = response.json().map_err(network_error)?;
    envelope.into_data()
}

/// Load an interface from a page URL, a bare id, or a saved response file.
///
/// URLs and ids are fetched (URLs supply their own origin unless `base_url`
/// is given); anything else is read as a file.
#[cfg(feature = "remote")]
pub fn load_interface_auto(
    source: &str,
    base_url: Option<&str>,
    cookie: Option<&str>,
) -> Result<InterfaceData, LoadError> {
    let id_and_base = if is_url(source) {
        interface_id_from_url(source).map(|id| (id, base_url.or_else(|| url_origin(source))))
    } else if !source.is_empty() && source.chars().all(|c| c.is_ascii_digit()) {
        Some((source.to_string(), base_url))
    } else {
        None
    };

    match id_and_base {
        Some((id, Some(base))) => load_interface_url(base, &id, cookie),
        Some((_, None)) => Err(LoadError::InvalidSource {
            input: source.to_string(),
            message: "a base URL is required to fetch an interface by id".to_string(),
        }),
        None if is_url(source) => Err(LoadError::InvalidSource {
            input: source.to_string(),
            message: "URL does not end with an interface id".to_string(),
        }),
        None => load_interface(Path::new(source)),
    }
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// The interface id at the end of a platform page URL.
///
/// `https://yapi.example.com/project/7/interface/api/1234?x=1` -> `1234`
pub fn interface_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| segment.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// `scheme://host[:port]` of a URL.
pub fn url_origin(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")? + 3;
    let host_end = url[scheme_end..]
        .find(['/', '?', '#'])
        .map_or(url.len(), |pos| scheme_end + pos);
    (host_end > scheme_end).then(|| &url[..host_end])
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
