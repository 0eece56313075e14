//! API platform payloads.
//!
//! YApi answers `GET /api/interface/get?id=<id>` with an envelope holding an
//! error code and, on success, the interface description. Request and
//! response bodies are JSON Schema documents embedded as strings.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Message used when the platform reports failure without one (usually an
/// expired session).
pub const DEFAULT_FAILURE_MESSAGE: &str = "please log in first";

/// Response envelope of the interface endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: Option<String>,
    #[serde(default)]
    pub data: Option<InterfaceData>,
}

impl InterfaceResponse {
    /// Unwrap the interface data, turning a reported failure into an error.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Acquisition` carrying the platform's message
    /// verbatim when `errcode` is non-zero or `data` is missing.
    pub fn into_data(self) -> Result<InterfaceData, LoadError> {
        match (self.errcode, self.data) {
            (0, Some(data)) => Ok(data),
            _ => Err(LoadError::Acquisition {
                message: self
                    .errmsg
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            }),
        }
    }
}

/// The parts of an interface description used for type generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceData {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
    /// Request body schema, as JSON text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_body_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_body_is_json_schema: Option<bool>,
    /// Response body schema, as JSON text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_body_is_json_schema: Option<bool>,
}

/// Which body of an interface a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Request,
    Response,
}

impl BodyKind {
    /// Suffix appended to the interface's base type name.
    pub fn type_suffix(&self) -> &'static str {
        match self {
            BodyKind::Request => "Request",
            BodyKind::Response => "Response",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Request => "request",
            BodyKind::Response => "response",
        }
    }
}

impl InterfaceData {
    /// Raw schema text for one body, if the platform holds a JSON Schema there.
    pub fn body(&self, kind: BodyKind) -> Option<&str> {
        let (text, is_schema) = match kind {
            BodyKind::Request => (&self.req_body_other, self.req_body_is_json_schema),
            BodyKind::Response => (&self.res_body, self.res_body_is_json_schema),
        };
        if is_schema == Some(false) {
            return None;
        }
        text.as_deref().filter(|t| !t.trim().is_empty())
    }
}
