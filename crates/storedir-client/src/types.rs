//! Normalized response envelope shared by every endpoint.

use crate::error::ClientError;

pub const SUCCESS_MESSAGE: &str = "Fetched successfully";
pub const FAILURE_MESSAGE: &str = "An error occurred";

/// Uniform result of an API call.
///
/// `success == false` always comes with an empty `data` list. `status` is the
/// HTTP status when a response was received and 500 otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub success: bool,
    pub data: Vec<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn ok(status: u16, data: Vec<T>, message: Option<String>) -> Self {
        Self {
            status,
            success: true,
            data,
            message: message.unwrap_or_else(|| SUCCESS_MESSAGE.to_owned()),
        }
    }

    #[must_use]
    pub fn failure(status: u16, message: Option<String>) -> Self {
        Self {
            status,
            success: false,
            data: Vec::new(),
            message: message.unwrap_or_else(|| FAILURE_MESSAGE.to_owned()),
        }
    }

    #[must_use]
    pub fn from_error(err: &ClientError) -> Self {
        Self::failure(err.status(), err.server_message().map(str::to_owned))
    }
}

/// Reads a top-level `message` string from a JSON body, if any.
pub(crate) fn body_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

/// Pulls the record list out of a bare list or a `{ "data": [...] }` envelope.
///
/// `null`, a missing body and a missing `data` field all mean "no records".
/// Returns `None` for any other shape.
pub(crate) fn extract_records(body: serde_json::Value) -> Option<Vec<serde_json::Value>> {
    match body {
        serde_json::Value::Array(items) => Some(items),
        serde_json::Value::Null => Some(Vec::new()),
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(items)) => Some(items),
            Some(serde_json::Value::Null) | None => Some(Vec::new()),
            Some(_) => None,
        },
        _ => None,
    }
}
