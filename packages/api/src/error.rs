//! Error taxonomy for calls to the attendance service.

use serde_json::Value;
use thiserror::Error;

const FALLBACK_SERVER_MESSAGE: &str = "Server Error.";

/// Errors from the attendance service client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// HTTP 422 with per-field messages, flattened into one list.
    #[error("validation failed: {}", messages.join("; "))]
    Validation { messages: Vec<String> },

    /// HTTP 401. The unauthorized hook has already run when this is returned.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The owning view went away and aborted the request.
    #[error("request canceled")]
    Canceled,

    /// The request never produced a response (DNS, CORS, connection reset).
    #[error("request failed: {0}")]
    Network(String),

    /// Any other non-2xx status.
    #[error("service error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose envelope carried `error: true`.
    #[error("{message}")]
    Rejected { message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response from its status and raw body.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let json: Option<Value> = serde_json::from_slice(body).ok();
        let message = json.as_ref().and_then(body_message);

        match status {
            401 => ApiError::Unauthorized {
                message: message.unwrap_or_else(|| "Unauthorized".to_string()),
            },
            422 => {
                let messages = json
                    .as_ref()
                    .and_then(|v| v.get("invalidFields"))
                    .map(flatten_invalid_fields)
                    .filter(|m| !m.is_empty())
                    .or_else(|| message.map(|m| vec![m]))
                    .unwrap_or_default();
                ApiError::Validation { messages }
            }
            _ => ApiError::Server {
                status,
                message: message.unwrap_or_else(|| FALLBACK_SERVER_MESSAGE.to_string()),
            },
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, ApiError::Canceled)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text to show the user, `None` for canceled requests.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ApiError::Canceled => None,
            ApiError::Validation { messages } => Some(messages.join("\n")),
            ApiError::Unauthorized { message }
            | ApiError::Server { message, .. }
            | ApiError::Rejected { message } => Some(message.clone()),
            ApiError::Network(e) => Some(format!("Request Error: {e}")),
            ApiError::Decode(_) => Some(FALLBACK_SERVER_MESSAGE.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// `message`, then `errorMessage`, then a string-valued `error`.
fn body_message(body: &Value) -> Option<String> {
    ["message", "errorMessage", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// `{"field": ["a", "b"], "other": "c"}` becomes `["a", "b", "c"]`.
fn flatten_invalid_fields(fields: &Value) -> Vec<String> {
    let Some(map) = fields.as_object() else {
        return Vec::new();
    };
    let mut messages = Vec::new();
    for value in map.values() {
        match value {
            Value::String(m) => messages.push(m.clone()),
            Value::Array(items) => {
                messages.extend(items.iter().filter_map(Value::as_str).map(str::to_string))
            }
            _ => {}
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_422_flattens_invalid_fields() {
        let body = br#"{"invalidFields": {"email": ["is required", "must be an email"], "password": "is required"}}"#;
        assert_eq!(
            ApiError::from_status(422, body),
            ApiError::Validation {
                messages: vec![
                    "is required".to_string(),
                    "must be an email".to_string(),
                    "is required".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_422_without_fields_uses_message() {
        let err = ApiError::from_status(422, br#"{"message": "Bad input"}"#);
        assert_eq!(err.user_message().as_deref(), Some("Bad input"));
    }

    #[test]
    fn test_server_message_fallback_chain() {
        let err = ApiError::from_status(500, br#"{"errorMessage": "db down"}"#);
        assert_eq!(err.user_message().as_deref(), Some("db down"));

        // The face endpoints put the reason in a string `error`
        let err = ApiError::from_status(400, br#"{"error": "Invalid file format"}"#);
        assert_eq!(err.user_message().as_deref(), Some("Invalid file format"));

        // `error: true` is not a message
        let err = ApiError::from_status(404, br#"{"error": true}"#);
        assert_eq!(err.user_message().as_deref(), Some("Server Error."));

        let err = ApiError::from_status(502, b"<html>Bad Gateway</html>");
        assert_eq!(
            err,
            ApiError::Server {
                status: 502,
                message: "Server Error.".to_string()
            }
        );
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = ApiError::from_status(401, br#"{"error": true, "message": "Authorization header is missing"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(
            err.user_message().as_deref(),
            Some("Authorization header is missing")
        );
    }

    #[test]
    fn test_canceled_is_silent() {
        assert!(ApiError::Canceled.is_canceled());
        assert_eq!(ApiError::Canceled.user_message(), None);
    }
}
