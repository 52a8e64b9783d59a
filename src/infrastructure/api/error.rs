//! Failure taxonomy for Token API requests

use std::fmt;

use serde_json::Value;

use crate::config::CREDENTIAL_ENV;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// No bearer credential configured; raised before any network call
    #[error("API token is missing. Please set {} in your environment.", CREDENTIAL_ENV)]
    MissingCredential,

    /// Address failed local validation; `expected` names the address kind
    #[error("Invalid EVM {expected} address provided. Address must start with 0x.")]
    InvalidAddress { expected: &'static str },

    /// Page, limit or age outside the range the API accepts
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Non-2xx response
    #[error("API request failed with status {status}. Body: {body}")]
    HttpError { status: u16, body: ErrorBody },

    /// Connection, DNS or timeout failure
    #[error("Network request failed: {cause}")]
    TransportError { cause: String },

    /// 2xx response whose body could not be decoded
    #[error("Could not decode API response: {cause}")]
    Decode { cause: String },
}

impl FetchError {
    /// True for failures detected before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            FetchError::MissingCredential
                | FetchError::InvalidAddress { .. }
                | FetchError::InvalidParameter { .. }
        )
    }
}

/// Error response body, parsed as JSON when possible
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(raw),
        }
    }

    /// The server's `message` field, when the body is a JSON object carrying one
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value.get("message").and_then(Value::as_str),
            ErrorBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{value}"),
            ErrorBody::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_parsing() {
        let body = ErrorBody::parse(r#"{"message":"not found"}"#.to_string());
        assert_eq!(body, ErrorBody::Json(json!({ "message": "not found" })));
        assert_eq!(body.message(), Some("not found"));

        let body = ErrorBody::parse("Bad Gateway".to_string());
        assert_eq!(body, ErrorBody::Text("Bad Gateway".to_string()));
        assert_eq!(body.message(), None);
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = FetchError::InvalidAddress { expected: "token" };
        assert_eq!(
            err.to_string(),
            "Invalid EVM token address provided. Address must start with 0x."
        );

        let err = FetchError::HttpError {
            status: 404,
            body: ErrorBody::Json(json!({ "message": "not found" })),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains(r#"{"message":"not found"}"#));
        assert!(!err.is_local());
        assert!(FetchError::MissingCredential.is_local());
    }
}
