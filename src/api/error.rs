//! Failure classification for backend round trips
//!
//! A [`Failure`] is the raw, unclassified outcome of a failed call. The request
//! pipeline turns it into an [`ApiError`] by fixed precedence:
//! no connection, 404, 5xx, then server-supplied message or transport message.

use serde::Deserialize;
use std::fmt;

pub const UNREACHABLE_MESSAGE: &str = "Cannot connect to server";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Raw failure of one round trip, before classification
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// HTTP status, `None` when no response arrived (status 0)
    pub status: Option<u16>,
    /// `message` field of a JSON error body, when the backend sent one
    pub server_message: Option<String>,
    /// Generic transport description, used when nothing better exists
    pub transport_message: String,
    /// Underlying error text, for logs only
    pub detail: Option<String>,
}

/// Error body shape: `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl Failure {
    /// No response at all (refused, DNS, reset, ...)
    pub fn unreachable(url: &str, detail: impl fmt::Display) -> Self {
        Self {
            status: None,
            server_message: None,
            transport_message: format!("Http failure response for {url}: 0 Unknown Error"),
            detail: Some(detail.to_string()),
        }
    }

    /// Non-2xx response; picks up `message` from a JSON body if present
    pub fn from_response(url: &str, status: u16, reason: Option<&str>, body: &str) -> Self {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        Self {
            status: Some(status),
            server_message,
            transport_message: format!(
                "Http failure response for {url}: {status} {}",
                reason.unwrap_or("Unknown")
            ),
            detail: None,
        }
    }

    /// 2xx response whose body could not be decoded
    pub fn decode(url: &str, status: u16, detail: impl fmt::Display) -> Self {
        Self {
            status: Some(status),
            server_message: None,
            transport_message: format!("Http failure during parsing for {url}"),
            detail: Some(detail.to_string()),
        }
    }
}

/// Classified backend error; `Display` is the user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Backend unreachable
    Unreachable,
    /// 404
    NotFound,
    /// 5xx
    Server { status: u16 },
    /// Anything else: other 4xx, undecodable bodies
    Client { status: u16, message: String },
}

impl ApiError {
    pub fn classify(failure: &Failure) -> Self {
        match failure.status {
            None | Some(0) => ApiError::Unreachable,
            Some(404) => ApiError::NotFound,
            Some(status) if status >= 500 => ApiError::Server { status },
            Some(status) => ApiError::Client {
                status,
                message: failure
                    .server_message
                    .clone()
                    .unwrap_or_else(|| failure.transport_message.clone()),
            },
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unreachable => None,
            ApiError::NotFound => Some(404),
            ApiError::Server { status } | ApiError::Client { status, .. } => Some(*status),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unreachable => f.write_str(UNREACHABLE_MESSAGE),
            ApiError::NotFound => f.write_str(NOT_FOUND_MESSAGE),
            ApiError::Server { .. } => f.write_str(SERVER_ERROR_MESSAGE),
            ApiError::Client { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:3000/heroes";

    #[test]
    fn test_no_connection_is_unreachable() {
        let failure = Failure::unreachable(URL, "connection refused");
        let err = ApiError::classify(&failure);
        assert_eq!(err, ApiError::Unreachable);
        assert_eq!(err.to_string(), "Cannot connect to server");
    }

    #[test]
    fn test_status_zero_is_unreachable() {
        let failure = Failure::from_response(URL, 0, None, "");
        assert_eq!(ApiError::classify(&failure), ApiError::Unreachable);
    }

    #[test]
    fn test_404_is_not_found_even_with_message() {
        let failure =
            Failure::from_response(URL, 404, Some("Not Found"), r#"{"message":"no such hero"}"#);
        let err = ApiError::classify(&failure);
        assert_eq!(err, ApiError::NotFound);
        assert_eq!(err.to_string(), "Resource not found");
    }

    #[test]
    fn test_5xx_is_server_error() {
        for status in [500, 502, 503] {
            let failure = Failure::from_response(URL, status, None, r#"{"message":"db down"}"#);
            let err = ApiError::classify(&failure);
            assert_eq!(err, ApiError::Server { status });
            assert_eq!(err.to_string(), "Server error");
        }
    }

    #[test]
    fn test_400_surfaces_server_message() {
        let failure = Failure::from_response(
            URL,
            400,
            Some("Bad Request"),
            r#"{"message":"Hero with id 'dc-batman' already exists"}"#,
        );
        let err = ApiError::classify(&failure);
        assert_eq!(err.to_string(), "Hero with id 'dc-batman' already exists");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_400_without_message_uses_transport_message() {
        let failure = Failure::from_response(URL, 409, Some("Conflict"), "not json");
        let err = ApiError::classify(&failure);
        assert_eq!(
            err.to_string(),
            "Http failure response for http://localhost:3000/heroes: 409 Conflict"
        );
    }

    #[test]
    fn test_blank_server_message_is_ignored() {
        let failure = Failure::from_response(URL, 422, None, r#"{"message":"  "}"#);
        assert!(failure.server_message.is_none());
    }

    #[test]
    fn test_decode_failure_is_client_error() {
        let failure = Failure::decode(URL, 200, "expected value at line 1");
        let err = ApiError::classify(&failure);
        assert_eq!(
            err,
            ApiError::Client {
                status: 200,
                message: "Http failure during parsing for http://localhost:3000/heroes".into()
            }
        );
    }
}
