// src/api/error.rs
use serde::Deserialize;
use thiserror::Error;

pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check your connection and try again.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Why a request never got a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Connect,
    Timeout,
    Aborted,
}

/// Every failure the HTTP layer can hand back to a controller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Server {
        status: u16,
        status_text: Option<String>,
        message: Option<String>,
    },

    /// The request was sent (or attempted) but no response arrived.
    #[error("no response from server ({kind:?}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// The request could not be built or its payload prepared.
    #[error("request setup failed: {message}")]
    Setup { message: String },

    #[error("unexpected error: {message}")]
    Unknown { message: String },
}

// Error bodies returned by the backend services
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Only failures without a response are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Single human-readable line for inline errors and toasts.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { status_text, message, .. } => {
                let detail = message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .or_else(|| status_text.as_deref().filter(|s| !s.is_empty()))
                    .unwrap_or("Unknown error");
                format!("Server error: {}", detail)
            }
            ApiError::Network { .. } => NO_RESPONSE_MESSAGE.to_string(),
            ApiError::Setup { message } => format!("Error: {}", message),
            ApiError::Unknown { .. } => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn setup(message: impl Into<String>) -> Self {
        ApiError::Setup { message: message.into() }
    }

    /// Build a server error from a status and the raw response body.
    pub fn from_response(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        ApiError::Server {
            status: status.as_u16(),
            status_text: status.canonical_reason().map(str::to_string),
            message: parsed.message.or(parsed.error),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();

        if err.is_builder() {
            ApiError::Setup { message }
        } else if err.is_timeout() {
            ApiError::Network { kind: NetworkErrorKind::Timeout, message }
        } else if err.is_connect() {
            ApiError::Network { kind: NetworkErrorKind::Connect, message }
        } else if let Some(status) = err.status() {
            ApiError::Server {
                status: status.as_u16(),
                status_text: status.canonical_reason().map(str::to_string),
                message: None,
            }
        } else if err.is_request() {
            ApiError::Network { kind: NetworkErrorKind::Aborted, message }
        } else {
            // Decode and body failures: a response arrived but was unusable
            ApiError::Unknown { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn server_message_wins() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, br#"{"message":"X"}"#);
        assert_eq!(err.user_message(), "Server error: X");
    }

    #[test]
    fn backend_error_field_is_used_when_message_missing() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"error":"Please provide a valid password string"}"#,
        );
        assert_eq!(err.user_message(), "Server error: Please provide a valid password string");
    }

    #[test]
    fn falls_back_to_status_text() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.user_message(), "Server error: Internal Server Error");
    }

    #[test]
    fn unknown_when_nothing_to_show() {
        let err = ApiError::Server { status: 599, status_text: None, message: Some(String::new()) };
        assert_eq!(err.user_message(), "Server error: Unknown error");
    }

    #[test]
    fn network_failures_get_fixed_message() {
        for kind in [NetworkErrorKind::Connect, NetworkErrorKind::Timeout, NetworkErrorKind::Aborted] {
            let err = ApiError::Network { kind, message: "connection refused".into() };
            assert_eq!(err.user_message(), NO_RESPONSE_MESSAGE);
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn setup_and_unknown_shapes() {
        assert_eq!(ApiError::setup("missing file").user_message(), "Error: missing file");
        let unknown = ApiError::Unknown { message: "bad json".into() };
        assert_eq!(unknown.user_message(), UNEXPECTED_ERROR_MESSAGE);
        assert!(!unknown.is_retryable());
    }

    #[test]
    fn server_errors_are_not_retryable() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, b"{}");
        assert!(!err.is_retryable());
    }

    #[test]
    fn invalid_url_is_a_setup_error() {
        let err: ApiError = reqwest::Client::new().get("not a url").build().unwrap_err().into();
        assert!(matches!(err, ApiError::Setup { .. }));
    }
}
