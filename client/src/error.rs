//! The single error type every request failure is normalized into.

use mailadmin_shared::api::{ApiErrorResponse, FieldError};
use thiserror::Error;

/// Status used for failures that never completed an HTTP exchange.
pub const STATUS_TRANSPORT: u16 = 0;
/// Synthetic status reported when a request is aborted by the timeout.
pub const STATUS_TIMEOUT: u16 = 408;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No HTTP exchange completed (network failure, bad URL, encoding).
    Transport,
    /// Aborted after the configured timeout.
    Timeout,
    /// The server answered but the body was not the expected JSON.
    MalformedResponse,
    /// Well-formed envelope with `success: false` or a non-2xx status.
    Application,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status_code: u16,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            status_code: STATUS_TRANSPORT,
            message: message.into(),
            errors: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: ErrorKind::Timeout,
            status_code: STATUS_TIMEOUT,
            message: "Request timeout".to_string(),
            errors: None,
        }
    }

    pub fn malformed(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            status_code,
            message: message.into(),
            errors: None,
        }
    }

    /// Build from a failure envelope, falling back to the HTTP status when the
    /// body does not carry its own.
    pub fn from_envelope(http_status: u16, body: ApiErrorResponse) -> Self {
        let status_code = body.status_code.unwrap_or(http_status);
        Self {
            kind: ErrorKind::Application,
            status_code,
            message: body
                .message
                .unwrap_or_else(|| format!("Request failed with status {}", status_code)),
            errors: body.errors,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    /// Messages reported for one request field, if any.
    pub fn field_messages(&self, field: &str) -> &[String] {
        self.errors
            .iter()
            .flatten()
            .find(|error| error.field == field)
            .map(|error| error.message.as_slice())
            .unwrap_or(&[])
    }
}

impl From<crate::transport::TransportError> for ApiError {
    fn from(err: crate::transport::TransportError) -> Self {
        ApiError::transport(err.to_string())
    }
}

/// Result type alias for client calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_envelope() {
        let body = ApiErrorResponse::new(422, "Validation failed").with_errors(vec![FieldError {
            field: "email".to_string(),
            message: vec!["invalid".to_string()],
        }]);
        let err = ApiError::from_envelope(400, body);
        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(err.status_code, 422);
        assert_eq!(err.to_string(), "Validation failed");
        assert_eq!(err.field_messages("email"), ["invalid".to_string()]);
        assert!(err.field_messages("name").is_empty());
    }

    #[test]
    fn test_from_envelope_falls_back_to_http_status() {
        let err = ApiError::from_envelope(503, ApiErrorResponse::default());
        assert_eq!(err.status_code, 503);
        assert_eq!(err.message, "Request failed with status 503");
    }

    #[test]
    fn test_timeout_and_transport_codes() {
        assert_eq!(ApiError::timeout().status_code, 408);
        assert!(ApiError::timeout().is_timeout());
        assert_eq!(ApiError::transport("connection refused").status_code, 0);
    }
}
