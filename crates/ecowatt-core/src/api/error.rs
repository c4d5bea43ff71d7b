use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message shown when the server gives no `detail`.
pub const FALLBACK_MESSAGE: &str = "Request failed, please try again later";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// A failed exchange as the transport saw it, before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Status {status}: {}", truncate_body(.body))]
    Status { status: StatusCode, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(String),
}

/// Errors returned to callers of the client and endpoint wrappers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 from the server. The local credential has already been cleared.
    #[error("{0}")]
    Unauthorized(String),

    /// 404 on a silent request. Means "no data yet", not a fault.
    #[error("Resource not found: {0}")]
    NotFound(HttpError),

    #[error("{0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's human-readable `detail` message, if it sent a non-empty one.
    pub fn detail(&self) -> Option<String> {
        let HttpError::Status { body, .. } = self else {
            return None;
        };
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail {
            Some(Value::String(detail)) if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }

    /// `detail()` or the fixed fallback message.
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16, body: &str) -> HttpError {
        HttpError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_detail_extracted_from_body() {
        let err = status_error(400, r#"{"detail":"Family info already exists"}"#);
        assert_eq!(err.detail().as_deref(), Some("Family info already exists"));
        assert_eq!(err.user_message(), "Family info already exists");
    }

    #[test]
    fn test_detail_fallbacks() {
        // No body, non-JSON body, empty detail, and validation-error arrays all fall back
        for body in ["", "<html>oops</html>", r#"{"detail":""}"#, r#"{"detail":[{"loc":["body"]}]}"#, "{}"] {
            let err = status_error(422, body);
            assert_eq!(err.detail(), None, "body: {}", body);
            assert_eq!(err.user_message(), FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn test_transport_errors_have_no_status() {
        assert_eq!(HttpError::Timeout.status(), None);
        assert_eq!(HttpError::Timeout.user_message(), FALLBACK_MESSAGE);
        assert_eq!(HttpError::Transport("refused".into()).detail(), None);
    }

    #[test]
    fn test_long_bodies_are_truncated_in_display() {
        let body = "é".repeat(400);
        let err = status_error(500, &body);
        let shown = err.to_string();
        assert!(shown.contains("truncated, 800 total bytes"));
        assert!(shown.len() < body.len());
    }
}
