//! The two pipeline stages, as pure functions.
//!
//! The client core composes these around the transport call and applies the
//! side effects a `Disposition` asks for.

use reqwest::header::{self, HeaderValue};
use reqwest::{Request, StatusCode};
use serde_json::Value;
use tracing::warn;

use super::{HttpError, RequestContext};

/// What the inbound stage decided to do about a failed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// 401: clear the credential if one is stored, go to login, notify, reject with `message`.
    AuthRejected {
        message: String,
        clear_credential: bool,
    },
    /// 404 on a silent request: reject with the original error, no notification.
    ExpectedAbsence,
    /// Anything else: notify and reject with `message`.
    Failure { message: String },
}

/// Outbound stage: attach `token` as a bearer credential unless it is empty.
pub fn attach_credential(request: &mut Request, token: &str) {
    if token.is_empty() {
        return;
    }
    match HeaderValue::from_str(&format!("Bearer {}", token)) {
        Ok(mut value) => {
            value.set_sensitive(true);
            request.headers_mut().insert(header::AUTHORIZATION, value);
        }
        Err(e) => {
            warn!(error = %e, "Stored credential is not a valid header value, sending unauthenticated");
        }
    }
}

/// Inbound stage, success path: keep only the decoded payload.
///
/// Empty bodies become `null`; bodies that are not JSON come back as a string.
pub fn unwrap_payload(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Inbound stage, failure path.
///
/// 401 is checked before the silent-404 exemption, so a silent request that
/// gets a 401 still signs the user out.
pub fn classify(error: &HttpError, context: &RequestContext, has_credential: bool) -> Disposition {
    match error.status() {
        Some(StatusCode::UNAUTHORIZED) => Disposition::AuthRejected {
            message: error.user_message(),
            clear_credential: has_credential,
        },
        Some(StatusCode::NOT_FOUND) if context.silent => Disposition::ExpectedAbsence,
        _ => Disposition::Failure {
            message: error.user_message(),
        },
    }
}
