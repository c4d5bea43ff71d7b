//! Decoding of the credential payload segment.
//!
//! A credential is a compact signed token: `header.payload.signature`.
//! Only the payload is consumed here; signatures are checked server-side.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// URL-safe base64 that accepts payloads with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Malformed credential: expected at least 2 segments, found {0}")]
    Malformed(usize),

    #[error("Payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims carried in a credential payload, keyed by claim name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Expiry instant as a Unix timestamp in seconds.
    ///
    /// Only integer values count. Anything else is treated as absent.
    pub fn exp(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    /// The `sub` claim, which the backend fills with the numeric user id.
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    pub fn subject_id(&self) -> Option<i64> {
        self.subject().and_then(|s| s.parse().ok())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decode the payload segment, reporting why decoding failed.
pub fn try_decode_payload(token: &str) -> Result<Claims, CredentialError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 2 {
        return Err(CredentialError::Malformed(segments.len()));
    }

    let bytes = URL_SAFE_LENIENT.decode(segments[1])?;
    // Multi-byte claim values must come back intact, so decode as UTF-8 rather than latin-1
    let text = String::from_utf8(bytes)?;
    let claims: Map<String, Value> = serde_json::from_str(&text)?;

    Ok(Claims(claims))
}

/// Decode the payload segment of a credential.
///
/// Returns `None` for anything that cannot be decoded. Callers treat that
/// exactly like an expired credential.
pub fn decode_payload(token: &str) -> Option<Claims> {
    match try_decode_payload(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            warn!(error = %e, "Failed to decode credential payload");
            None
        }
    }
}
