//! LIVE vs EXPIRED decision for a stored credential.
//!
//! Pure functions of the credential and the clock. Nothing here mutates state;
//! clearing a lapsed credential is the session store's job.

use chrono::{DateTime, Utc};

use super::codec::decode_payload;

/// Check whether a credential is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now().timestamp())
}

/// Check whether a credential is expired at `now` (Unix seconds).
///
/// Empty, undecodable, or `exp`-less credentials are expired. A credential
/// whose `exp` equals `now` is still live.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    if token.is_empty() {
        return true;
    }

    match decode_payload(token).and_then(|claims| claims.exp()) {
        Some(exp) => now > exp,
        None => true,
    }
}

/// Expiry instant of a credential, if it carries a readable one.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    if token.is_empty() {
        return None;
    }
    decode_payload(token)
        .and_then(|claims| claims.exp())
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::tests::{token_expiring_at, token_with_payload};

    #[test]
    fn test_empty_token_is_expired() {
        assert!(is_expired(""));
        assert!(is_expired_at("", 0));
    }

    #[test]
    fn test_missing_exp_is_expired() {
        let token = token_with_payload(r#"{"sub":"1"}"#);
        assert!(is_expired_at(&token, 0));
    }

    #[test]
    fn test_unparsable_payload_is_expired() {
        assert!(is_expired_at("header.%%%%.sig", 0));
        assert!(is_expired_at(&token_with_payload("{"), 0));
        assert!(is_expired_at("single-segment", 0));
    }

    #[test]
    fn test_exp_boundary_is_still_live() {
        let token = token_expiring_at(1_700_000_000);

        assert!(!is_expired_at(&token, 1_699_999_999));
        assert!(!is_expired_at(&token, 1_700_000_000));
        assert!(is_expired_at(&token, 1_700_000_001));
    }

    #[test]
    fn test_is_expired_uses_wall_clock() {
        let now = Utc::now().timestamp();
        assert!(!is_expired(&token_expiring_at(now + 3600)));
        assert!(is_expired(&token_expiring_at(now - 3600)));
    }

    #[test]
    fn test_expires_at() {
        let token = token_expiring_at(1_700_000_000);
        let expiry = expires_at(&token).expect("expiry should decode");
        assert_eq!(expiry.timestamp(), 1_700_000_000);

        assert!(expires_at("").is_none());
        assert!(expires_at(&token_with_payload("{}")).is_none());
    }
}
