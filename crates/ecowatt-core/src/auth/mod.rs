//! Authentication module for managing the client-side credential lifecycle.
//!
//! This module provides:
//! - `codec`: decoding of the credential payload (no signature verification)
//! - `expiry`: the LIVE/EXPIRED decision for a stored credential
//! - `SessionStore`: the single owner of session state, persisted on every change
//! - `SessionStorage` backends: file, OS keychain, and in-memory
//!
//! The server issues and verifies credentials. The client only reads the
//! `exp` claim so it can drop a lapsed credential without a round trip.

pub mod codec;
pub mod expiry;
pub mod session;
pub mod storage;

pub use codec::{decode_payload, Claims, CredentialError};
pub use expiry::{expires_at, is_expired, is_expired_at};
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, SessionStorage, SESSION_KEY};
