//! Core library for the ecowatt household energy client.
//!
//! The interesting part of this crate is the authenticated request pipeline:
//!
//! - [`auth`]: credential decoding, expiry checks, and the persisted session store
//! - [`api`]: the HTTP client core with its outbound/inbound stages, plus the
//!   endpoint wrappers for bills, devices, family, users, suggestions and analysis
//! - [`router`]: route table and the navigation guard that keeps protected
//!   views behind a live session
//!
//! Everything else (models, config) is supporting glue.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use api::{ApiClient, ApiError, ClientConfig, HttpError, Notifier, RequestContext};
pub use auth::{SessionState, SessionStore};
pub use config::Config;
pub use router::{Navigation, Navigator, Router};
