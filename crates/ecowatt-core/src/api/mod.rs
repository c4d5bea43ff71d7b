//! REST API client module for the household energy service.
//!
//! This module provides the `ApiClient`, a single configured client that every
//! endpoint wrapper goes through. Each request runs a two-stage pipeline:
//!
//! - outbound: attach the stored credential as a bearer header at dispatch time
//! - inbound: unwrap the payload, or classify the failure and recover
//!
//! Classification is a pure function (`interceptor::classify`) so it can be
//! tested without a network.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod interceptor;
pub mod notify;
pub mod request;
pub mod transport;

pub use client::{ApiClient, ClientConfig, DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_SECS};
pub use error::{ApiError, HttpError, FALLBACK_MESSAGE};
pub use interceptor::Disposition;
pub use notify::{Notifier, TracingNotifier};
pub use request::{RequestBody, RequestContext};
pub use transport::{RawResponse, ReqwestTransport, Transport};
