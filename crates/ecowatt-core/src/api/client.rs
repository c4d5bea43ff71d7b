//! API client for the household energy service.
//!
//! One `ApiClient` is shared by every endpoint wrapper. It owns no credential
//! of its own: the session store is read at dispatch time on every request.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::interceptor::{self, Disposition};
use super::transport::{RawResponse, ReqwestTransport, Transport};
use super::{ApiError, HttpError, Notifier, RequestContext};
use crate::auth::SessionStore;
use crate::router::{Navigator, LOGIN_ROUTE};

// ============================================================================
// Constants
// ============================================================================

/// Base address used when nothing is configured (the backend mounts under `/api`)
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// HTTP request timeout in seconds.
/// Analysis endpoints can run for minutes on the backend.
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("Bad base URL {}: {}", base_url, e)))?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        })
    }
}

/// API client with the outbound/inbound pipeline built in.
/// Clone is cheap - all collaborators are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client that talks to the network through reqwest.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_transport(
            config.base_url.clone(),
            Arc::new(transport),
            session,
            notifier,
            navigator,
        ))
    }

    pub fn with_transport(
        base_url: Url,
        transport: Arc<dyn Transport>,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url,
            transport,
            session,
            notifier,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn navigate(&self, path: &str) {
        self.navigator.push(path);
    }

    /// Run one call through the pipeline and return the decoded payload.
    ///
    /// A request that cannot be built fails with `ApiError::InvalidRequest`
    /// before dispatch and is never surfaced to the user through the notifier.
    pub async fn request(&self, context: RequestContext) -> Result<Value, ApiError> {
        let mut request = context.build(&self.base_url)?;

        // Read the credential now, not when the context was built: a logout may
        // have happened in between.
        interceptor::attach_credential(&mut request, &self.session.token());

        debug!(method = %context.method, path = %context.path, silent = context.silent, "Dispatching request");
        let result = self.transport.send(request).await;

        self.intercept_response(&context, result)
    }

    /// Like `request`, decoding the payload into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, context: RequestContext) -> Result<T, ApiError> {
        let path = context.path.clone();
        let payload = self.request(context).await?;
        serde_json::from_value(payload).map_err(|e| {
            warn!(path = %path, error = %e, "Failed to decode response payload");
            ApiError::InvalidResponse(format!("{}: {}", path, e))
        })
    }

    fn intercept_response(
        &self,
        context: &RequestContext,
        result: Result<RawResponse, HttpError>,
    ) -> Result<Value, ApiError> {
        let error = match result {
            Ok(response) if response.status.is_success() => {
                return Ok(interceptor::unwrap_payload(&response.body));
            }
            Ok(response) => HttpError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            },
            Err(e) => e,
        };

        match interceptor::classify(&error, context, self.session.has_token()) {
            Disposition::AuthRejected {
                message,
                clear_credential,
            } => {
                info!(path = %context.path, "Credential rejected by server, signing out");
                if clear_credential {
                    self.session.remove_token();
                }
                self.navigator.push(LOGIN_ROUTE);
                self.notifier.notify_error(&message);
                Err(ApiError::Unauthorized(message))
            }
            Disposition::ExpectedAbsence => {
                debug!(path = %context.path, "Silent request found nothing");
                Err(ApiError::NotFound(error))
            }
            Disposition::Failure { message } => {
                warn!(path = %context.path, error = %error, "Request failed");
                self.notifier.notify_error(&message);
                Err(ApiError::Request(message))
            }
        }
    }
}
