//! Authenticated request execution with refresh-and-retry.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::http::{parse_body, status_to_error};
use crate::auth::CredentialStore;
use crate::error::{LumoError, Result};

/// Per-call pipeline options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Surface a 401 directly instead of refreshing and retrying.
    ///
    /// Set for the login call and anything else that must not recurse into
    /// a refresh.
    pub skip_refresh: bool,
}

impl RequestOptions {
    pub fn skip_refresh() -> Self {
        Self { skip_refresh: true }
    }
}

/// Executes repeatable requests with credential attachment.
///
/// Each call attaches the current credential as a bearer header. A 401
/// triggers the store's shared refresh and exactly one retry; a 401 on the
/// retry is reported as [`LumoError::RequestFailed`]. A failed refresh is
/// reported as [`LumoError::Unauthenticated`].
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use lumo::auth::{CredentialStore, MemorySessionSlot};
/// use lumo::client::{RequestOptions, RequestPipeline};
///
/// # async fn example() -> lumo::error::Result<()> {
/// let store = Arc::new(CredentialStore::new(Arc::new(MemorySessionSlot::new())));
/// let pipeline = RequestPipeline::new(store);
/// let http = reqwest::Client::new();
/// let body: serde_json::Value = pipeline
///     .execute(|| http.get("http://localhost:8080/api/photos"), RequestOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestPipeline {
    store: Arc<CredentialStore>,
}

impl RequestPipeline {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Run `request_fn` through the pipeline and parse the success body.
    ///
    /// `request_fn` may be invoked twice, so it must build a fresh request
    /// each time and must not set its own `Authorization` header.
    pub async fn execute<T, F>(&self, request_fn: F, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let response = self.send(&request_fn).await?;
        if response.status() != StatusCode::UNAUTHORIZED || options.skip_refresh {
            return read_response(response).await;
        }

        debug!(url = %response.url(), "request unauthorized; awaiting credential refresh");
        if let Err(err) = self.store.refresh().await {
            warn!(error = %err, "request abandoned after failed refresh");
            return Err(LumoError::Unauthenticated);
        }

        // The retry re-reads the store, so it carries the refreshed credential.
        let retry = self.send(&request_fn).await?;
        read_response(retry).await
    }

    async fn send<F>(&self, request_fn: &F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut request = request_fn();
        if let Some(credential) = self.store.get() {
            request = request.bearer_auth(credential.as_str());
        }
        request
            .send()
            .await
            .map_err(|err| LumoError::request_failed(None, err.to_string()))
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| LumoError::request_failed(Some(status.as_u16()), err.to_string()))?;
    if !status.is_success() {
        return Err(status_to_error(status.as_u16(), &body));
    }
    parse_body(&body)
}
