//! Client facade: configuration, credential store, and request pipeline.

pub mod http;
pub mod pipeline;

pub use pipeline::{RequestOptions, RequestPipeline};

use std::sync::Arc;

use serde::Deserialize;

use crate::api::{paths, AuthApi, PhotoApi};
use crate::auth::{
    CredentialStore, FileSessionSlot, HttpTokenRefresher, SessionCookieJar, SessionObserver,
    SessionSlot, SessionSlotConfig,
};
use crate::config::LumoConfig;
use crate::error::Result;
use crate::guard::RouteGuard;

/// Entry point for talking to the backend.
///
/// Owns one [`CredentialStore`] per client session; every API call goes
/// through the shared [`RequestPipeline`].
///
/// # Example
/// ```no_run
/// use lumo::client::LumoClient;
/// use lumo::config::LumoConfig;
///
/// # async fn example() -> lumo::error::Result<()> {
/// let client = LumoClient::new(LumoConfig::from_env())?;
/// client.auth().login("ada@example.com", "hunter2").await?;
/// for photo in client.photos().collection().await? {
///     println!("{}", photo.image_url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LumoClient {
    config: LumoConfig,
    http: reqwest::Client,
    slot: Arc<dyn SessionSlot>,
    pipeline: RequestPipeline,
}

impl LumoClient {
    /// Create a client persisting its credential under the configured session dir.
    pub fn new(config: LumoConfig) -> Result<Self> {
        let slot = Arc::new(FileSessionSlot::new(SessionSlotConfig::new(
            config.session_dir().clone(),
        )));
        Self::with_slot(config, slot)
    }

    /// Create a client over an explicit session slot.
    pub fn with_slot(config: LumoConfig, slot: Arc<dyn SessionSlot>) -> Result<Self> {
        config.validate()?;
        let cookies = Arc::new(SessionCookieJar::new(slot.clone()));
        let http = http::build_client(&config, cookies.clone())?;
        let refresher = HttpTokenRefresher::new(http.clone(), config.endpoint(paths::REFRESH));
        let store = CredentialStore::new(slot.clone())
            .with_cookie_jar(cookies)
            .with_refresher(Arc::new(refresher));
        Ok(Self {
            config,
            http,
            slot,
            pipeline: RequestPipeline::new(Arc::new(store)),
        })
    }

    pub fn config(&self) -> &LumoConfig {
        &self.config
    }

    /// Raw HTTP client; carries the persisted session cookies.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.pipeline.store()
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Absolute URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn photos(&self) -> PhotoApi<'_> {
        PhotoApi::new(self)
    }

    /// Start a [`SessionObserver`] over this client's store.
    pub fn observe(&self) -> SessionObserver {
        SessionObserver::spawn(self.store())
    }

    /// Route guard reading this client's persisted slot.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.slot.clone())
    }

    /// Fetch an anti-forgery token for a mutating call.
    ///
    /// Never refreshes: the token guards the sign-in forms themselves.
    pub async fn csrf_token(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct CsrfResponse {
            #[serde(rename = "csrfToken")]
            csrf_token: String,
        }

        let url = self.url(paths::CSRF);
        let response: CsrfResponse = self
            .pipeline
            .execute(|| self.http.get(&url), RequestOptions::skip_refresh())
            .await?;
        Ok(response.csrf_token)
    }
}
