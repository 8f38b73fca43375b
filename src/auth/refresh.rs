//! Backend credential refresh.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use super::error::AuthError;
use super::token::Credential;

/// Exchanges the session's refresh credential for a new access credential.
///
/// Implementations must not send the expired access credential.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<Credential, AuthError>;
}

/// Refresher that `POST`s to the backend refresh endpoint.
///
/// The refresh cookie rides along in the client's cookie store, so the
/// supplied client must be the one that performed the login.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    client: reqwest::Client,
    refresh_url: String,
}

impl HttpTokenRefresher {
    pub fn new(client: reqwest::Client, refresh_url: impl Into<String>) -> Self {
        Self {
            client,
            refresh_url: refresh_url.into(),
        }
    }

    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self) -> Result<Credential, AuthError> {
        debug!(url = %self.refresh_url, "requesting credential refresh");
        let resp = self
            .client
            .post(&self.refresh_url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        let payload: RefreshResponse = serde_json::from_str(&body)
            .map_err(|err| AuthError::InvalidResponse(format!("refresh body: {err}")))?;
        if payload.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "refresh response carried an empty accessToken".to_string(),
            ));
        }
        Ok(Credential::new(payload.access_token))
    }
}
