//! HTTP client construction and response classification.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::SessionCookieJar;
use crate::config::LumoConfig;
use crate::error::{LumoError, Result};

/// Header carrying the anti-forgery token on mutating calls.
pub const CSRF_HEADER: &str = "csrf-token";

/// Build the client used for every backend call.
///
/// `cookies` keeps the backend's refresh cookie between login and refresh,
/// across reloads of the session.
pub fn build_client(config: &LumoConfig, cookies: Arc<SessionCookieJar>) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .pool_max_idle_per_host(10)
        .cookie_provider(cookies)
        .build()
        .map_err(|err| LumoError::Configuration(format!("failed to build HTTP client: {err}")))
}

/// Map a non-2xx response to [`LumoError::RequestFailed`].
pub fn status_to_error(status: u16, body: &str) -> LumoError {
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    LumoError::request_failed(Some(status), message)
}

/// Pull a human-readable message out of a JSON error body.
///
/// Looks at `message`, then `error` (string or `{ message }`).
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| {
            let error = value.get("error")?;
            error
                .as_str()
                .or_else(|| error.get("message").and_then(|m| m.as_str()))
        })?;
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// Parse a success body; an empty body reads as JSON `null`.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}
