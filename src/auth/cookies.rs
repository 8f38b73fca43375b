//! Cookie jar persisted in the session slot.
//!
//! The backend hands out its refresh cookie at login and rotates it on
//! refresh. Keeping the jar in the same [`SessionSlot`] as the access
//! credential lets a reloaded client (a new process over the same session
//! dir) refresh exactly like the one that signed in.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::{debug, warn};

use super::store::SessionSlot;

/// Fixed key the cookie jar is persisted under.
pub const COOKIE_KEY: &str = "sessionCookies";

/// Cookie store for a client that talks to a single backend.
///
/// Cookies are keyed by name only; domain and path attributes are ignored.
/// Loaded from the slot once at construction, written through on change.
pub struct SessionCookieJar {
    slot: Arc<dyn SessionSlot>,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl SessionCookieJar {
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        let cookies = match slot.load(COOKIE_KEY) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted cookies");
                BTreeMap::new()
            }
        };
        Self {
            slot,
            cookies: Mutex::new(cookies),
        }
    }

    /// Value of the cookie called `name`, if held.
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every cookie, in memory and in the slot.
    pub fn clear(&self) {
        let mut cookies = self.lock();
        cookies.clear();
        if let Err(err) = self.slot.clear(COOKIE_KEY) {
            warn!(error = %err, "failed to clear persisted cookies");
        }
    }

    fn persist(&self, cookies: &BTreeMap<String, String>) {
        let result = if cookies.is_empty() {
            self.slot.clear(COOKIE_KEY)
        } else {
            self.slot.save(COOKIE_KEY, &encode(cookies))
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to persist cookies");
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        let mut cookies = self.lock();
        let mut changed = false;
        for header in cookie_headers {
            let Some((name, value)) = header.to_str().ok().and_then(parse_set_cookie) else {
                continue;
            };
            match value {
                Some(value) => {
                    debug!(cookie = %name, "storing cookie");
                    changed |= cookies.insert(name, value.clone()).as_ref() != Some(&value);
                }
                None => changed |= cookies.remove(&name).is_some(),
            }
        }
        if changed {
            self.persist(&cookies);
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.lock();
        if cookies.is_empty() {
            return None;
        }
        HeaderValue::from_str(&encode(&cookies)).ok()
    }
}

/// Parse one `Set-Cookie` value into its name and value.
///
/// A `None` value means the cookie is being deleted (empty value, non-positive
/// `Max-Age`, or an `Expires` in the past).
fn parse_set_cookie(raw: &str) -> Option<(String, Option<String>)> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');
    let expired = parts.any(|attr| is_expiry(attr.trim()));
    let value = (!value.is_empty() && !expired).then(|| value.to_string());
    Some((name.to_string(), value))
}

fn is_expiry(attr: &str) -> bool {
    let Some((key, value)) = attr.split_once('=') else {
        return false;
    };
    let value = value.trim();
    match key.trim().to_ascii_lowercase().as_str() {
        "max-age" => value.parse::<i64>().is_ok_and(|age| age <= 0),
        "expires" => DateTime::parse_from_rfc2822(value)
            .is_ok_and(|at| at.with_timezone(&Utc) < Utc::now()),
        _ => false,
    }
}

fn encode(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn decode(raw: &str) -> BTreeMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}
