//! Navigation gating on persisted credential presence.
//!
//! This is an advisory check made before any request; the backend still
//! validates the credential on every call.

use std::sync::Arc;

use crate::auth::{SessionSlot, CREDENTIAL_KEY};

/// Routes reachable without a credential (and their sub-paths).
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/signup",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
];

/// Where an unauthenticated visitor is sent.
pub const LOGIN_REDIRECT: &str = "/login?auth=required";

const IGNORED_PREFIXES: &[&str] = &["/_next", "/favicon.ico", "/assets", "/api"];

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Allows or redirects a navigation based on the persisted session slot.
pub struct RouteGuard {
    slot: Arc<dyn SessionSlot>,
}

impl RouteGuard {
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        Self { slot }
    }

    /// Decide whether `path` may be shown.
    pub fn check(&self, path: &str) -> GuardDecision {
        if is_ignored(path) || is_public(path) || self.credential_present() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(LOGIN_REDIRECT.to_string())
        }
    }

    fn credential_present(&self) -> bool {
        // An unreadable slot counts as signed out.
        matches!(self.slot.load(CREDENTIAL_KEY), Ok(Some(value)) if !value.is_empty())
    }
}

/// Framework internals, API calls and anything that looks like a file (a `.`
/// anywhere in the path) are never gated.
fn is_ignored(path: &str) -> bool {
    IGNORED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.')
}

fn is_public(path: &str) -> bool {
    PUBLIC_ROUTES.iter().any(|route| {
        path == *route || (*route != "/" && path.starts_with(&format!("{route}/")))
    })
}
