//! Process-wide holder of the access credential.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::cookies::SessionCookieJar;
use super::error::AuthError;
use super::refresh::TokenRefresher;
use super::store::{SessionSlot, CREDENTIAL_KEY};
use super::token::Credential;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Payload-less notification fired once per `set` or `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialChanged;

type PendingRefresh = Shared<BoxFuture<'static, Result<Credential, AuthError>>>;

#[derive(Default)]
struct Cached {
    credential: Option<Credential>,
    // Bumped by every set/clear so a slow slot read cannot overwrite them.
    generation: u64,
}

/// Single source of truth for the current access credential.
///
/// Holds an in-memory slot mirrored into a persisted [`SessionSlot`], and
/// coordinates refreshes so that at most one backend refresh call is in flight
/// no matter how many requests hit a 401 at once. Construct one per client
/// session and share it behind an `Arc`.
///
/// `get`, `set` and `clear` never fail: persisted-slot errors are logged and
/// the in-memory slot stays authoritative. When a cookie jar is attached,
/// `clear` empties it too, since the refresh cookie belongs to the session.
pub struct CredentialStore {
    current: Mutex<Cached>,
    slot: Arc<dyn SessionSlot>,
    cookies: Option<Arc<SessionCookieJar>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    pending: Mutex<Option<PendingRefresh>>,
    changes: broadcast::Sender<CredentialChanged>,
}

impl CredentialStore {
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            current: Mutex::new(Cached::default()),
            slot,
            cookies: None,
            refresher: None,
            pending: Mutex::new(None),
            changes,
        }
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn with_cookie_jar(mut self, cookies: Arc<SessionCookieJar>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Current credential, falling back to the persisted slot on a cold cache.
    ///
    /// The slot is read without holding the in-memory lock.
    pub fn get(&self) -> Option<Credential> {
        let generation = {
            let cached = lock(&self.current);
            if cached.credential.is_some() {
                return cached.credential.clone();
            }
            cached.generation
        };
        let loaded = self.load_persisted();
        let mut cached = lock(&self.current);
        if cached.generation == generation && cached.credential.is_none() {
            cached.credential = loaded;
        }
        cached.credential.clone()
    }

    /// Replace the credential in memory and in the persisted slot.
    pub fn set(&self, credential: Credential) {
        if let Err(err) = self.slot.save(CREDENTIAL_KEY, credential.as_str()) {
            warn!(error = %err, "failed to persist credential");
        }
        self.replace(Some(credential));
        self.notify();
    }

    /// Drop the credential from memory and from the persisted slot.
    pub fn clear(&self) {
        if let Err(err) = self.slot.clear(CREDENTIAL_KEY) {
            warn!(error = %err, "failed to clear persisted credential");
        }
        if let Some(cookies) = &self.cookies {
            cookies.clear();
        }
        self.replace(None);
        self.notify();
    }

    /// Subscribe to change notifications.
    ///
    /// Every subscriber receives exactly one [`CredentialChanged`] per
    /// `set`/`clear`, delivered after the new state is readable via `get`.
    pub fn subscribe(&self) -> broadcast::Receiver<CredentialChanged> {
        self.changes.subscribe()
    }

    /// Whether a credential is present in the persisted slot.
    pub fn has_persisted(&self) -> bool {
        self.load_persisted().is_some()
    }

    /// Refresh the credential, joining an in-flight refresh if there is one.
    ///
    /// On success the new credential is stored before any waiter resumes. On
    /// failure the store is cleared and every waiter receives the same error.
    pub async fn refresh(self: &Arc<Self>) -> Result<Credential, AuthError> {
        let pending = {
            let mut slot = lock(&self.pending);
            match slot.as_ref() {
                Some(in_flight) => {
                    debug!("joining in-flight credential refresh");
                    in_flight.clone()
                }
                None => {
                    let store = Arc::clone(self);
                    let refresh = async move { store.run_refresh().await }.boxed().shared();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };
        pending.await
    }

    async fn run_refresh(&self) -> Result<Credential, AuthError> {
        let outcome = match &self.refresher {
            Some(refresher) => refresher.refresh().await,
            None => Err(AuthError::NotConfigured),
        };
        match &outcome {
            Ok(credential) => {
                debug!("credential refresh succeeded");
                self.set(credential.clone());
            }
            Err(err) => {
                warn!(error = %err, "credential refresh failed; clearing session");
                self.clear();
            }
        }
        lock(&self.pending).take();
        outcome
    }

    fn replace(&self, credential: Option<Credential>) {
        let mut cached = lock(&self.current);
        cached.credential = credential;
        cached.generation = cached.generation.wrapping_add(1);
    }

    fn load_persisted(&self) -> Option<Credential> {
        match self.slot.load(CREDENTIAL_KEY) {
            Ok(value) => value.map(Credential::from),
            Err(err) => {
                warn!(error = %err, "failed to read persisted credential");
                None
            }
        }
    }

    fn notify(&self) {
        // No receivers is fine.
        let _ = self.changes.send(CredentialChanged);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
