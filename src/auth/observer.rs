//! Authentication state derived from credential store changes.

use std::sync::{Arc, Weak};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::credential_store::CredentialStore;

/// UI-visible authentication state; a pure function of the store's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
}

impl SessionState {
    pub fn derive(store: &CredentialStore) -> Self {
        Self {
            authenticated: store.get().is_some(),
        }
    }
}

/// Keeps a [`SessionState`] current by listening to store notifications.
///
/// Re-derives the state once per change event, never by polling. The
/// background task stops when the store is dropped or the observer is.
pub struct SessionObserver {
    state_rx: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionObserver {
    /// Start observing `store`. Must be called inside a Tokio runtime.
    pub fn spawn(store: &Arc<CredentialStore>) -> Self {
        let mut changes = store.subscribe();
        let (state_tx, state_rx) = watch::channel(SessionState::derive(store));
        let weak: Weak<CredentialStore> = Arc::downgrade(store);

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "session observer lagged; re-deriving once");
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(store) = weak.upgrade() else { break };
                state_tx.send_replace(SessionState::derive(&store));
            }
        });

        Self { state_rx, task }
    }

    /// Subscribe to state changes via a [`watch::Receiver`].
    pub fn watch_session(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().authenticated
    }
}

impl Drop for SessionObserver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
