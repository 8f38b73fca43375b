mod support;

use std::sync::Arc;
use std::time::Duration;

use lumo::auth::{
    Credential, CredentialChanged, CredentialStore, FileSessionSlot, MemorySessionSlot,
    SessionObserver, SessionSlot, SessionSlotConfig, SessionState, CREDENTIAL_KEY,
};
use tempfile::TempDir;
use tokio::sync::broadcast::error::TryRecvError;

fn file_slot(dir: &TempDir) -> Arc<FileSessionSlot> {
    Arc::new(FileSessionSlot::new(SessionSlotConfig::new(
        dir.path().to_path_buf(),
    )))
}

#[test]
fn fresh_store_reads_credential_persisted_by_previous_instance() {
    let dir = TempDir::new().unwrap();

    let before_reload = CredentialStore::new(file_slot(&dir));
    before_reload.set(Credential::new("abc"));
    drop(before_reload);

    let after_reload = CredentialStore::new(file_slot(&dir));
    assert_eq!(after_reload.get(), Some(Credential::new("abc")));
}

#[test]
fn clear_removes_persisted_credential() {
    let dir = TempDir::new().unwrap();
    let slot = file_slot(&dir);
    let store = CredentialStore::new(slot.clone());
    store.set(Credential::new("abc"));
    store.clear();

    assert!(store.get().is_none());
    assert!(slot.load(CREDENTIAL_KEY).unwrap().is_none());
    assert!(CredentialStore::new(file_slot(&dir)).get().is_none());
}

#[test]
fn set_replaces_rather_than_merges() {
    let store = CredentialStore::new(Arc::new(MemorySessionSlot::new()));
    store.set(Credential::new("first"));
    store.set(Credential::new("second"));
    assert_eq!(store.get(), Some(Credential::new("second")));
}

#[test]
fn clear_notifies_every_subscriber_once_after_state_change() {
    let store = CredentialStore::new(Arc::new(MemorySessionSlot::new()));
    store.set(Credential::new("abc"));
    let mut observers: Vec<_> = (0..3).map(|_| store.subscribe()).collect();

    store.clear();

    for observer in &mut observers {
        assert_eq!(observer.try_recv(), Ok(CredentialChanged));
        assert!(store.get().is_none());
        assert_eq!(observer.try_recv(), Err(TryRecvError::Empty));
    }
}

#[test]
fn broken_slot_never_surfaces_errors() {
    let store = CredentialStore::new(Arc::new(support::BrokenSlot));
    assert!(store.get().is_none());

    store.set(Credential::new("abc"));
    assert_eq!(store.get(), Some(Credential::new("abc")));
    assert!(!store.has_persisted());

    store.clear();
    assert!(store.get().is_none());
}

#[tokio::test]
async fn observer_tracks_set_and_clear() {
    let store = Arc::new(CredentialStore::new(Arc::new(MemorySessionSlot::new())));
    let observer = SessionObserver::spawn(&store);
    let mut session = observer.watch_session();
    assert!(!observer.is_authenticated());

    store.set(Credential::new("abc"));
    tokio::time::timeout(Duration::from_secs(1), session.changed())
        .await
        .expect("state published")
        .unwrap();
    assert_eq!(*session.borrow_and_update(), SessionState { authenticated: true });

    store.clear();
    tokio::time::timeout(Duration::from_secs(1), session.changed())
        .await
        .expect("state published")
        .unwrap();
    assert!(!session.borrow_and_update().authenticated);
    assert!(!observer.is_authenticated());
}

#[tokio::test]
async fn observer_starts_from_persisted_state() {
    let slot = Arc::new(MemorySessionSlot::new());
    slot.save(CREDENTIAL_KEY, "abc").unwrap();
    let store = Arc::new(CredentialStore::new(slot));

    let observer = SessionObserver::spawn(&store);
    assert!(observer.is_authenticated());
}

#[tokio::test]
async fn observer_stops_when_store_is_dropped() {
    let store = Arc::new(CredentialStore::new(Arc::new(MemorySessionSlot::new())));
    let observer = SessionObserver::spawn(&store);
    let mut session = observer.watch_session();
    drop(store);

    // Sender side goes away once the task exits.
    let closed = tokio::time::timeout(Duration::from_secs(1), session.changed())
        .await
        .expect("task exits");
    assert!(closed.is_err());
}
