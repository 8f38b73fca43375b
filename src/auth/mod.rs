//! Access credential storage, refresh, and session observation.

pub mod cookies;
pub mod credential_store;
pub mod error;
pub mod observer;
pub mod refresh;
pub mod store;
pub mod token;

pub use cookies::{SessionCookieJar, COOKIE_KEY};
pub use credential_store::{CredentialChanged, CredentialStore};
pub use error::AuthError;
pub use observer::{SessionObserver, SessionState};
pub use refresh::{HttpTokenRefresher, TokenRefresher};
pub use store::{FileSessionSlot, MemorySessionSlot, SessionSlot, SessionSlotConfig, CREDENTIAL_KEY};
pub use token::Credential;
