//! Convenience re-exports for common use.

pub use crate::auth::{Credential, CredentialStore, SessionObserver, SessionState};
pub use crate::client::{LumoClient, RequestOptions, RequestPipeline};
pub use crate::config::LumoConfig;
pub use crate::error::{LumoError, Result};
pub use crate::guard::{GuardDecision, RouteGuard};
pub use crate::types::{Photo, PhotoDetail, SearchHistoryItem, SearchResult, TagKind};
