//! Lumo — client for the Lumo photo search backend.
//!
//! Every data operation is delegated to the backend. The client keeps the
//! access credential, refreshes it transparently when a request comes back
//! 401 (one shared refresh no matter how many requests notice), and exposes
//! typed wrappers for the auth and photo endpoints.
//!
//! # Quick Start
//!
//! ```no_run
//! use lumo::prelude::*;
//!
//! # async fn example() -> lumo::error::Result<()> {
//! let client = LumoClient::new(LumoConfig::from_env())?;
//! client.auth().login("ada@example.com", "hunter2").await?;
//! let hits = client.photos().search("sunset over water").await?;
//! println!("{} results", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod prelude;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
