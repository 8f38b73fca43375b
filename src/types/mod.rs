//! Wire types exchanged with the backend.

pub mod photo;
pub mod user;

pub use photo::*;
pub use user::*;
