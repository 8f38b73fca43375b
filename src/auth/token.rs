use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer credential issued by the backend.
///
/// Replaced wholesale on refresh. `Debug` never prints the token.
///
/// # Example
/// ```
/// use lumo::auth::Credential;
///
/// let credential = Credential::new("abc");
/// assert_eq!(credential.as_str(), "abc");
/// assert_eq!(format!("{credential:?}"), "Credential(***)");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}
