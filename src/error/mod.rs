//! Error types for Lumo.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Lumo operations.
#[derive(Error, Debug)]
pub enum LumoError {
    /// A backend call failed and was not refreshed away.
    ///
    /// `status` is `None` when no response arrived at all.
    #[error("Request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// The credential refresh failed; the local credential is already cleared.
    #[error("Not authenticated: sign in again")]
    Unauthenticated,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LumoError {
    /// Create a request failure.
    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated => ErrorCategory::Authentication,
            Self::RequestFailed { status, .. } => match status {
                None => ErrorCategory::Network,
                Some(500..=599) => ErrorCategory::Server,
                Some(_) => ErrorCategory::Request,
            },
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
        }
    }

    /// Whether the session survives this error.
    ///
    /// Only [`LumoError::Unauthenticated`] ends the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::SignIn,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::Request => RecoverySuggestion::ShowMessage,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::InvalidInput => RecoverySuggestion::FixInput,
            ErrorCategory::Serialization => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LumoError>;
