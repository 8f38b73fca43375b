//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Request,
    Network,
    Server,
    Configuration,
    Serialization,
    InvalidInput,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Drop local session indicators and send the user to the login page.
    SignIn,
    /// Surface the backend message (e.g. a toast); the session is intact.
    ShowMessage,
    RetryLater,
    CheckConfiguration,
    FixInput,
    ContactSupport,
}
