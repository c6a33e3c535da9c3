use serde::{Deserialize, Serialize};
use crate::session::LogoutReason;

/// Events published by the stores and session for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Persisted session restore finished
    SessionRestored { authenticated: bool },

    /// A user signed in
    LoggedIn { email: String },

    /// The session was torn down
    LoggedOut { reason: LogoutReason },

    /// Short informational message for the status line
    Notice { message: String },

    /// A user-facing error message
    Error { message: String },
}
