//! Request types

use serde::{Deserialize, Serialize};

/// Session used when the caller does not name one
pub const DEFAULT_SESSION: &str = "default";

/// Query-string parameters for question endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParams {
    /// The question or message
    pub query: String,
    /// Conversation session (optional)
    #[serde(default)]
    pub session: Option<String>,
}

impl QueryParams {
    /// Session id, falling back to the default session
    pub fn session_id(&self) -> &str {
        session_or_default(self.session.as_deref())
    }
}

/// Query-string parameters for history operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionParams {
    #[serde(default)]
    pub session: Option<String>,
}

impl SessionParams {
    pub fn session_id(&self) -> &str {
        session_or_default(self.session.as_deref())
    }
}

fn session_or_default(session: Option<&str>) -> &str {
    match session.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_SESSION,
    }
}
