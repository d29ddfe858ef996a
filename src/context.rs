//! Session context attached to every tool invocation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Context for one conversation with the external runtime.
///
/// Carries the fields attached to every log entry for the session. One
/// instance is bound to exactly one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    /// Unique session ID.
    pub session_id: Uuid,
    /// Room (conversation channel) name supplied by the runtime.
    pub room: String,
    /// When the session started.
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    /// Create a context for a new conversation in `room`.
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            room: room.into(),
            created_at: Utc::now(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("local")
    }
}
