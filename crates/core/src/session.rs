//! Per-session state.
//!
//! A session owns the single "last reply" slot. It is handed by `&mut` to the
//! submission flow and by `&` to whatever renders or speaks the reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The request/response context of one interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub id: SessionId,

    last_reply: Option<String>,

    /// When the last reply was stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,

    /// Number of replies stored since the session began (not reset)
    #[serde(default)]
    pub replies: u32,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            last_reply: None,
            replied_at: None,
            replies: 0,
        }
    }

    /// The most recent successful reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    /// Overwrite the last reply slot.
    pub fn store_reply(&mut self, reply: impl Into<String>) {
        self.last_reply = Some(reply.into());
        self.replied_at = Some(Utc::now());
        self.replies += 1;
    }

    /// Explicit reset: clears the last reply.
    pub fn reset(&mut self) {
        self.last_reply = None;
        self.replied_at = None;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_reply() {
        let session = SessionContext::new();
        assert!(session.last_reply().is_none());
        assert_eq!(session.replies, 0);
    }

    #[test]
    fn store_overwrites_previous_reply() {
        let mut session = SessionContext::new();
        session.store_reply("first");
        session.store_reply("second");
        assert_eq!(session.last_reply(), Some("second"));
        assert_eq!(session.replies, 2);
        assert!(session.replied_at.is_some());
    }

    #[test]
    fn reset_clears_reply() {
        let mut session = SessionContext::new();
        session.store_reply("answer");
        session.reset();
        assert!(session.last_reply().is_none());
        assert!(session.replied_at.is_none());
    }
}
