//! Connection lifecycle
//!
//! ```text
//! Disconnected → Connecting → Connected → Disconnected
//!                     └──────→ Disconnected   (gateway failure)
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Protocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl SessionStatus {
    /// Whether `next` is an allowed successor of this status
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Connected => "connected",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one session of the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self {
            status: SessionStatus::Disconnected,
            protocol: None,
            host: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Session plus the transition table guarding it.
///
/// Every transition into `Disconnected` drops protocol and host.
#[derive(Debug, Default)]
pub struct SessionStateMachine {
    session: Session,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// Move to `next`; returns `false` (and changes nothing) if the table
    /// forbids it
    pub fn transition(&mut self, next: SessionStatus) -> bool {
        let prev = self.session.status;
        if !prev.can_transition_to(next) {
            warn!("Rejected session transition {} -> {}", prev, next);
            return false;
        }
        self.session.status = next;
        if next == SessionStatus::Disconnected {
            self.session.protocol = None;
            self.session.host = None;
        }
        debug!("Session {} -> {}", prev, next);
        true
    }

    /// Enter `Connecting` for `protocol://host`
    pub fn begin_connect(&mut self, protocol: Protocol, host: &str) -> bool {
        if !self.transition(SessionStatus::Connecting) {
            return false;
        }
        self.session.protocol = Some(protocol);
        self.session.host = Some(host.to_string());
        true
    }

    /// Force the session back to `Disconnected` from any status
    pub fn reset(&mut self) {
        if self.session.status != SessionStatus::Disconnected {
            self.transition(SessionStatus::Disconnected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use SessionStatus::*;
        assert!(Disconnected.can_transition_to(Connecting));
        assert!(Connecting.can_transition_to(Connected));
        assert!(Connecting.can_transition_to(Disconnected));
        assert!(Connected.can_transition_to(Disconnected));

        assert!(!Disconnected.can_transition_to(Connected));
        assert!(!Connected.can_transition_to(Connecting));
        assert!(!Disconnected.can_transition_to(Disconnected));
    }

    #[test]
    fn test_lifecycle_records_and_clears_endpoint() {
        let mut sm = SessionStateMachine::new();
        assert!(sm.begin_connect(Protocol::Sftp, "example.com"));
        assert!(sm.transition(SessionStatus::Connected));
        assert_eq!(sm.session().host.as_deref(), Some("example.com"));
        assert_eq!(sm.session().protocol, Some(Protocol::Sftp));

        assert!(sm.transition(SessionStatus::Disconnected));
        assert_eq!(sm.session(), &Session::disconnected());
    }

    #[test]
    fn test_invalid_transition_changes_nothing() {
        let mut sm = SessionStateMachine::new();
        assert!(!sm.transition(SessionStatus::Connected));
        assert_eq!(sm.status(), SessionStatus::Disconnected);

        sm.begin_connect(Protocol::Ftp, "h");
        assert!(!sm.begin_connect(Protocol::Ftp, "other"));
        assert_eq!(sm.session().host.as_deref(), Some("h"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut sm = SessionStateMachine::new();
        sm.reset();
        sm.begin_connect(Protocol::Smb, "nas");
        sm.reset();
        sm.reset();
        assert_eq!(sm.status(), SessionStatus::Disconnected);
        assert!(sm.session().host.is_none());
    }
}
