//! Error taxonomy of the session core
//!
//! Gateway failures keep the backend's message verbatim. Every failure is
//! terminal for its operation; nothing here is retried automatically.

use serde::Serialize;
use thiserror::Error;

use crate::config::ProfileError;
use crate::session::SessionStatus;

/// Connecting failed; the session is back to disconnected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Session is already {0}")]
    AlreadyActive(SessionStatus),

    #[error("Another remote operation is in progress")]
    Busy,

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("{0}")]
    Gateway(String),

    #[error("Failed to list remote root: {0}")]
    InitialListing(String),

    #[error("Connection attempt was aborted by disconnect")]
    Aborted,
}

/// Listing failed; the previous view is kept
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Not connected")]
    NotConnected,

    #[error("Another remote operation is in progress")]
    Busy,

    #[error("Remote path must be absolute: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Gateway(String),

    /// The session was disconnected while the listing was in flight
    #[error("Navigation aborted by disconnect")]
    Aborted,
}

/// Download, upload, delete, compress or open failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Not connected")]
    NotConnected,

    #[error("Another remote operation is in progress")]
    Busy,

    #[error("Local path has no file name: {0}")]
    InvalidLocalPath(String),

    #[error("{0}")]
    Gateway(String),
}

/// Preview content could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("Not connected")]
    NotConnected,

    #[error("Another remote operation is in progress")]
    Busy,

    #[error("Directories cannot be previewed: {0}")]
    NotPreviewable(String),

    #[error("Entry is not part of the current listing: {0}")]
    NotInListing(String),

    /// A newer preview request was issued before this one completed
    #[error("Preview request was superseded")]
    Superseded,

    #[error("{0}")]
    Gateway(String),
}

macro_rules! serialize_as_message {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.serialize_str(&self.to_string())
                }
            }
        )*
    };
}

serialize_as_message!(ConnectError, NavError, TransferError, PreviewError);

/// Which family of operation produced the error in the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Connect,
    Navigation,
    Transfer,
    Preview,
    Profile,
}

/// The single user-visible error.
///
/// A newer error replaces the older one; it only goes away when the user
/// dismisses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserError {
    pub kind: ErrorKind,
    pub message: String,
}

impl UserError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_message_is_verbatim() {
        let err = ConnectError::Gateway("530 Login incorrect.".to_string());
        assert_eq!(err.to_string(), "530 Login incorrect.");

        let json = serde_json::to_string(&NavError::Gateway("No such file".into())).unwrap();
        assert_eq!(json, "\"No such file\"");
    }

    #[test]
    fn test_profile_error_converts() {
        let err: ConnectError = ProfileError::MissingShare.into();
        assert_eq!(err, ConnectError::InvalidProfile(ProfileError::MissingShare));
    }
}
