//! EasyFTP - session and navigation core of an FTP/SFTP/SMB file browser
//!
//! The protocol engines live behind [`gateway::RemoteGateway`]; this crate
//! tracks the connection lifecycle, drives directory navigation with
//! history, resolves file previews and manages saved connection profiles.

pub mod bookmarks;
pub mod config;
pub mod error;
pub mod gateway;
pub mod navigation;
pub mod preview;
pub mod session;

pub use bookmarks::{BookmarkError, BookmarkManager, ImportReport};
pub use config::{ConnectionProfile, JsonProfileStore, ProfileStore, Protocol, Secret};
pub use error::{ConnectError, ErrorKind, NavError, PreviewError, TransferError, UserError};
pub use gateway::{CompressFormat, GatewayError, RemoteEntry, RemoteGateway};
pub use navigation::DirectoryListing;
pub use preview::{PreviewPayload, PreviewState, PreviewStatus};
pub use session::{SessionController, SessionSnapshot, SessionStatus};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it again once a
/// subscriber is installed has no effect.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
