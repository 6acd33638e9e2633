//! Remote Protocol Gateway
//!
//! The command boundary to the backend that owns the FTP/SFTP/SMB transports.
//! Every method is one request/response round trip; failures are opaque
//! strings that the core surfaces verbatim.

#[cfg(test)]
pub(crate) mod mock;
pub mod types;

use std::path::Path;

use async_trait::async_trait;

use crate::config::ConnectionProfile;

pub use types::{CompressFormat, GatewayError, RemoteEntry};

/// Backend command contract.
///
/// Implementations hold the single live connection handle. The session
/// controller is the only caller and never issues two exclusive commands at
/// once.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Open a connection using the full profile, secret included
    async fn connect(&self, profile: &ConnectionProfile) -> Result<(), GatewayError>;

    /// Tear down the active connection
    async fn disconnect(&self) -> Result<(), GatewayError>;

    /// List one remote directory
    async fn list_files(&self, path: &str) -> Result<Vec<RemoteEntry>, GatewayError>;

    async fn download_file(&self, remote_path: &str, local_path: &Path)
        -> Result<(), GatewayError>;

    async fn upload_file(&self, local_path: &Path, remote_path: &str) -> Result<(), GatewayError>;

    async fn delete_file(&self, remote_path: &str, is_directory: bool)
        -> Result<(), GatewayError>;

    /// Fetch the file and hand it to the OS default application
    async fn open_with_default_app(
        &self,
        remote_path: &str,
        file_name: &str,
    ) -> Result<(), GatewayError>;

    /// Fetch the file and open it in the configured editor
    async fn open_with_editor(&self, remote_path: &str, file_name: &str)
        -> Result<(), GatewayError>;

    /// Read a file as decoded text
    async fn preview_file_text(&self, remote_path: &str) -> Result<String, GatewayError>;

    /// Read a file as base64 text
    async fn preview_file_base64(&self, remote_path: &str) -> Result<String, GatewayError>;

    async fn compress_file(
        &self,
        remote_path: &str,
        local_path: &Path,
        format: CompressFormat,
        is_directory: bool,
    ) -> Result<(), GatewayError>;
}
