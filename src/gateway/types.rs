//! Gateway data types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque failure reported by the backend.
///
/// The backend contract defines no error codes, so the message is carried
/// verbatim and shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GatewayError(pub String);

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for GatewayError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for GatewayError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// One entry of a remote directory listing.
///
/// `path` is fully qualified and identifies the entry within a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    /// File name (not full path)
    pub name: String,
    /// Full remote path
    pub path: String,
    pub is_directory: bool,
    /// Size in bytes (0 for directories on most backends)
    pub size: u64,
    /// Last modification time as reported by the backend
    #[serde(rename = "modified", default)]
    pub modified_at: String,
    /// Permission string, when the protocol exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

impl RemoteEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: crate::navigation::file_name(&path).to_string(),
            path,
            is_directory: false,
            size,
            modified_at: String::new(),
            permissions: None,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: crate::navigation::file_name(&path).to_string(),
            path,
            is_directory: true,
            size: 0,
            modified_at: String::new(),
            permissions: None,
        }
    }
}

/// Archive formats the backend can produce from a remote file or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressFormat {
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar")]
    Tar,
    #[serde(rename = "tar.gz")]
    TarGz,
    #[serde(rename = "tar.bz2")]
    TarBz2,
}

impl CompressFormat {
    pub const ALL: [CompressFormat; 4] = [
        CompressFormat::Zip,
        CompressFormat::Tar,
        CompressFormat::TarGz,
        CompressFormat::TarBz2,
    ];

    /// Wire name used by the `compress_file` command
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressFormat::Zip => "zip",
            CompressFormat::Tar => "tar",
            CompressFormat::TarGz => "tar.gz",
            CompressFormat::TarBz2 => "tar.bz2",
        }
    }

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            CompressFormat::Zip => ".zip",
            CompressFormat::Tar => ".tar",
            CompressFormat::TarGz => ".tar.gz",
            CompressFormat::TarBz2 => ".tar.bz2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    /// Suggested archive name for `source_name`.
    ///
    /// The last extension of the source is replaced, so `notes.txt` becomes
    /// `notes.tar.gz`. Dotfiles keep their full name.
    pub fn default_archive_name(&self, source_name: &str) -> String {
        let base = match source_name.rfind('.') {
            Some(idx) if idx > 0 => &source_name[..idx],
            _ => source_name,
        };
        format!("{}{}", base, self.extension())
    }
}

impl std::fmt::Display for CompressFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
