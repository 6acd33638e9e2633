//! Connection profile and config file types

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Remote file protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ftp,
    #[default]
    Sftp,
    Smb,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ftp => "ftp",
            Protocol::Sftp => "sftp",
            Protocol::Smb => "smb",
        }
    }

    /// Well-known port used when a profile does not specify one
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Ftp => 21,
            Protocol::Sftp => 22,
            Protocol::Smb => 445,
        }
    }

    /// SMB needs a share name in addition to the host
    pub fn requires_share(&self) -> bool {
        matches!(self, Protocol::Smb)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Password held by a profile.
///
/// Wiped from memory on drop and never printed by `Debug`. It serializes
/// transparently because the profile store and the gateway need the value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Profile validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Host is required")]
    MissingHost,

    #[error("SMB connections require a share name")]
    MissingShare,
}

/// A named description of how to reach one remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    /// Assigned by the profile store; `None` until saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "password", default)]
    pub secret: Secret,
    /// SMB share; present iff protocol is SMB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<String>,
}

/// The fields that make two profiles "the same server account"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileIdentity {
    pub protocol: Protocol,
    pub host: String,
    pub username: String,
}

impl ConnectionProfile {
    /// Create an unsaved profile on the protocol's default port
    pub fn new(
        protocol: Protocol,
        host: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<Secret>,
    ) -> Self {
        let host = host.into();
        Self {
            id: None,
            name: host.clone(),
            protocol,
            host,
            port: protocol.default_port(),
            username: username.into(),
            secret: secret.into(),
            share: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_share(mut self, share: impl Into<String>) -> Self {
        self.share = Some(share.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn identity(&self) -> ProfileIdentity {
        ProfileIdentity {
            protocol: self.protocol,
            host: self.host.clone(),
            username: self.username.clone(),
        }
    }

    pub fn same_identity(&self, other: &ConnectionProfile) -> bool {
        self.identity() == other.identity()
    }

    /// Display label used in lists and logs
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("{}@{}", self.username, self.host)
        } else {
            self.name.clone()
        }
    }

    /// Check the profile and bring it into canonical form.
    ///
    /// Trims host/name/share, defaults a blank name to the host, requires a
    /// share for SMB and drops it for every other protocol.
    pub fn normalized(mut self) -> Result<Self, ProfileError> {
        self.host = self.host.trim().to_string();
        if self.host.is_empty() {
            return Err(ProfileError::MissingHost);
        }

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            self.name = self.host.clone();
        }

        if self.protocol.requires_share() {
            let share = self
                .share
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(ProfileError::MissingShare)?;
            self.share = Some(share);
        } else {
            self.share = None;
        }

        Ok(self)
    }
}

/// Root of the on-disk config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub connections: Vec<ConnectionProfile>,
    /// Application used by "open with editor"; empty when unset
    #[serde(default)]
    pub editor_path: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            connections: Vec::new(),
            editor_path: String::new(),
        }
    }
}
