//! Portable bookmark document
//!
//! The exported form never carries the password. Imported entries fill in
//! whatever is missing with the same defaults the connection form uses.

use serde::{Deserialize, Serialize};

use crate::config::{ConnectionProfile, Protocol, Secret};

/// One exported profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedProfile {
    pub name: String,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<String>,
}

impl From<&ConnectionProfile> for ExportedProfile {
    fn from(profile: &ConnectionProfile) -> Self {
        Self {
            name: profile.name.clone(),
            protocol: profile.protocol,
            host: profile.host.clone(),
            port: profile.port,
            username: profile.username.clone(),
            share: profile.share.clone(),
        }
    }
}

/// One entry of an imported document; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportedProfile {
    pub name: Option<String>,
    pub protocol: Option<Protocol>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub share: Option<String>,
}

impl ImportedProfile {
    /// Build an unsaved profile, defaulting protocol to SFTP, the port to the
    /// protocol's well-known port and the password to empty
    pub fn into_profile(self) -> ConnectionProfile {
        let protocol = self.protocol.unwrap_or_default();
        let host = self.host.unwrap_or_default();
        ConnectionProfile {
            id: None,
            name: self.name.unwrap_or_else(|| host.clone()),
            protocol,
            port: self.port.unwrap_or_else(|| protocol.default_port()),
            host,
            username: self.username.unwrap_or_default(),
            secret: Secret::new(self.password.unwrap_or_default()),
            share: self.share,
        }
    }
}
