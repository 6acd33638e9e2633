//! Configuration Management Module
//!
//! Connection profiles, the on-disk config file, and the Profile Store /
//! Editor Settings contracts the core consumes.

#[cfg(test)]
pub(crate) mod memory;
pub mod storage;
pub mod store;
pub mod types;

pub use storage::{config_dir, connections_file, ConfigStorage, StorageError};
pub use store::{EditorInfo, EditorSettings, JsonProfileStore, ProfileStore};
pub use types::{
    ConfigFile, ConnectionProfile, ProfileError, ProfileIdentity, Protocol, Secret,
    CONFIG_VERSION,
};
