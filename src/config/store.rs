//! Profile Store and Editor Settings
//!
//! Async contracts for persisted connection profiles and editor settings,
//! plus the JSON-file implementation backed by [`ConfigStorage`].

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::storage::{ConfigStorage, StorageError};
use super::types::ConnectionProfile;

/// Persisted connection profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All saved profiles in insertion order
    async fn get_saved_connections(&self) -> Result<Vec<ConnectionProfile>, StorageError>;

    /// Update the profile with the same id in place, or insert it with a
    /// newly assigned id. Returns the stored profile.
    async fn save_connection(
        &self,
        profile: ConnectionProfile,
    ) -> Result<ConnectionProfile, StorageError>;

    /// Remove a profile; unknown ids are ignored
    async fn delete_connection(&self, id: &str) -> Result<(), StorageError>;

    /// Write an export document to `path`
    async fn export_bookmarks(&self, path: &Path, data: &str) -> Result<(), StorageError>;

    /// Read an export document from `path`
    async fn import_bookmarks(&self, path: &Path) -> Result<String, StorageError>;
}

/// An editor application found on this machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorInfo {
    pub name: String,
    pub path: String,
}

/// Editor used by "open with editor"
#[async_trait]
pub trait EditorSettings: Send + Sync {
    /// Configured editor path; empty when unset
    async fn get_editor_path(&self) -> Result<String, StorageError>;

    async fn set_editor_path(&self, path: &str) -> Result<(), StorageError>;

    /// Well-known editors installed on this machine
    async fn get_available_editors(&self) -> Result<Vec<EditorInfo>, StorageError>;
}

/// Install locations probed by [`EditorSettings::get_available_editors`]
const KNOWN_EDITORS: &[(&str, &str)] = &[
    ("Visual Studio Code", "/Applications/Visual Studio Code.app"),
    ("Sublime Text", "/Applications/Sublime Text.app"),
    ("TextMate", "/Applications/TextMate.app"),
    ("BBEdit", "/Applications/BBEdit.app"),
    ("Nova", "/Applications/Nova.app"),
    ("CotEditor", "/Applications/CotEditor.app"),
    ("TextEdit", "/Applications/TextEdit.app"),
    ("Xcode", "/Applications/Xcode.app"),
    ("IntelliJ IDEA", "/Applications/IntelliJ IDEA.app"),
    ("IntelliJ IDEA CE", "/Applications/IntelliJ IDEA CE.app"),
    ("PyCharm", "/Applications/PyCharm.app"),
    ("WebStorm", "/Applications/WebStorm.app"),
    ("Cursor", "/Applications/Cursor.app"),
    ("Zed", "/Applications/Zed.app"),
    ("Visual Studio Code", "/usr/bin/code"),
    ("Sublime Text", "/usr/bin/subl"),
    ("gedit", "/usr/bin/gedit"),
    ("Kate", "/usr/bin/kate"),
];

/// Profile store and editor settings persisted in one JSON file
pub struct JsonProfileStore {
    storage: ConfigStorage,
    /// Serializes read-modify-write cycles on the config file
    write_lock: Mutex<()>,
}

impl JsonProfileStore {
    /// Store at the default config location
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self::with_storage(ConfigStorage::new()?))
    }

    pub fn with_storage(storage: ConfigStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

#[async_trait]
impl ProfileStore for JsonProfileStore {
    async fn get_saved_connections(&self) -> Result<Vec<ConnectionProfile>, StorageError> {
        Ok(self.storage.load().await?.connections)
    }

    async fn save_connection(
        &self,
        mut profile: ConnectionProfile,
    ) -> Result<ConnectionProfile, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut config = self.storage.load().await?;

        let existing = profile
            .id
            .as_deref()
            .and_then(|id| config.connections.iter().position(|c| c.id.as_deref() == Some(id)));

        match existing {
            Some(idx) => {
                debug!("Updating connection {:?}", profile.id);
                config.connections[idx] = profile.clone();
            }
            None => {
                if profile.id.is_none() {
                    profile.id = Some(uuid::Uuid::new_v4().to_string());
                }
                info!(
                    "Saving new connection {} ({}://{})",
                    profile.display_name(),
                    profile.protocol,
                    profile.host
                );
                config.connections.push(profile.clone());
            }
        }

        self.storage.save(&config).await?;
        Ok(profile)
    }

    async fn delete_connection(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut config = self.storage.load().await?;
        config.connections.retain(|c| c.id.as_deref() != Some(id));
        self.storage.save(&config).await
    }

    async fn export_bookmarks(&self, path: &Path, data: &str) -> Result<(), StorageError> {
        tokio::fs::write(path, data).await?;
        info!("Exported bookmarks to {:?}", path);
        Ok(())
    }

    async fn import_bookmarks(&self, path: &Path) -> Result<String, StorageError> {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

#[async_trait]
impl EditorSettings for JsonProfileStore {
    async fn get_editor_path(&self) -> Result<String, StorageError> {
        Ok(self.storage.load().await?.editor_path)
    }

    async fn set_editor_path(&self, path: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut config = self.storage.load().await?;
        config.editor_path = path.to_string();
        self.storage.save(&config).await
    }

    async fn get_available_editors(&self) -> Result<Vec<EditorInfo>, StorageError> {
        let mut editors = Vec::new();
        for (name, path) in KNOWN_EDITORS {
            if tokio::fs::metadata(path).await.is_ok() {
                editors.push(EditorInfo {
                    name: name.to_string(),
                    path: path.to_string(),
                });
            }
        }
        Ok(editors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Protocol;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> JsonProfileStore {
        JsonProfileStore::with_storage(ConfigStorage::with_path(dir.join("connections.json")))
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_updates_in_place() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());

        let saved = store
            .save_connection(ConnectionProfile::new(Protocol::Sftp, "a.example", "alice", "pw"))
            .await
            .unwrap();
        let id = saved.id.clone().expect("id assigned");

        let renamed = saved.clone().with_name("Production");
        store.save_connection(renamed).await.unwrap();

        let all = store.get_saved_connections().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id.as_deref(), Some(id.as_str()));
        assert_eq!(all[0].name, "Production");
    }

    #[tokio::test]
    async fn test_delete_connection() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());

        let a = store
            .save_connection(ConnectionProfile::new(Protocol::Ftp, "a", "u", "p"))
            .await
            .unwrap();
        store
            .save_connection(ConnectionProfile::new(Protocol::Ftp, "b", "u", "p"))
            .await
            .unwrap();

        store.delete_connection(a.id.as_deref().unwrap()).await.unwrap();
        store.delete_connection("missing").await.unwrap();

        let all = store.get_saved_connections().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].host, "b");
    }

    #[tokio::test]
    async fn test_editor_path_round_trip() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());

        assert_eq!(store.get_editor_path().await.unwrap(), "");
        store.set_editor_path("/Applications/Zed.app").await.unwrap();
        assert_eq!(store.get_editor_path().await.unwrap(), "/Applications/Zed.app");

        // Editor setting must not disturb saved profiles
        store
            .save_connection(ConnectionProfile::new(Protocol::Sftp, "h", "u", "p"))
            .await
            .unwrap();
        assert_eq!(store.get_editor_path().await.unwrap(), "/Applications/Zed.app");
    }

    #[tokio::test]
    async fn test_export_import_file() {
        let temp = tempdir().unwrap();
        let store = store_in(temp.path());
        let file = temp.path().join("bookmarks.json");

        store.export_bookmarks(&file, "[]").await.unwrap();
        assert_eq!(store.import_bookmarks(&file).await.unwrap(), "[]");
        assert!(store
            .import_bookmarks(&temp.path().join("nope.json"))
            .await
            .is_err());
    }
}
