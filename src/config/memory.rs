//! In-memory profile store for tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::storage::StorageError;
use super::store::ProfileStore;
use super::types::ConnectionProfile;

#[derive(Default)]
pub(crate) struct MemoryProfileStore {
    profiles: Mutex<Vec<ConnectionProfile>>,
    files: Mutex<HashMap<PathBuf, String>>,
    next_id: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profiles(&self) -> Vec<ConnectionProfile> {
        self.profiles.lock().clone()
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    pub fn put_file(&self, path: &Path, data: &str) {
        self.files.lock().insert(path.to_path_buf(), data.to_string());
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_saved_connections(&self) -> Result<Vec<ConnectionProfile>, StorageError> {
        Ok(self.profiles())
    }

    async fn save_connection(
        &self,
        mut profile: ConnectionProfile,
    ) -> Result<ConnectionProfile, StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }

        let mut profiles = self.profiles.lock();
        let existing = profile
            .id
            .as_deref()
            .and_then(|id| profiles.iter().position(|p| p.id.as_deref() == Some(id)));
        match existing {
            Some(idx) => profiles[idx] = profile.clone(),
            None => {
                if profile.id.is_none() {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    profile.id = Some(format!("mem-{}", n));
                }
                profiles.push(profile.clone());
            }
        }
        Ok(profile)
    }

    async fn delete_connection(&self, id: &str) -> Result<(), StorageError> {
        self.profiles.lock().retain(|p| p.id.as_deref() != Some(id));
        Ok(())
    }

    async fn export_bookmarks(&self, path: &Path, data: &str) -> Result<(), StorageError> {
        self.put_file(path, data);
        Ok(())
    }

    async fn import_bookmarks(&self, path: &Path) -> Result<String, StorageError> {
        self.file(path).ok_or_else(|| {
            StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }
}
