//! Bookmark Manager
//!
//! CRUD and import/export over saved connection profiles. Works without an
//! active session and never touches the gateway.

pub mod export;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConnectionProfile, ProfileError, ProfileStore, StorageError};

pub use export::{ExportedProfile, ImportedProfile};

/// Suffix appended to the name of a duplicated profile
pub const COPY_SUFFIX: &str = " (copy)";

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Profile store error: {0}")]
    Store(#[from] StorageError),

    #[error("Invalid bookmark document: {0}")]
    Format(#[from] serde_json::Error),
}

impl Serialize for BookmarkError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// An import entry that was not saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Position in the imported array
    pub index: usize,
    pub reason: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: Vec<ConnectionProfile>,
    pub skipped: Vec<SkippedEntry>,
}

/// Saved profiles, on top of an external profile store
pub struct BookmarkManager {
    store: Arc<dyn ProfileStore>,
}

impl BookmarkManager {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<ConnectionProfile>, BookmarkError> {
        Ok(self.store.get_saved_connections().await?)
    }

    /// Validate and upsert by id; a profile without id gets a new one
    pub async fn save(&self, profile: ConnectionProfile) -> Result<ConnectionProfile, BookmarkError> {
        let profile = profile.normalized()?;
        let saved = self.store.save_connection(profile).await?;
        info!(
            "Saved bookmark {} ({}://{})",
            saved.display_name(),
            saved.protocol,
            saved.host
        );
        Ok(saved)
    }

    /// Remove permanently. A live session using this profile is unaffected.
    pub async fn delete(&self, id: &str) -> Result<(), BookmarkError> {
        self.store.delete_connection(id).await?;
        info!("Deleted bookmark {}", id);
        Ok(())
    }

    /// Save a copy of `profile` under a new id
    pub async fn duplicate(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<ConnectionProfile, BookmarkError> {
        let mut copy = profile.clone();
        copy.id = None;
        copy.name = format!("{}{}", profile.display_name(), COPY_SUFFIX);
        self.save(copy).await
    }

    /// Pretty JSON array of every saved profile, passwords excluded
    pub async fn export_all(&self) -> Result<String, BookmarkError> {
        let profiles = self.list().await?;
        render_export(&profiles)
    }

    /// Write the export document to `path`; returns the number of profiles
    pub async fn export_to(&self, path: &Path) -> Result<usize, BookmarkError> {
        let profiles = self.list().await?;
        let document = render_export(&profiles)?;
        let count = profiles.len();
        self.store.export_bookmarks(path, &document).await?;
        info!("Exported {} bookmarks to {}", count, path.display());
        Ok(count)
    }

    /// Save every entry of `document` as a new profile.
    ///
    /// Entries that are malformed or fail validation are skipped and listed
    /// in the report; a store failure aborts the import.
    pub async fn import_all(&self, document: &str) -> Result<ImportReport, BookmarkError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(document)?;
        let mut report = ImportReport::default();

        for (index, value) in entries.into_iter().enumerate() {
            let profile = serde_json::from_value::<ImportedProfile>(value)
                .map_err(|e| e.to_string())
                .and_then(|entry| entry.into_profile().normalized().map_err(|e| e.to_string()));

            match profile {
                Ok(profile) => {
                    let saved = self.store.save_connection(profile).await?;
                    report.imported.push(saved);
                }
                Err(reason) => {
                    warn!("Skipping bookmark #{}: {}", index, reason);
                    report.skipped.push(SkippedEntry { index, reason });
                }
            }
        }

        info!(
            "Imported {} bookmarks ({} skipped)",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    pub async fn import_from(&self, path: &Path) -> Result<ImportReport, BookmarkError> {
        let document = self.store.import_bookmarks(path).await?;
        self.import_all(&document).await
    }
}

fn render_export(profiles: &[ConnectionProfile]) -> Result<String, BookmarkError> {
    let exported: Vec<ExportedProfile> = profiles.iter().map(ExportedProfile::from).collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}
