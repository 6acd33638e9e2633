//! Navigation state: current directory, its listing, and visit history

use serde::Serialize;

use super::history::{PathHistory, RECENT_DROPDOWN_LIMIT};
use super::path_utils::{
    breadcrumbs, is_absolute_remote_path, normalize_remote_path, parent_path, Breadcrumb, ROOT,
};
use crate::error::NavError;
use crate::gateway::RemoteEntry;

/// Entries of one remote directory at one point in time.
///
/// Entries keep the order the backend delivered them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub path: String,
    pub entries: Vec<RemoteEntry>,
}

impl DirectoryListing {
    pub fn new(path: impl Into<String>, entries: Vec<RemoteEntry>) -> Self {
        Self {
            path: path.into(),
            entries,
        }
    }

    /// Look up an entry by its full path
    pub fn find(&self, path: &str) -> Option<&RemoteEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns the current path, the listing shown for it and the path history.
///
/// The listing is replaced wholesale on every successful navigation and
/// left untouched on failure.
#[derive(Debug, Clone)]
pub struct NavigationState {
    current_path: String,
    listing: Option<DirectoryListing>,
    history: PathHistory,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current_path: ROOT.to_string(),
            listing: None,
            history: PathHistory::new(),
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn listing(&self) -> Option<&DirectoryListing> {
        self.listing.as_ref()
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    /// Validate a navigation target and bring it into canonical form
    pub fn resolve_target(path: &str) -> Result<String, NavError> {
        if !is_absolute_remote_path(path) {
            return Err(NavError::InvalidPath(path.to_string()));
        }
        Ok(normalize_remote_path(path))
    }

    /// Install a freshly fetched listing and record the visit
    pub fn apply(&mut self, listing: DirectoryListing) {
        self.current_path = listing.path.clone();
        self.history.push(&listing.path);
        self.listing = Some(listing);
    }

    /// Parent of the current path; `None` at the root
    pub fn parent(&self) -> Option<String> {
        parent_path(&self.current_path)
    }

    pub fn can_go_back(&self) -> bool {
        self.parent().is_some()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.current_path)
    }

    /// History entries for the path bar dropdown
    pub fn recent_paths(&self) -> Vec<String> {
        self.history
            .recent_excluding(&self.current_path, RECENT_DROPDOWN_LIMIT)
    }

    /// Whether `path` names an entry of the current listing
    pub fn contains_entry(&self, path: &str) -> bool {
        self.listing
            .as_ref()
            .map(|l| l.contains(path))
            .unwrap_or(false)
    }

    /// Drop all remote-path state
    pub fn reset(&mut self) {
        self.current_path = ROOT.to_string();
        self.listing = None;
        self.history.clear();
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(path: &str) -> DirectoryListing {
        DirectoryListing::new(
            path,
            vec![RemoteEntry::file(format!("{}/x.txt", path.trim_end_matches('/')), 1)],
        )
    }

    #[test]
    fn test_apply_replaces_listing_and_records_history() {
        let mut nav = NavigationState::new();
        nav.apply(listing("/"));
        nav.apply(listing("/srv"));

        assert_eq!(nav.current_path(), "/srv");
        assert_eq!(nav.listing().unwrap().path, "/srv");
        assert!(nav.contains_entry("/srv/x.txt"));
        assert!(!nav.contains_entry("/x.txt"));
        assert_eq!(nav.history().to_vec(), vec!["/srv", "/"]);
        assert_eq!(nav.recent_paths(), vec!["/"]);
    }

    #[test]
    fn test_parent_and_can_go_back() {
        let mut nav = NavigationState::new();
        assert!(!nav.can_go_back());

        nav.apply(listing("/a/b/c"));
        assert_eq!(nav.parent().as_deref(), Some("/a/b"));
        assert!(nav.can_go_back());
        assert_eq!(nav.breadcrumbs().len(), 4);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(NavigationState::resolve_target("//a//b/").unwrap(), "/a/b");
        assert!(matches!(
            NavigationState::resolve_target("a/b"),
            Err(NavError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_reset() {
        let mut nav = NavigationState::new();
        nav.apply(listing("/data"));
        nav.reset();

        assert_eq!(nav.current_path(), "/");
        assert!(nav.listing().is_none());
        assert!(nav.history().is_empty());
    }
}
