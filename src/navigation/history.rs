//! Recently visited paths

use std::collections::VecDeque;

/// Maximum number of remembered paths
pub const HISTORY_CAPACITY: usize = 20;

/// Maximum number of entries offered by the path bar dropdown
pub const RECENT_DROPDOWN_LIMIT: usize = 10;

/// Most-recent-first list of visited paths without duplicates.
///
/// Re-visiting a path moves it to the front.
#[derive(Debug, Clone)]
pub struct PathHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a visit to `path`
    pub fn push(&mut self, path: &str) {
        if let Some(pos) = self.entries.iter().position(|p| p == path) {
            self.entries.remove(pos);
        }
        self.entries.push_front(path.to_string());
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Paths worth offering besides `current`, most recent first
    pub fn recent_excluding(&self, current: &str, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .filter(|p| p.as_str() != current)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for PathHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisit_moves_to_front() {
        let mut history = PathHistory::new();
        history.push("/");
        history.push("/a");
        history.push("/b");
        history.push("/a");

        assert_eq!(history.to_vec(), vec!["/a", "/b", "/"]);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut history = PathHistory::new();
        for i in 0..50 {
            history.push(&format!("/dir{}", i));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next(), Some("/dir49"));
        assert!(!history.iter().any(|p| p == "/dir29"));
    }

    #[test]
    fn test_never_contains_duplicates() {
        let mut history = PathHistory::with_capacity(5);
        for path in ["/a", "/b", "/a", "/c", "/b", "/a", "/d", "/e", "/f"] {
            history.push(path);
            let mut seen = std::collections::HashSet::new();
            assert!(history.iter().all(|p| seen.insert(p.to_string())));
            assert!(history.len() <= 5);
        }
    }

    #[test]
    fn test_recent_excluding_current() {
        let mut history = PathHistory::new();
        for i in 0..15 {
            history.push(&format!("/p{}", i));
        }
        let recent = history.recent_excluding("/p14", RECENT_DROPDOWN_LIMIT);
        assert_eq!(recent.len(), RECENT_DROPDOWN_LIMIT);
        assert_eq!(recent[0], "/p13");
        assert!(!recent.contains(&"/p14".to_string()));
    }
}
