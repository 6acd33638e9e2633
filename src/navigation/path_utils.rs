//! Remote path utilities
//!
//! Remote paths always use `/` regardless of the local or remote OS. Segments
//! come from splitting on `/` and dropping empty pieces, so `//a//b/` and
//! `/a/b` name the same directory.

use serde::Serialize;

/// Root of every remote file system
pub const ROOT: &str = "/";

/// Check if a remote path is absolute
pub fn is_absolute_remote_path(path: &str) -> bool {
    path.starts_with('/')
}

/// Non-empty `/`-delimited segments of `path`
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical form: leading `/`, no empty or trailing segments
pub fn normalize_remote_path(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

/// Parent of `path`, or `None` at the root (or for an empty path)
pub fn parent_path(path: &str) -> Option<String> {
    let mut parts = segments(path);
    parts.pop()?;
    Some(format!("/{}", parts.join("/")))
}

/// Join remote path components using `/`
pub fn join_remote_path(base: &str, component: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, component)
    } else {
        format!("{}/{}", base, component)
    }
}

/// Last segment of a remote or local path
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// One clickable element of a path bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Breadcrumbs for `path`, starting with the root
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let parts = segments(path);
    let mut crumbs = Vec::with_capacity(parts.len() + 1);
    crumbs.push(Breadcrumb {
        label: ROOT.to_string(),
        path: ROOT.to_string(),
    });
    for i in 0..parts.len() {
        crumbs.push(Breadcrumb {
            label: parts[i].to_string(),
            path: format!("/{}", parts[..=i].join("/")),
        });
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute_remote_path() {
        assert!(is_absolute_remote_path("/home/user"));
        assert!(is_absolute_remote_path("/"));
        assert!(!is_absolute_remote_path("relative/path"));
        assert!(!is_absolute_remote_path("C:\\Windows"));
    }

    #[test]
    fn test_normalize_collapses_empty_segments() {
        assert_eq!(normalize_remote_path("//a//b/"), "/a/b");
        assert_eq!(normalize_remote_path("/a/b"), "/a/b");
        assert_eq!(normalize_remote_path("/"), "/");
        assert_eq!(normalize_remote_path("///"), "/");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/a/b/c").as_deref(), Some("/a/b"));
        assert_eq!(parent_path("/a").as_deref(), Some("/"));
        assert_eq!(parent_path("//a//b/").as_deref(), Some("/a"));
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path(""), None);
    }

    #[test]
    fn test_join_remote_path() {
        assert_eq!(join_remote_path("/home", "file.txt"), "/home/file.txt");
        assert_eq!(join_remote_path("/home/", "file.txt"), "/home/file.txt");
        assert_eq!(join_remote_path("/", "home"), "/home");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/var/log/syslog"), "syslog");
        assert_eq!(file_name("/var/log/"), "log");
        assert_eq!(file_name("C:\\Users\\me\\notes.txt"), "notes.txt");
        assert_eq!(file_name("/"), "");
    }

    #[test]
    fn test_breadcrumbs() {
        let crumbs = breadcrumbs("/srv/www/html");
        let paths: Vec<_> = crumbs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/srv", "/srv/www", "/srv/www/html"]);
        assert_eq!(crumbs[2].label, "www");

        assert_eq!(breadcrumbs("/").len(), 1);
    }
}
