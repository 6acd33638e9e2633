//! Navigation State Machine
//!
//! Current path, directory listing and recently visited paths. The state
//! never talks to the gateway itself; the session controller fetches
//! listings and hands them over.

pub mod history;
pub mod path_utils;
pub mod state;

pub use history::{PathHistory, HISTORY_CAPACITY, RECENT_DROPDOWN_LIMIT};
pub use path_utils::{
    breadcrumbs, file_name, is_absolute_remote_path, join_remote_path, normalize_remote_path,
    parent_path, segments, Breadcrumb, ROOT,
};
pub use state::{DirectoryListing, NavigationState};
