//! Session Controller
//!
//! Owns the connection lifecycle and funnels every gateway call. State lives
//! behind one mutex that is never held across an `.await`; the operation
//! gate allows one exclusive remote operation at a time and none while a
//! preview is pending.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::guard::{OperationGate, OperationGuard, OperationKind, PreviewGuard};
use super::state::{Session, SessionStateMachine, SessionStatus};
use crate::config::{ConnectionProfile, ProfileStore, StorageError};
use crate::error::{
    ConnectError, ErrorKind, NavError, PreviewError, TransferError, UserError,
};
use crate::gateway::{CompressFormat, RemoteEntry, RemoteGateway};
use crate::navigation::{
    file_name, join_remote_path, Breadcrumb, DirectoryListing, NavigationState, ROOT,
};
use crate::preview::{PreviewPayload, PreviewResolver, PreviewState};

/// Everything mutable, guarded together so readers never see a torn view
struct ControllerState {
    session: SessionStateMachine,
    navigation: NavigationState,
    preview: PreviewResolver,
    error: Option<UserError>,
    /// Bumped by every disconnect; in-flight operations compare it to learn
    /// that the session they started on is gone
    epoch: u64,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            session: SessionStateMachine::new(),
            navigation: NavigationState::new(),
            preview: PreviewResolver::new(),
            error: None,
            epoch: 0,
        }
    }

    fn is_connected(&self) -> bool {
        self.session.status() == SessionStatus::Connected
    }
}

/// Read-only view of the whole controller for the UI layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: Session,
    pub busy: bool,
    pub current_path: String,
    pub listing: Option<DirectoryListing>,
    pub history: Vec<String>,
    pub recent_paths: Vec<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub can_go_back: bool,
    pub preview: PreviewState,
    pub error: Option<UserError>,
}

/// Errors that may land in the user-visible slot
trait Reportable: fmt::Display {
    const KIND: ErrorKind;

    /// Flow-control outcomes (busy, superseded, aborted) stay out of the slot
    fn is_reportable(&self) -> bool;
}

impl Reportable for ConnectError {
    const KIND: ErrorKind = ErrorKind::Connect;

    fn is_reportable(&self) -> bool {
        !matches!(self, ConnectError::Busy | ConnectError::Aborted)
    }
}

impl Reportable for NavError {
    const KIND: ErrorKind = ErrorKind::Navigation;

    fn is_reportable(&self) -> bool {
        !matches!(self, NavError::Busy | NavError::Aborted)
    }
}

impl Reportable for TransferError {
    const KIND: ErrorKind = ErrorKind::Transfer;

    fn is_reportable(&self) -> bool {
        !matches!(self, TransferError::Busy)
    }
}

impl Reportable for PreviewError {
    const KIND: ErrorKind = ErrorKind::Preview;

    fn is_reportable(&self) -> bool {
        !matches!(self, PreviewError::Busy | PreviewError::Superseded)
    }
}

/// Hub of the client: connection lifecycle, navigation, preview and the
/// single in-flight remote operation.
pub struct SessionController {
    gateway: Arc<dyn RemoteGateway>,
    profiles: Arc<dyn ProfileStore>,
    gate: Arc<OperationGate>,
    state: Mutex<ControllerState>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn RemoteGateway>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            gateway,
            profiles,
            gate: Arc::new(OperationGate::new()),
            state: Mutex::new(ControllerState::new()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Connection lifecycle
    // ═══════════════════════════════════════════════════════════════════

    /// Connect with `profile`, list `/` and remember the profile.
    ///
    /// The session only reports `Connected` once the root listing is in
    /// place. A failure to persist the profile is reported in the error slot
    /// but does not fail the connect.
    pub async fn connect(&self, profile: ConnectionProfile) -> Result<(), ConnectError> {
        let result = self.connect_inner(profile).await;
        self.report(result)
    }

    async fn connect_inner(&self, profile: ConnectionProfile) -> Result<(), ConnectError> {
        let profile = profile.normalized()?;
        let _guard = self.claim(OperationKind::Connect).ok_or(ConnectError::Busy)?;

        let epoch = {
            let mut state = self.state.lock();
            let status = state.session.status();
            if status != SessionStatus::Disconnected {
                return Err(ConnectError::AlreadyActive(status));
            }
            state.session.begin_connect(profile.protocol, &profile.host);
            state.epoch
        };

        info!(
            "Connecting to {}://{}:{} as {}",
            profile.protocol, profile.host, profile.port, profile.username
        );

        if let Err(e) = self.gateway.connect(&profile).await {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                return Err(ConnectError::Aborted);
            }
            state.session.transition(SessionStatus::Disconnected);
            warn!("Connection to {} failed: {}", profile.host, e);
            return Err(ConnectError::Gateway(e.0));
        }

        let listed = self.gateway.list_files(ROOT).await;

        let outcome = {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                Err(ConnectError::Aborted)
            } else {
                match listed {
                    Ok(entries) => {
                        state
                            .navigation
                            .apply(DirectoryListing::new(ROOT, entries));
                        state.session.transition(SessionStatus::Connected);
                        Ok(())
                    }
                    Err(e) => {
                        state.session.transition(SessionStatus::Disconnected);
                        Err(ConnectError::InitialListing(e.0))
                    }
                }
            }
        };

        if let Err(e) = outcome {
            warn!("Connection to {} abandoned: {}", profile.host, e);
            self.teardown_gateway().await;
            return Err(e);
        }

        info!("Connected to {}", profile.host);

        if let Err(e) = self.remember_profile(profile).await {
            warn!("Failed to save connection profile: {}", e);
            self.record(UserError::new(
                ErrorKind::Profile,
                format!("Failed to save connection: {}", e),
            ));
        }
        Ok(())
    }

    /// Upsert by identity (protocol, host, username) rather than by id
    async fn remember_profile(&self, mut profile: ConnectionProfile) -> Result<(), StorageError> {
        let saved = self.profiles.get_saved_connections().await?;
        let identity = profile.identity();
        let matched = saved
            .iter()
            .filter(|p| p.identity() == identity)
            .max_by_key(|p| p.id == profile.id);
        if let Some(existing) = matched {
            profile.id = existing.id.clone();
        }
        let stored = self.profiles.save_connection(profile).await?;
        debug!(
            "Remembered connection {} ({})",
            stored.display_name(),
            stored.id.as_deref().unwrap_or("-")
        );
        Ok(())
    }

    /// Tear the session down. Always succeeds locally, whatever the gateway
    /// says; calling it while disconnected does nothing.
    pub async fn disconnect(&self) {
        let was_active = {
            let mut state = self.state.lock();
            let was_active = state.session.status() != SessionStatus::Disconnected;
            state.preview.close();
            state.navigation.reset();
            state.session.reset();
            if was_active {
                state.epoch += 1;
            }
            was_active
        };

        if was_active {
            info!("Disconnecting");
            self.teardown_gateway().await;
        } else {
            debug!("Disconnect requested while already disconnected");
        }
    }

    async fn teardown_gateway(&self) {
        if let Err(e) = self.gateway.disconnect().await {
            warn!("Gateway disconnect failed (ignored): {}", e);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Navigation
    // ═══════════════════════════════════════════════════════════════════

    /// Fetch and show the listing of `path`. Closes the preview first.
    pub async fn navigate(&self, path: &str) -> Result<DirectoryListing, NavError> {
        let result = self.navigate_inner(path, true).await;
        self.report(result)
    }

    /// Navigate to the parent directory; `Ok(None)` at the root
    pub async fn go_back(&self) -> Result<Option<DirectoryListing>, NavError> {
        let parent = self.state.lock().navigation.parent();
        match parent {
            Some(parent) => self.navigate(&parent).await.map(Some),
            None => {
                debug!("Already at root, nothing to go back to");
                Ok(None)
            }
        }
    }

    /// Re-list the current directory.
    ///
    /// The preview stays open while its entry is still listed.
    pub async fn refresh(&self) -> Result<DirectoryListing, NavError> {
        let current = self.current_path();
        let result = self.navigate_inner(&current, false).await;
        self.report(result)
    }

    async fn navigate_inner(
        &self,
        path: &str,
        close_preview: bool,
    ) -> Result<DirectoryListing, NavError> {
        let target = NavigationState::resolve_target(path)?;
        if !self.state.lock().is_connected() {
            return Err(NavError::NotConnected);
        }
        let _guard = self.claim(OperationKind::Navigate).ok_or(NavError::Busy)?;
        self.load_directory(target, close_preview).await
    }

    /// List `target` and install the result. Caller holds the busy flag.
    async fn load_directory(
        &self,
        target: String,
        close_preview: bool,
    ) -> Result<DirectoryListing, NavError> {
        let epoch = {
            let mut state = self.state.lock();
            if !state.is_connected() {
                return Err(NavError::NotConnected);
            }
            if close_preview {
                state.preview.close();
            }
            state.epoch
        };

        debug!("Listing {}", target);
        let listed = self.gateway.list_files(&target).await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            debug!("Listing of {} dropped: session was disconnected", target);
            return Err(NavError::Aborted);
        }
        if !state.is_connected() {
            return Err(NavError::NotConnected);
        }
        let entries = listed.map_err(|e| NavError::Gateway(e.0))?;
        let listing = DirectoryListing::new(target, entries);
        let preview_gone = state
            .preview
            .state()
            .target_path()
            .is_some_and(|p| !listing.contains(p));
        if preview_gone {
            state.preview.close();
        }
        state.navigation.apply(listing.clone());
        debug!("Now at {} ({} entries)", listing.path, listing.len());
        Ok(listing)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Transfers and file operations
    // ═══════════════════════════════════════════════════════════════════

    pub async fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), TransferError> {
        let result = async {
            let _guard = self.begin_transfer(OperationKind::Download)?;
            info!("Downloading {} -> {}", remote_path, local_path.display());
            self.gateway
                .download_file(remote_path, local_path)
                .await
                .map_err(|e| TransferError::Gateway(e.0))
        }
        .await;
        self.report(result)
    }

    /// Upload `local_path` into the current directory and refresh it.
    ///
    /// Returns the remote path written. A failed refresh afterwards is
    /// reported but does not fail the upload.
    pub async fn upload(&self, local_path: &Path) -> Result<String, TransferError> {
        let result = self.upload_inner(local_path).await;
        self.report(result)
    }

    async fn upload_inner(&self, local_path: &Path) -> Result<String, TransferError> {
        let local = local_path.to_string_lossy();
        let name = file_name(&local);
        if name.is_empty() {
            return Err(TransferError::InvalidLocalPath(local.into_owned()));
        }

        let _guard = self.begin_transfer(OperationKind::Upload)?;
        let directory = self.current_path();
        let remote_path = join_remote_path(&directory, name);

        info!("Uploading {} -> {}", local_path.display(), remote_path);
        self.gateway
            .upload_file(local_path, &remote_path)
            .await
            .map_err(|e| TransferError::Gateway(e.0))?;

        self.reload_after_change(directory).await;
        Ok(remote_path)
    }

    /// Delete `entry`, close its preview and refresh the listing
    pub async fn delete(&self, entry: &RemoteEntry) -> Result<(), TransferError> {
        let result = async {
            let _guard = self.begin_transfer(OperationKind::Delete)?;
            info!("Deleting {}", entry.path);
            self.gateway
                .delete_file(&entry.path, entry.is_directory)
                .await
                .map_err(|e| TransferError::Gateway(e.0))?;

            let directory = {
                let mut state = self.state.lock();
                state.preview.close_if_target(&entry.path);
                state.navigation.current_path().to_string()
            };
            self.reload_after_change(directory).await;
            Ok::<(), TransferError>(())
        }
        .await;
        self.report(result)
    }

    /// Archive `entry` into `local_path` on this machine
    pub async fn compress(
        &self,
        entry: &RemoteEntry,
        local_path: &Path,
        format: CompressFormat,
    ) -> Result<(), TransferError> {
        let result = async {
            let _guard = self.begin_transfer(OperationKind::Compress)?;
            info!(
                "Compressing {} as {} -> {}",
                entry.path,
                format,
                local_path.display()
            );
            self.gateway
                .compress_file(&entry.path, local_path, format, entry.is_directory)
                .await
                .map_err(|e| TransferError::Gateway(e.0))
        }
        .await;
        self.report(result)
    }

    /// Open `entry` with the system's default application
    pub async fn open_external(&self, entry: &RemoteEntry) -> Result<(), TransferError> {
        let result = async {
            let _guard = self.begin_transfer(OperationKind::OpenExternal)?;
            self.gateway
                .open_with_default_app(&entry.path, &entry.name)
                .await
                .map_err(|e| TransferError::Gateway(e.0))
        }
        .await;
        self.report(result)
    }

    /// Open `entry` in the configured text editor
    pub async fn open_in_editor(&self, entry: &RemoteEntry) -> Result<(), TransferError> {
        let result = async {
            let _guard = self.begin_transfer(OperationKind::OpenEditor)?;
            self.gateway
                .open_with_editor(&entry.path, &entry.name)
                .await
                .map_err(|e| TransferError::Gateway(e.0))
        }
        .await;
        self.report(result)
    }

    fn begin_transfer(&self, kind: OperationKind) -> Result<OperationGuard, TransferError> {
        if !self.state.lock().is_connected() {
            return Err(TransferError::NotConnected);
        }
        self.claim(kind).ok_or(TransferError::Busy)
    }

    async fn reload_after_change(&self, directory: String) {
        if let Err(e) = self.load_directory(directory, false).await {
            warn!("Refresh after change failed: {}", e);
            self.record_error(&e);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Preview
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve a preview of `entry`.
    ///
    /// A later call supersedes this one; the earlier response is then
    /// discarded and reported as [`PreviewError::Superseded`].
    pub async fn preview(&self, entry: &RemoteEntry) -> Result<PreviewPayload, PreviewError> {
        let result = self.preview_inner(entry).await;
        self.report(result)
    }

    async fn preview_inner(&self, entry: &RemoteEntry) -> Result<PreviewPayload, PreviewError> {
        let _guard = PreviewGuard::try_acquire(&self.gate).ok_or(PreviewError::Busy)?;

        let ticket = {
            let mut state = self.state.lock();
            if !state.is_connected() {
                return Err(PreviewError::NotConnected);
            }
            if entry.is_directory {
                return Err(PreviewError::NotPreviewable(entry.path.clone()));
            }
            if !state.navigation.contains_entry(&entry.path) {
                return Err(PreviewError::NotInListing(entry.path.clone()));
            }
            state.preview.begin(entry)
        };

        let response = if ticket.wants_base64() {
            self.gateway.preview_file_base64(&ticket.path).await
        } else {
            self.gateway.preview_file_text(&ticket.path).await
        };

        self.state.lock().preview.complete(&ticket, response)
    }

    pub fn close_preview(&self) {
        self.state.lock().preview.close();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Error slot
    // ═══════════════════════════════════════════════════════════════════

    pub fn error(&self) -> Option<UserError> {
        self.state.lock().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    fn report<T, E: Reportable>(&self, result: Result<T, E>) -> Result<T, E> {
        if let Err(e) = &result {
            self.record_error(e);
        }
        result
    }

    fn record_error<E: Reportable>(&self, error: &E) {
        if error.is_reportable() {
            self.record(UserError::new(E::KIND, error.to_string()));
        }
    }

    fn record(&self, error: UserError) {
        debug!("Error slot <- {:?}: {}", error.kind, error.message);
        self.state.lock().error = Some(error);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════

    fn claim(&self, kind: OperationKind) -> Option<OperationGuard> {
        OperationGuard::try_acquire(&self.gate, kind)
    }

    /// Whether a remote operation, pending previews included, is in flight
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().session.status()
    }

    pub fn session(&self) -> Session {
        self.state.lock().session.session().clone()
    }

    pub fn current_path(&self) -> String {
        self.state.lock().navigation.current_path().to_string()
    }

    pub fn listing(&self) -> Option<DirectoryListing> {
        self.state.lock().navigation.listing().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.state.lock().navigation.history().to_vec()
    }

    pub fn recent_paths(&self) -> Vec<String> {
        self.state.lock().navigation.recent_paths()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.lock().navigation.can_go_back()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.state.lock().navigation.breadcrumbs()
    }

    pub fn preview_state(&self) -> PreviewState {
        self.state.lock().preview.state().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let busy = self.is_busy();
        let state = self.state.lock();
        SessionSnapshot {
            session: state.session.session().clone(),
            busy,
            current_path: state.navigation.current_path().to_string(),
            listing: state.navigation.listing().cloned(),
            history: state.navigation.history().to_vec(),
            recent_paths: state.navigation.recent_paths(),
            breadcrumbs: state.navigation.breadcrumbs(),
            can_go_back: state.navigation.can_go_back(),
            preview: state.preview.state().clone(),
            error: state.error.clone(),
        }
    }
}
