//! Scripted gateway for controller tests
//!
//! Responses are configured up front; `gate_*` hooks hold a response back
//! until the test releases it, which is how out-of-order completions are
//! reproduced.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{CompressFormat, GatewayError, RemoteEntry, RemoteGateway};
use crate::config::ConnectionProfile;

type PreviewGate = oneshot::Receiver<Result<String, GatewayError>>;

#[derive(Default)]
pub(crate) struct MockGateway {
    calls: Mutex<Vec<String>>,
    connected_with: Mutex<Option<ConnectionProfile>>,
    listings: Mutex<HashMap<String, Vec<RemoteEntry>>>,
    list_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    texts: Mutex<HashMap<String, String>>,
    blobs: Mutex<HashMap<String, String>>,
    preview_gates: Mutex<HashMap<String, PreviewGate>>,
    /// Failures keyed by "command" or "command path"
    failures: Mutex<HashMap<String, String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listing(&self, path: &str, entries: Vec<RemoteEntry>) {
        self.listings.lock().insert(path.to_string(), entries);
    }

    pub fn set_text(&self, path: &str, text: &str) {
        self.texts.lock().insert(path.to_string(), text.to_string());
    }

    pub fn set_base64(&self, path: &str, data: &str) {
        self.blobs.lock().insert(path.to_string(), data.to_string());
    }

    /// Make every call of `command` fail
    pub fn fail(&self, command: &str, message: &str) {
        self.failures
            .lock()
            .insert(command.to_string(), message.to_string());
    }

    /// Make `command` fail for one path only
    pub fn fail_path(&self, command: &str, path: &str, message: &str) {
        self.failures
            .lock()
            .insert(format!("{} {}", command, path), message.to_string());
    }

    pub fn clear_failure(&self, command: &str) {
        self.failures.lock().remove(command);
    }

    /// Hold back the listing of `path` until the returned sender fires
    pub fn gate_list(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().insert(path.to_string(), rx);
        tx
    }

    /// Hold back the preview of `path`; the test supplies the response
    pub fn gate_preview(&self, path: &str) -> oneshot::Sender<Result<String, GatewayError>> {
        let (tx, rx) = oneshot::channel();
        self.preview_gates.lock().insert(path.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(command))
            .count()
    }

    pub fn connected_with(&self) -> Option<ConnectionProfile> {
        self.connected_with.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn check(&self, command: &str, path: Option<&str>) -> Result<(), GatewayError> {
        let failures = self.failures.lock();
        if let Some(path) = path {
            if let Some(message) = failures.get(&format!("{} {}", command, path)) {
                return Err(GatewayError::new(message.clone()));
            }
        }
        match failures.get(command) {
            Some(message) => Err(GatewayError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn gated_preview(
        &self,
        remote_path: &str,
        table: &Mutex<HashMap<String, String>>,
    ) -> Result<String, GatewayError> {
        let gate = self.preview_gates.lock().remove(remote_path);
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(GatewayError::new("preview gate dropped")));
        }
        table
            .lock()
            .get(remote_path)
            .cloned()
            .ok_or_else(|| GatewayError::new(format!("No such file: {}", remote_path)))
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn connect(&self, profile: &ConnectionProfile) -> Result<(), GatewayError> {
        self.record(format!("connect {}", profile.host));
        self.check("connect", None)?;
        *self.connected_with.lock() = Some(profile.clone());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        self.record("disconnect".to_string());
        self.check("disconnect", None)
    }

    async fn list_files(&self, path: &str) -> Result<Vec<RemoteEntry>, GatewayError> {
        self.record(format!("list_files {}", path));
        let gate = self.list_gates.lock().remove(path);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check("list_files", Some(path))?;
        Ok(self.listings.lock().get(path).cloned().unwrap_or_default())
    }

    async fn download_file(
        &self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), GatewayError> {
        self.record(format!("download_file {} {}", remote_path, local_path.display()));
        self.check("download_file", Some(remote_path))
    }

    async fn upload_file(&self, local_path: &Path, remote_path: &str) -> Result<(), GatewayError> {
        self.record(format!("upload_file {} {}", local_path.display(), remote_path));
        self.check("upload_file", Some(remote_path))
    }

    async fn delete_file(
        &self,
        remote_path: &str,
        is_directory: bool,
    ) -> Result<(), GatewayError> {
        self.record(format!("delete_file {} {}", remote_path, is_directory));
        self.check("delete_file", Some(remote_path))
    }

    async fn open_with_default_app(
        &self,
        remote_path: &str,
        file_name: &str,
    ) -> Result<(), GatewayError> {
        self.record(format!("open_with_default_app {} {}", remote_path, file_name));
        self.check("open_with_default_app", Some(remote_path))
    }

    async fn open_with_editor(
        &self,
        remote_path: &str,
        file_name: &str,
    ) -> Result<(), GatewayError> {
        self.record(format!("open_with_editor {} {}", remote_path, file_name));
        self.check("open_with_editor", Some(remote_path))
    }

    async fn preview_file_text(&self, remote_path: &str) -> Result<String, GatewayError> {
        self.record(format!("preview_file_text {}", remote_path));
        self.check("preview_file_text", Some(remote_path))?;
        self.gated_preview(remote_path, &self.texts).await
    }

    async fn preview_file_base64(&self, remote_path: &str) -> Result<String, GatewayError> {
        self.record(format!("preview_file_base64 {}", remote_path));
        self.check("preview_file_base64", Some(remote_path))?;
        self.gated_preview(remote_path, &self.blobs).await
    }

    async fn compress_file(
        &self,
        remote_path: &str,
        local_path: &Path,
        format: CompressFormat,
        is_directory: bool,
    ) -> Result<(), GatewayError> {
        self.record(format!(
            "compress_file {} {} {} {}",
            remote_path,
            local_path.display(),
            format,
            is_directory
        ));
        self.check("compress_file", Some(remote_path))
    }
}
