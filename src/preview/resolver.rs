//! Preview state and response sequencing

use base64::Engine;
use serde::Serialize;
use tracing::debug;

use super::kind::{classify, mime_type, PreviewKind};
use super::sequencer::PreviewSequencer;
use crate::error::PreviewError;
use crate::gateway::{GatewayError, RemoteEntry};

/// Where a preview stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Pending,
    Text,
    Image,
    Pdf,
    Failed,
}

impl From<PreviewKind> for PreviewStatus {
    fn from(kind: PreviewKind) -> Self {
        match kind {
            PreviewKind::Text => PreviewStatus::Text,
            PreviewKind::Image => PreviewStatus::Image,
            PreviewKind::Pdf => PreviewStatus::Pdf,
        }
    }
}

/// Resolved, renderable preview content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewPayload {
    Text { content: String },
    Image { data_uri: String },
    Pdf { data_uri: String },
}

impl PreviewPayload {
    fn from_response(kind: PreviewKind, mime: &str, body: String) -> Self {
        match kind {
            PreviewKind::Text => PreviewPayload::Text { content: body },
            PreviewKind::Image => PreviewPayload::Image {
                data_uri: data_uri(mime, &body),
            },
            PreviewKind::Pdf => PreviewPayload::Pdf {
                data_uri: data_uri(mime, &body),
            },
        }
    }

    pub fn kind(&self) -> PreviewKind {
        match self {
            PreviewPayload::Text { .. } => PreviewKind::Text,
            PreviewPayload::Image { .. } => PreviewKind::Image,
            PreviewPayload::Pdf { .. } => PreviewKind::Pdf,
        }
    }

    /// Raw bytes behind a data URI.
    ///
    /// `None` for text payloads or a body that is not valid base64.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        let uri = match self {
            PreviewPayload::Text { .. } => return None,
            PreviewPayload::Image { data_uri } | PreviewPayload::Pdf { data_uri } => data_uri,
        };
        let (_, body) = uri.split_once(";base64,")?;
        base64::engine::general_purpose::STANDARD.decode(body).ok()
    }
}

fn data_uri(mime: &str, base64_body: &str) -> String {
    format!("data:{};base64,{}", mime, base64_body)
}

/// The single live preview. Empty when nothing is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewState {
    pub target: Option<RemoteEntry>,
    pub status: Option<PreviewStatus>,
    pub payload: Option<PreviewPayload>,
}

impl PreviewState {
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.status.is_none()
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target.as_ref().map(|e| e.path.as_str())
    }
}

/// Issued for each preview request; carries everything needed to fetch
/// and later apply the response
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    pub generation: u64,
    pub path: String,
    pub kind: PreviewKind,
    pub mime: &'static str,
}

impl PreviewTicket {
    /// Whether the gateway should be asked for base64 instead of text
    pub fn wants_base64(&self) -> bool {
        self.kind.is_binary()
    }
}

/// Owns the preview state and decides which responses may touch it
#[derive(Debug, Default)]
pub struct PreviewResolver {
    sequencer: PreviewSequencer,
    state: PreviewState,
}

impl PreviewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Start a preview of `entry`, superseding any request still in flight
    pub fn begin(&mut self, entry: &RemoteEntry) -> PreviewTicket {
        let generation = self.sequencer.next();
        let kind = classify(&entry.name);
        self.state = PreviewState {
            target: Some(entry.clone()),
            status: Some(PreviewStatus::Pending),
            payload: None,
        };
        debug!("Preview #{} of {} as {:?}", generation, entry.path, kind);
        PreviewTicket {
            generation,
            path: entry.path.clone(),
            kind,
            mime: mime_type(&entry.name),
        }
    }

    /// Apply the gateway response for `ticket`.
    ///
    /// Responses of superseded tickets leave the state untouched and come
    /// back as [`PreviewError::Superseded`].
    pub fn complete(
        &mut self,
        ticket: &PreviewTicket,
        response: Result<String, GatewayError>,
    ) -> Result<PreviewPayload, PreviewError> {
        if !self.sequencer.is_current(ticket.generation) {
            debug!(
                "Discarding stale preview #{} of {} (latest #{})",
                ticket.generation,
                ticket.path,
                self.sequencer.current()
            );
            return Err(PreviewError::Superseded);
        }

        match response {
            Ok(body) => {
                let payload = PreviewPayload::from_response(ticket.kind, ticket.mime, body);
                self.state.status = Some(ticket.kind.into());
                self.state.payload = Some(payload.clone());
                Ok(payload)
            }
            Err(e) => {
                self.state = PreviewState {
                    target: None,
                    status: Some(PreviewStatus::Failed),
                    payload: None,
                };
                Err(PreviewError::Gateway(e.0))
            }
        }
    }

    /// Clear the preview and orphan any request in flight
    pub fn close(&mut self) {
        self.sequencer.invalidate();
        self.state = PreviewState::default();
    }

    /// Close only when the preview shows `path`
    pub fn close_if_target(&mut self, path: &str) -> bool {
        if self.state.target_path() == Some(path) {
            self.close();
            true
        } else {
            false
        }
    }
}
