//! Preview Resolver
//!
//! Classifies a remote entry by extension, decides how its content must be
//! fetched and applies only the response of the most recent request.

pub mod kind;
pub mod resolver;
pub mod sequencer;

pub use kind::{
    classify, is_editor_file, mime_type, OpenAction, PreviewKind, FALLBACK_IMAGE_MIME,
};
pub use resolver::{PreviewPayload, PreviewResolver, PreviewState, PreviewStatus, PreviewTicket};
pub use sequencer::PreviewSequencer;
