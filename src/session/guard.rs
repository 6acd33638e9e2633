//! Single in-flight remote operation

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

/// Gateway-facing operations that hold the connection exclusively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Connect,
    Navigate,
    Download,
    Upload,
    Delete,
    Compress,
    OpenExternal,
    OpenEditor,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Connect => "connect",
            OperationKind::Navigate => "navigate",
            OperationKind::Download => "download",
            OperationKind::Upload => "upload",
            OperationKind::Delete => "delete",
            OperationKind::Compress => "compress",
            OperationKind::OpenExternal => "open-external",
            OperationKind::OpenEditor => "open-editor",
        };
        f.write_str(name)
    }
}

/// Busy state shared by the controller and its guards.
///
/// One exclusive operation at a time, and never while a preview is in
/// flight. Previews may overlap each other; the newest one wins through the
/// preview generation, not here.
#[derive(Debug, Default)]
pub struct OperationGate {
    exclusive: AtomicBool,
    previews: AtomicUsize,
}

impl OperationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any remote operation, preview included, is in flight
    pub fn is_busy(&self) -> bool {
        self.exclusive.load(Ordering::SeqCst) || self.previews.load(Ordering::SeqCst) > 0
    }

    pub fn previews_in_flight(&self) -> usize {
        self.previews.load(Ordering::SeqCst)
    }
}

/// RAII claim on the exclusive slot, released on drop.
///
/// Claiming never waits: a second claim while one is held fails
/// immediately, there is no queue.
pub struct OperationGuard {
    gate: Arc<OperationGate>,
    kind: OperationKind,
}

impl OperationGuard {
    pub fn try_acquire(gate: &Arc<OperationGate>, kind: OperationKind) -> Option<Self> {
        if gate
            .exclusive
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Operation {} rejected: another operation is in flight", kind);
            return None;
        }

        // A preview registers before it checks the exclusive slot, so one of
        // the two sides always sees the other.
        if gate.previews.load(Ordering::SeqCst) > 0 {
            gate.exclusive.store(false, Ordering::SeqCst);
            warn!("Operation {} rejected: a preview is in flight", kind);
            return None;
        }

        debug!("Operation {} started", kind);
        Some(Self {
            gate: gate.clone(),
            kind,
        })
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.gate.exclusive.store(false, Ordering::SeqCst);
        debug!("Operation {} finished", self.kind);
    }
}

/// RAII registration of one pending preview request
pub struct PreviewGuard {
    gate: Arc<OperationGate>,
}

impl PreviewGuard {
    pub fn try_acquire(gate: &Arc<OperationGate>) -> Option<Self> {
        gate.previews.fetch_add(1, Ordering::SeqCst);
        if gate.exclusive.load(Ordering::SeqCst) {
            gate.previews.fetch_sub(1, Ordering::SeqCst);
            warn!("Preview rejected: another operation is in flight");
            return None;
        }
        Some(Self { gate: gate.clone() })
    }
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        self.gate.previews.fetch_sub(1, Ordering::SeqCst);
    }
}
