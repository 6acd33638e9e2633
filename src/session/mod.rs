//! Session Controller Module
//!
//! Provides the single session of the client with:
//! - State machine for the connection lifecycle
//! - Busy flag guarding the one in-flight remote operation
//! - Navigation and preview driven through the gateway
//! - A single user-visible error slot

mod controller;
mod guard;
mod state;

pub use controller::{SessionController, SessionSnapshot};
pub use guard::{OperationGate, OperationGuard, OperationKind, PreviewGuard};
pub use state::{Session, SessionStateMachine, SessionStatus};
