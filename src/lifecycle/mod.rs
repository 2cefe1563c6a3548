//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → forwarded into a channel → watcher
//!
//! Drain (drain.rs):
//!     First signal  → Running → Draining, spawn drain loop
//!     Drain loop    → queue empty or tick budget spent → terminal action
//!     Second signal → terminal action immediately
//!
//! Shutdown (shutdown.rs):
//!     Terminal action → Terminated (exactly once)
//!     → HTTP server stops accepting, waits for in-flight, exits
//! ```
//!
//! # Design Decisions
//! - One owned state cell; every transition is a single atomic update
//! - Producers are rejected as soon as the state leaves Running
//! - Consumers keep working while Draining so the backlog can empty
//! - Listener shutdown has a timeout: forced exit after the deadline

pub mod drain;
pub mod shutdown;
pub mod signals;

pub use drain::ShutdownController;
pub use shutdown::{Shutdown, ShutdownState};
pub use signals::TerminationSignal;
