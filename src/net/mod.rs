//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (resolve and bind)
//!     → Hand off to HTTP layer
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
