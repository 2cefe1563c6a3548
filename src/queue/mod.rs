//! Bounded message queue subsystem.
//!
//! # Data Flow
//! ```text
//! Producer call
//!     → message.rs (wrap payload, optional reply slot)
//!     → bounded.rs append (waits for a free slot up to post deadline)
//!
//! Consumer call
//!     → bounded.rs remove (waits for an item up to get deadline)
//!     → message.rs complete (push reply into the slot, if requested)
//!     → callback.rs (blocked callback producer receives the reply)
//! ```
//!
//! # Design Decisions
//! - One process-wide queue, FIFO, capacity fixed at startup
//! - A deadline and a completed transfer are mutually exclusive outcomes
//! - Callback pairing is positional: whoever dequeues a message answers it

pub mod bounded;
pub mod callback;
pub mod message;

pub use bounded::{BoundedQueue, QueueError};
pub use callback::{PendingReply, ReplyError, ReplyMessage, ReplySender};
pub use message::{Message, ReplyOutcome};
