//! Unit of transit through the queue.

use axum::body::Bytes;

use crate::queue::callback::{reply_slot, PendingReply, ReplyMessage, ReplySender};

/// What happened to the reply when a consumer completed a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The producer did not ask for a callback.
    NotRequested,
    /// The reply was written into the slot.
    Delivered,
    /// The producer stopped waiting; the reply was discarded.
    Abandoned,
}

/// An opaque payload, plus a reply slot when the producer wants a callback.
#[derive(Debug)]
pub struct Message {
    payload: Bytes,
    reply_slot: Option<ReplySender>,
}

impl Message {
    /// Create a plain message.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            reply_slot: None,
        }
    }

    /// Create a message that expects a reply from whoever dequeues it.
    pub fn with_callback(payload: impl Into<Bytes>) -> (Self, PendingReply) {
        let (tx, pending) = reply_slot();
        let msg = Self {
            payload: payload.into(),
            reply_slot: Some(tx),
        };
        (msg, pending)
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn callback_requested(&self) -> bool {
        self.reply_slot.is_some()
    }

    /// Finish serving this message: answer the producer if it asked for a
    /// callback and hand back the payload.
    pub fn complete(self, reply: ReplyMessage) -> (Bytes, ReplyOutcome) {
        let outcome = match self.reply_slot {
            None => ReplyOutcome::NotRequested,
            Some(slot) => match slot.send(reply) {
                Ok(()) => ReplyOutcome::Delivered,
                Err(_) => ReplyOutcome::Abandoned,
            },
        };
        (self.payload, outcome)
    }
}
