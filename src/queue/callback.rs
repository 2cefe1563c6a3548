//! Single-use reply slot pairing a callback producer with its consumer.

use axum::body::Bytes;
use tokio::sync::oneshot;

/// Reply written by the consumer that served a callback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub payload: Bytes,
}

impl ReplyMessage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Error type for waiting on a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    /// The message was dropped without anyone answering it.
    #[error("reply slot dropped before a reply was written")]
    Dropped,
}

/// Write half of a reply slot. Consumed on first use.
#[derive(Debug)]
pub struct ReplySender {
    tx: oneshot::Sender<ReplyMessage>,
}

impl ReplySender {
    /// Push the reply into the slot. Never blocks.
    ///
    /// Returns the reply back if the waiting producer is gone.
    pub fn send(self, reply: ReplyMessage) -> Result<(), ReplyMessage> {
        self.tx.send(reply)
    }
}

/// Read half of a reply slot, held by the callback producer.
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<ReplyMessage>,
}

impl PendingReply {
    /// Wait for the reply. There is no deadline: if no consumer ever dequeues
    /// the message, this waits for as long as the message stays queued.
    pub async fn wait(self) -> Result<ReplyMessage, ReplyError> {
        self.rx.await.map_err(|_| ReplyError::Dropped)
    }
}

/// Create a fresh, empty reply slot of capacity one.
pub fn reply_slot() -> (ReplySender, PendingReply) {
    let (tx, rx) = oneshot::channel();
    (ReplySender { tx }, PendingReply { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reply_reaches_waiter() {
        let (tx, pending) = reply_slot();
        tx.send(ReplyMessage::new("CALLBACK")).unwrap();
        let reply = pending.wait().await.unwrap();
        assert_eq!(reply.payload, Bytes::from("CALLBACK"));
    }

    #[tokio::test]
    async fn dropped_sender_wakes_waiter() {
        let (tx, pending) = reply_slot();
        drop(tx);
        assert_eq!(pending.wait().await.unwrap_err(), ReplyError::Dropped);
    }

    #[test]
    fn send_to_gone_waiter_returns_reply() {
        let (tx, pending) = reply_slot();
        drop(pending);
        let rejected = tx.send(ReplyMessage::new("late")).unwrap_err();
        assert_eq!(rejected.payload, Bytes::from("late"));
    }
}
