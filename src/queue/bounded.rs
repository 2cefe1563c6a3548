//! Fixed-capacity FIFO with deadline-bounded append and remove.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use crate::queue::message::Message;

/// Error type for queue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The deadline elapsed before a slot or an item became available.
    #[error("queue operation timed out")]
    TimedOut,
}

/// A bounded FIFO shared by every producer and consumer call.
///
/// Appends go through the channel sender, which parks callers until a slot
/// frees up. Removes serialize on the receiver behind an async mutex, so
/// waiting consumers are served in the order they arrived.
pub struct BoundedQueue {
    tx: mpsc::Sender<Message>,
    rx: Mutex<mpsc::Receiver<Message>>,
}

impl BoundedQueue {
    /// Create a queue holding at most `capacity` messages.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Configuration validation rejects that
    /// value before the queue is built.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Append a message, waiting at most `deadline` for a free slot.
    ///
    /// On timeout the message is handed back to the channel and dropped; it
    /// never becomes visible to consumers.
    pub async fn append(&self, msg: Message, deadline: Duration) -> Result<(), QueueError> {
        // The receiver lives in `self`, so the only failure is the deadline.
        self.tx
            .send_timeout(msg, deadline)
            .await
            .map_err(|_| QueueError::TimedOut)
    }

    /// Remove the oldest message, waiting at most `deadline` for one to arrive.
    ///
    /// `recv` is cancel safe: if the deadline wins, no message is lost.
    pub async fn remove(&self, deadline: Duration) -> Result<Message, QueueError> {
        let recv = async {
            let mut rx = self.rx.lock().await;
            rx.recv().await
        };

        match tokio::time::timeout(deadline, recv).await {
            Ok(Some(msg)) => Ok(msg),
            // `None` needs every sender dropped; `self.tx` never is.
            Ok(None) | Err(_) => Err(QueueError::TimedOut),
        }
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of messages the queue can hold.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

impl std::fmt::Debug for BoundedQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
