//! Producer and consumer operations over the shared queue.
//!
//! # Responsibilities
//! - Reject producers once shutdown has started
//! - Bound every enqueue and dequeue by its configured deadline
//! - Pair callback producers with the consumer that dequeues their message
//!
//! # Design Decisions
//! - Consumers are still served while draining
//! - The callback wait has no deadline; the producer blocks until answered

pub mod error;

pub use error::BalancerError;

use axum::body::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::config::BalancerConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::queue::{BoundedQueue, Message, ReplyMessage, ReplyOutcome};

/// The shared relay: one queue, one shutdown state, two deadlines.
#[derive(Debug)]
pub struct Balancer {
    queue: Arc<BoundedQueue>,
    shutdown: Shutdown,
    get_timeout: Duration,
    post_timeout: Duration,
}

impl Balancer {
    pub fn new(
        queue: Arc<BoundedQueue>,
        shutdown: Shutdown,
        get_timeout: Duration,
        post_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            shutdown,
            get_timeout,
            post_timeout,
        }
    }

    /// Build a balancer with a fresh queue sized and timed from `config`.
    pub fn from_config(config: &BalancerConfig, shutdown: Shutdown) -> Self {
        Self::new(
            Arc::new(BoundedQueue::new(config.queue.size)),
            shutdown,
            config.timeouts.get(),
            config.timeouts.post(),
        )
    }

    pub fn queue(&self) -> &Arc<BoundedQueue> {
        &self.queue
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Enqueue a plain message.
    pub async fn post(&self, payload: Bytes) -> Result<(), BalancerError> {
        self.ensure_running()?;
        self.queue.append(Message::new(payload), self.post_timeout).await?;
        metrics::set_queue_length(self.queue.len());
        Ok(())
    }

    /// Enqueue a message and wait, without a deadline, for the consumer
    /// that dequeues it to reply.
    pub async fn post_with_callback(&self, payload: Bytes) -> Result<ReplyMessage, BalancerError> {
        self.ensure_running()?;
        let (msg, pending) = Message::with_callback(payload);
        self.queue.append(msg, self.post_timeout).await?;
        metrics::set_queue_length(self.queue.len());

        tracing::debug!("Callback message queued, waiting for reply");
        Ok(pending.wait().await?)
    }

    /// Dequeue the oldest message. If its producer asked for a callback,
    /// `reply` is delivered to it before the payload is returned.
    pub async fn get(&self, reply: Bytes) -> Result<Bytes, BalancerError> {
        let msg = self.queue.remove(self.get_timeout).await?;
        metrics::set_queue_length(self.queue.len());
        let (payload, outcome) = msg.complete(ReplyMessage::new(reply));

        if outcome == ReplyOutcome::Abandoned {
            tracing::debug!("Callback producer went away before the reply arrived");
        }
        Ok(payload)
    }

    fn ensure_running(&self) -> Result<(), BalancerError> {
        if self.shutdown.is_running() {
            Ok(())
        } else {
            Err(BalancerError::Terminating)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balancer(capacity: usize) -> Balancer {
        Balancer::new(
            Arc::new(BoundedQueue::new(capacity)),
            Shutdown::new(),
            Duration::from_millis(100),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn post_then_get_round_trip() {
        let b = balancer(4);
        b.post(Bytes::from("FOOBAR")).await.unwrap();
        let payload = b.get(Bytes::new()).await.unwrap();
        assert_eq!(payload, Bytes::from("FOOBAR"));
    }

    #[tokio::test]
    async fn get_times_out_on_empty_queue() {
        let b = balancer(4);
        assert_eq!(b.get(Bytes::new()).await.unwrap_err(), BalancerError::Timeout);
    }

    #[tokio::test]
    async fn post_times_out_when_full() {
        let b = balancer(1);
        b.post(Bytes::from("one")).await.unwrap();
        assert_eq!(b.post(Bytes::from("two")).await.unwrap_err(), BalancerError::Timeout);
        assert_eq!(b.queue().len(), 1);
    }

    #[tokio::test]
    async fn producers_rejected_while_draining_consumers_served() {
        let b = balancer(4);
        b.post(Bytes::from("queued")).await.unwrap();
        b.shutdown().begin_draining();

        assert_eq!(b.post(Bytes::from("late")).await.unwrap_err(), BalancerError::Terminating);
        assert_eq!(
            b.post_with_callback(Bytes::from("late")).await.unwrap_err(),
            BalancerError::Terminating
        );
        assert_eq!(b.get(Bytes::new()).await.unwrap(), Bytes::from("queued"));
    }

    #[tokio::test]
    async fn callback_producer_receives_consumer_reply() {
        let b = Arc::new(balancer(4));
        let producer = {
            let b = b.clone();
            tokio::spawn(async move { b.post_with_callback(Bytes::from("FOOBAR")).await })
        };

        let payload = b.get(Bytes::from("CALLBACK")).await.unwrap();
        assert_eq!(payload, Bytes::from("FOOBAR"));

        let reply = producer.await.unwrap().unwrap();
        assert_eq!(reply.payload, Bytes::from("CALLBACK"));
    }

    #[tokio::test]
    async fn callback_producer_waits_past_deadlines() {
        let b = Arc::new(balancer(4));
        let producer = {
            let b = b.clone();
            tokio::spawn(async move { b.post_with_callback(Bytes::from("slow")).await })
        };

        // Well past both configured deadlines.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!producer.is_finished());

        b.get(Bytes::from("finally")).await.unwrap();
        let reply = producer.await.unwrap().unwrap();
        assert_eq!(reply.payload, Bytes::from("finally"));
    }
}
