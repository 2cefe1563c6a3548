//! Drain loop and terminal shutdown action.

use std::sync::Arc;
use std::time::Duration;

use crate::lifecycle::shutdown::{Shutdown, ShutdownState};
use crate::lifecycle::signals::TerminationSignal;
use crate::observability::metrics;
use crate::queue::BoundedQueue;

/// Interval between queue occupancy checks while draining.
pub const DRAIN_TICK: Duration = Duration::from_secs(1);

/// Reacts to termination signals by draining the queue and then stopping
/// the listener.
#[derive(Debug, Clone)]
pub struct ShutdownController {
    shutdown: Shutdown,
    queue: Arc<BoundedQueue>,
    graceful_period_ticks: u32,
    tick: Duration,
}

impl ShutdownController {
    /// `graceful_period_ticks` of zero means drain until the queue is empty.
    pub fn new(shutdown: Shutdown, queue: Arc<BoundedQueue>, graceful_period_ticks: u32) -> Self {
        Self {
            shutdown,
            queue,
            graceful_period_ticks,
            tick: DRAIN_TICK,
        }
    }

    /// Override the interval between occupancy checks.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// First signal starts draining; any later signal forces termination.
    pub fn handle_signal(&self, signal: TerminationSignal) {
        if self.shutdown.begin_draining() {
            tracing::info!(
                signal = %signal,
                queued = self.queue.len(),
                graceful_period_ticks = self.graceful_period_ticks,
                "Termination signal received, draining queue"
            );
            let controller = self.clone();
            tokio::spawn(async move {
                controller.drain().await;
            });
        } else {
            tracing::warn!(signal = %signal, "Signal repeated, shutting down immediately");
            self.finish();
        }
    }

    /// Wait for the queue to empty, at most `graceful_period_ticks` ticks,
    /// then run the terminal action.
    ///
    /// Returns the number of iterations performed.
    pub async fn drain(&self) -> u32 {
        let limit = self.graceful_period_ticks;
        let mut i = 0;

        while limit == 0 || i < limit {
            if self.shutdown.state() == ShutdownState::Terminated {
                break;
            }

            let messages_left = self.queue.len();
            metrics::set_queue_length(messages_left);
            if messages_left == 0 {
                break;
            }

            if limit > 0 {
                tracing::info!(
                    tries_left = limit - i - 1,
                    messages_left,
                    "Terminating: waiting for queue to drain"
                );
            } else {
                tracing::info!(messages_left, "Terminating: waiting for queue to drain");
            }

            tokio::time::sleep(self.tick).await;
            i += 1;
        }

        self.finish();
        i
    }

    /// Terminal action. Runs at most once; returns whether this call ran it.
    pub fn finish(&self) -> bool {
        if self.shutdown.terminate() {
            tracing::info!(messages_left = self.queue.len(), "Stopping listener");
            true
        } else {
            false
        }
    }
}
