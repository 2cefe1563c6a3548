//! Shutdown state shared by producers, the drain loop and the server.

use std::sync::Arc;
use tokio::sync::watch;

/// Process-wide shutdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    /// Accepting producers and consumers.
    Running,
    /// Rejecting producers; consumers drain the backlog.
    Draining,
    /// Listener is being stopped. Absorbing.
    Terminated,
}

/// Coordinator for graceful shutdown.
///
/// Wraps a watch channel so every transition happens under the channel's
/// lock and late subscribers still observe the current state.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<ShutdownState>>,
}

impl Shutdown {
    /// Create a new coordinator in the `Running` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ShutdownState::Running);
        Self { tx: Arc::new(tx) }
    }

    /// Current state.
    pub fn state(&self) -> ShutdownState {
        *self.tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == ShutdownState::Running
    }

    /// `Running → Draining`. Returns true only for the call that made the move.
    pub fn begin_draining(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == ShutdownState::Running {
                *state = ShutdownState::Draining;
                true
            } else {
                false
            }
        })
    }

    /// Enter `Terminated`. Returns true exactly once per coordinator, which
    /// makes it the guard for the terminal shutdown action.
    pub fn terminate(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == ShutdownState::Terminated {
                false
            } else {
                *state = ShutdownState::Terminated;
                true
            }
        })
    }

    /// Resolve once the state is `Terminated`, including if it already is.
    pub async fn terminated(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() == ShutdownState::Terminated {
                return;
            }
            // The sender lives in `self`, so the channel cannot close here.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
