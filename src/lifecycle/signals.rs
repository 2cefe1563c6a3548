//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGTERM/SIGINT handlers (Ctrl-C elsewhere)
//! - Forward each delivery into a channel
//! - Feed the channel to the shutdown controller
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Watcher reads from a plain channel so tests can inject signals

use tokio::sync::mpsc;

use crate::lifecycle::drain::ShutdownController;
use crate::lifecycle::shutdown::ShutdownState;

/// A termination request delivered to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl std::fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationSignal::Interrupt => write!(f, "SIGINT"),
            TerminationSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Install OS signal handlers and forward deliveries into a channel.
///
/// Must be called from within a Tokio runtime.
pub fn listen() -> std::io::Result<mpsc::Receiver<TerminationSignal>> {
    let (tx, rx) = mpsc::channel(4);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let mut interrupt = signal(SignalKind::interrupt())?;

        tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    Some(_) = terminate.recv() => TerminationSignal::Terminate,
                    Some(_) = interrupt.recv() => TerminationSignal::Interrupt,
                    else => break,
                };
                if tx.send(received).await.is_err() {
                    break;
                }
            }
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(TerminationSignal::Interrupt).await.is_err() {
                    break;
                }
            }
        });
    }

    Ok(rx)
}

/// Long-lived watcher: hand every signal to the controller until the
/// process is terminated.
pub async fn watch(controller: ShutdownController, mut signals: mpsc::Receiver<TerminationSignal>) {
    while let Some(signal) = signals.recv().await {
        controller.handle_signal(signal);
        if controller.shutdown().state() == ShutdownState::Terminated {
            break;
        }
    }
    tracing::debug!("Signal watcher exiting");
}
