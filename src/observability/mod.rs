//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is recorded on every request span
//! - Metrics are cheap (atomic increments behind the `metrics` facade)
//! - Recorder is process-global and installed once

pub mod logging;
pub mod metrics;
