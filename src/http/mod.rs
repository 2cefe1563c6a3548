//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, explicit route table)
//!     → request.rs (assign request ID, open tracing span)
//!     → balancer (producer / consumer operation)
//!     → response.rs (newline-terminated body) or BalancerError response
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
