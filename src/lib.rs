//! Passive Balancer Library

pub mod balancer;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod queue;

pub use balancer::{Balancer, BalancerError};
pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownController, ShutdownState};
