//! Caller-facing error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::queue::{QueueError, ReplyError};

/// Errors reported to producer and consumer callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BalancerError {
    /// Append or remove deadline elapsed.
    #[error("Timeout exceeded")]
    Timeout,

    /// Producer refused because shutdown has started.
    #[error("Service is terminating")]
    Terminating,

    /// Callback message was dropped without a reply.
    #[error("Reply channel closed")]
    ReplyDropped,

    /// Wrong HTTP method for the endpoint.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl BalancerError {
    pub fn status(&self) -> StatusCode {
        match self {
            BalancerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            BalancerError::Timeout | BalancerError::Terminating | BalancerError::ReplyDropped => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<QueueError> for BalancerError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::TimedOut => BalancerError::Timeout,
        }
    }
}

impl From<ReplyError> for BalancerError {
    fn from(_: ReplyError) -> Self {
        BalancerError::ReplyDropped
    }
}

impl IntoResponse for BalancerError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self)).into_response()
    }
}
