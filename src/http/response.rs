//! Response bodies.
//!
//! Every payload the balancer writes back, whether a dequeued message or a
//! callback reply, is terminated with a newline.

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// 200 with `payload` followed by `\n`.
pub fn payload_response(payload: &[u8]) -> Response {
    let mut body = Vec::with_capacity(payload.len() + 1);
    body.extend_from_slice(payload);
    body.push(b'\n');
    (StatusCode::OK, Body::from(Bytes::from(body))).into_response()
}

/// 200 with an empty body.
pub fn empty_response() -> Response {
    StatusCode::OK.into_response()
}

/// 404 for paths the balancer does not serve.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found\n").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn payload_gets_trailing_newline() {
        let response = payload_response(b"FOOBAR");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"FOOBAR\n");
    }

    #[tokio::test]
    async fn empty_payload_is_just_newline() {
        let body = to_bytes(payload_response(b"").into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"\n");
    }
}
