//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with an explicit route per endpoint
//! - Wire up middleware (request ID, tracing)
//! - Dispatch requests to the balancer's producer / consumer operations
//! - Serve until terminated, then stop the listener within a deadline

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Query, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::balancer::{Balancer, BalancerError};
use crate::config::BalancerConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{empty_response, not_found, payload_response};
use crate::lifecycle::{Shutdown, ShutdownController};
use crate::observability::metrics;

pub const ENDPOINT_GET: &str = "get";
pub const ENDPOINT_POST: &str = "post";
pub const ENDPOINT_POST_WITH_CALLBACK: &str = "post_with_callback";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub balancer: Arc<Balancer>,
    pub metrics: Option<PrometheusHandle>,
}

/// Query parameters accepted by `GET /get`.
#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    /// Reply delivered to a callback producer, if the dequeued message has one.
    pub body: Option<String>,
}

/// HTTP server for the balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    balancer: Arc<Balancer>,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BalancerConfig) -> Self {
        let shutdown = Shutdown::new();
        let balancer = Arc::new(Balancer::from_config(&config, shutdown.clone()));

        let metrics = if config.observability.metrics_enabled {
            metrics::init_metrics()
        } else {
            None
        };

        let state = AppState {
            balancer: balancer.clone(),
            metrics,
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            balancer,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            // HEAD would otherwise reach the GET handler and dequeue a message.
            .route(
                "/get",
                get(get_handler)
                    .head(method_not_allowed)
                    .fallback(method_not_allowed),
            )
            .route("/post", post(post_handler).fallback(method_not_allowed))
            .route(
                "/post_with_callback",
                post(post_with_callback_handler).fallback(method_not_allowed),
            )
            .route("/metrics", get(metrics_handler).fallback(method_not_allowed))
            .fallback(fallback_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Controller that drains this server's queue and terminates it.
    pub fn controller(&self) -> ShutdownController {
        ShutdownController::new(
            self.shutdown.clone(),
            self.balancer.queue().clone(),
            self.config.lifecycle.graceful_period_secs,
        )
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub fn balancer(&self) -> &Arc<Balancer> {
        &self.balancer
    }

    /// Serve on `listener` until the shutdown state reaches `Terminated`.
    ///
    /// On termination the listener stops accepting connections and in-flight
    /// requests get `timeouts.shutdown_secs` to finish. Requests still running
    /// after that are abandoned; the failure is logged and this returns `Ok`.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let HttpServer {
            router,
            config,
            shutdown,
            ..
        } = self;

        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            queue_size = config.queue.size,
            "HTTP server starting"
        );

        let stop = shutdown.clone();
        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move { stop.terminated().await })
            .into_future();
        tokio::pin!(serve);

        let finished = tokio::select! {
            result = &mut serve => Some(result),
            _ = shutdown.terminated() => None,
        };

        let result = match finished {
            Some(result) => result,
            None => {
                let timeout = config.timeouts.shutdown();
                tracing::info!(
                    timeout_secs = config.timeouts.shutdown_secs,
                    "Listener closed, waiting for in-flight requests"
                );
                match tokio::time::timeout(timeout, serve).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(
                            timeout_secs = config.timeouts.shutdown_secs,
                            "Failed to shut down: in-flight requests outlived the shutdown timeout"
                        );
                        Ok(())
                    }
                }
            }
        };
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn make_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request),
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Consumer: dequeue the oldest payload, answering its callback if any.
async fn get_handler(
    State(state): State<AppState>,
    Query(params): Query<GetParams>,
) -> Response {
    metrics::record_request(ENDPOINT_GET);

    let reply = params.body.map(Bytes::from).unwrap_or_default();
    match state.balancer.get(reply).await {
        Ok(payload) => payload_response(&payload),
        Err(e) => failure(ENDPOINT_GET, e),
    }
}

/// Producer: enqueue the request body.
async fn post_handler(State(state): State<AppState>, body: Bytes) -> Response {
    metrics::record_request(ENDPOINT_POST);

    match state.balancer.post(body).await {
        Ok(()) => empty_response(),
        Err(e) => failure(ENDPOINT_POST, e),
    }
}

/// Callback producer: enqueue, then block until a consumer replies.
async fn post_with_callback_handler(State(state): State<AppState>, body: Bytes) -> Response {
    metrics::record_request(ENDPOINT_POST_WITH_CALLBACK);

    match state.balancer.post_with_callback(body).await {
        Ok(reply) => payload_response(&reply.payload),
        Err(e) => failure(ENDPOINT_POST_WITH_CALLBACK, e),
    }
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => not_found(),
    }
}

async fn method_not_allowed() -> Response {
    BalancerError::MethodNotAllowed.into_response()
}

async fn fallback_handler() -> Response {
    not_found()
}

fn failure(endpoint: &'static str, err: BalancerError) -> Response {
    match err {
        BalancerError::Timeout => {
            metrics::record_timeout(endpoint);
            tracing::debug!(endpoint, "Deadline exceeded");
        }
        BalancerError::Terminating => {
            metrics::record_rejected(endpoint);
            tracing::debug!(endpoint, "Rejected producer while terminating");
        }
        BalancerError::ReplyDropped => {
            tracing::warn!(endpoint, "Callback message dropped without a reply");
        }
        BalancerError::MethodNotAllowed => {}
    }
    err.into_response()
}
