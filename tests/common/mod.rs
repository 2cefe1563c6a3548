//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use passive_balancer::config::BalancerConfig;
use passive_balancer::http::HttpServer;
use passive_balancer::lifecycle::{signals, Shutdown, ShutdownState, TerminationSignal};

/// A balancer running on an ephemeral port with injectable signals.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub signals: mpsc::Sender<TerminationSignal>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn signal(&self) {
        self.signals.send(TerminationSignal::Terminate).await.unwrap();
    }

    /// Wait until the watcher has moved the state away from `Running`.
    pub async fn wait_for_state(&self, expected: ShutdownState) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.shutdown.state() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("shutdown state never reached");
    }

    /// Wait for `run` to return, failing the test after `limit`.
    pub async fn join(self, limit: Duration) {
        tokio::time::timeout(limit, self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap()
            .unwrap();
    }
}

/// Defaults tightened for tests: one-second deadlines and a small queue.
pub fn test_config() -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.queue.size = 16;
    config.timeouts.get_secs = 1;
    config.timeouts.post_secs = 1;
    config.timeouts.shutdown_secs = 1;
    config.observability.metrics_enabled = false;
    config
}

pub async fn start_server(config: BalancerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let shutdown = server.shutdown().clone();

    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(signals::watch(server.controller(), rx));
    let handle = tokio::spawn(server.run(listener));

    TestServer {
        addr,
        shutdown,
        signals: tx,
        handle,
    }
}

/// Client without connection reuse, so no idle keep-alive holds the server open.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
