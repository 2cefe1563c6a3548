//! Termination-signal handling: drain, forced shutdown, listener timeout.

use std::time::{Duration, Instant};

use passive_balancer::lifecycle::ShutdownState;

mod common;

use common::{client, start_server, test_config};

#[tokio::test]
async fn test_drain_rejects_producers_serves_consumers() {
    let server = start_server(test_config()).await;
    let client = client();

    let res = client.post(server.url("/post")).body("queued").send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.signal().await;
    server.wait_for_state(ShutdownState::Draining).await;

    let res = client.post(server.url("/post")).body("late").send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Service is terminating\n");

    let res = client
        .post(server.url("/post_with_callback"))
        .body("late")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Service is terminating\n");

    let res = client.get(server.url("/get")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "queued\n");

    // Queue is empty now; the drain loop notices on its next tick.
    server.join(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_empty_queue_stops_immediately() {
    let server = start_server(test_config()).await;
    let addr = server.addr;

    let start = Instant::now();
    server.signal().await;
    server.join(Duration::from_secs(2)).await;
    assert!(start.elapsed() < Duration::from_secs(2));

    // Listener is gone.
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_second_signal_forces_shutdown() {
    let server = start_server(test_config()).await;
    let client = client();

    let res = client.post(server.url("/post")).body("stuck").send().await.unwrap();
    assert_eq!(res.status(), 200);

    let start = Instant::now();
    server.signal().await;
    server.signal().await;

    let shutdown = server.shutdown.clone();
    server.join(Duration::from_secs(3)).await;

    // The default grace period is 60 ticks; we must be far below that.
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(shutdown.state(), ShutdownState::Terminated);
}

#[tokio::test]
async fn test_grace_period_exhausted_with_full_queue() {
    let mut config = test_config();
    config.lifecycle.graceful_period_secs = 1;
    let server = start_server(config).await;
    let client = client();

    let res = client.post(server.url("/post")).body("never read").send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.signal().await;
    server.join(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_blocked_callback_cut_off_by_shutdown_timeout() {
    let server = start_server(test_config()).await;
    let client = client();

    // Nobody will ever consume this; the producer blocks indefinitely.
    let producer = {
        let client = client.clone();
        let url = server.url("/post_with_callback");
        tokio::spawn(async move { client.post(url).body("orphan").send().await })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!producer.is_finished());

    server.signal().await;
    server.signal().await;

    // shutdown_secs = 1: the server gives up on the blocked request and returns.
    server.join(Duration::from_secs(4)).await;
}
