//! End-to-end tests over the built-in HTTP transport.

mod common;

use common::{free_port, write_config, ListProvider};
use rpc_server::{DiscoveryRunner, LifecycleController, StartError, TransportFactory};

fn echo_runner() -> DiscoveryRunner {
    let mut runner = DiscoveryRunner::empty();
    runner.add_provider("echo", || {
        Ok(Box::new(ListProvider {
            name: "echo",
            ids: vec!["echo"],
        }))
    });
    runner
}

#[tokio::test]
async fn test_rpc_round_trip_and_restart() {
    let port = free_port();
    let path = write_config(
        "e2e",
        &format!("[http]\nhost = \"127.0.0.1\"\nport = {}\n", port),
    );

    let controller = LifecycleController::with_parts(TransportFactory::new(), echo_runner());
    controller.start(Some(&path)).await.unwrap();

    let addr = controller.local_addr().await.unwrap();
    let base = format!("http://{}", addr);
    let client = reqwest::Client::new();

    // service listing
    let listing: serde_json::Value = client
        .get(format!("{}/services", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["services"][0], "echo");

    // invoke round trip, request id stamped on the response
    let response = client
        .post(format!("{}/rpc/echo/say", base))
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "hello");

    // unknown method and unknown service both 404
    let response = client
        .post(format!("{}/rpc/echo/nope", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .post(format!("{}/rpc/ghost/say", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unknown service: ghost");

    // service failures surface as 500
    let response = client
        .post(format!("{}/rpc/echo/explode", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    // stop releases the port
    controller.stop().await;
    assert!(!controller.is_running().await);
    assert!(client
        .get(format!("{}/services", base))
        .send()
        .await
        .is_err());

    // restart on the same port succeeds
    controller.start(Some(&path)).await.unwrap();
    let response = client
        .post(format!("{}/rpc/echo/say", base))
        .body("again")
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "again");

    controller.stop().await;
    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_bind_conflict_surfaces_error() {
    // hold the port so the transport cannot bind it
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let path = write_config(
        "conflict",
        &format!("[http]\nhost = \"127.0.0.1\"\nport = {}\n", port),
    );

    let controller = LifecycleController::with_parts(TransportFactory::new(), echo_runner());
    let err = controller.start(Some(&path)).await.unwrap_err();
    assert!(matches!(err, StartError::Transport(_)));
    assert!(!controller.is_running().await);
    assert_eq!(controller.local_addr().await, None);

    // the registry still reflects the discovery run of the failed attempt
    assert_eq!(controller.service_ids().await, vec!["echo".to_string()]);

    drop(occupied);
    std::fs::remove_file(path).ok();
}
