//! End-to-end dispatch tests against the full stack: reloader,
//! coordinator, listener and mock backends.

use std::time::Duration;

use slb_proxy::lifecycle::{launch, Shutdown};

mod common;

/// Give the first reload cycle time to probe, publish and bind.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(800)).await;
}

#[tokio::test]
async fn requests_only_reach_reachable_backends() {
    let dead = common::start_backend("a", false).await;
    let live = common::start_backend("b", true).await;

    let proxy_port = 28511;
    let config_path = common::write_config(
        "healthy-only",
        &format!(
            r#"{{"servers": ["http://{dead}", "http://{live}"], "port": "{proxy_port}"}}"#
        ),
    );

    let shutdown = Shutdown::new();
    let app = launch(common::test_settings(config_path.clone()), &shutdown).unwrap();
    settle().await;

    let client = common::http_client();
    for _ in 0..5 {
        let response = client
            .get(format!("http://127.0.0.1:{proxy_port}/anything"))
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "b");
    }

    shutdown.trigger();
    app.join().await;
    let _ = std::fs::remove_file(config_path);
}

#[tokio::test]
async fn route_prefix_dispatches_to_route_pool() {
    let orders_a = common::start_backend("c", true).await;
    let orders_b = common::start_backend("d", true).await;

    let proxy_port = 28512;
    let config_path = common::write_config(
        "routes",
        &format!(
            r#"{{"routes": [{{"route": "/orders", "endpoints": ["http://{orders_a}", "http://{orders_b}"]}}], "port": "{proxy_port}"}}"#
        ),
    );

    let shutdown = Shutdown::new();
    let app = launch(common::test_settings(config_path.clone()), &shutdown).unwrap();
    settle().await;

    let client = common::http_client();
    for _ in 0..4 {
        let response = client
            .get(format!("http://127.0.0.1:{proxy_port}/orders/123"))
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(response.status(), 200);
        let body = response.text().await.unwrap();
        assert!(body == "c" || body == "d", "unexpected backend: {body}");
    }

    // A path matching no route gets an explicit 404, not silence.
    let response = client
        .get(format!("http://127.0.0.1:{proxy_port}/payments/1"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(response.status(), 404);

    shutdown.trigger();
    app.join().await;
    let _ = std::fs::remove_file(config_path);
}

#[tokio::test]
async fn all_backends_unreachable_yields_503() {
    let dead = common::dead_backend().await;

    let proxy_port = 28513;
    let config_path = common::write_config(
        "all-dead",
        &format!(r#"{{"servers": ["http://{dead}"], "port": "{proxy_port}"}}"#),
    );

    let shutdown = Shutdown::new();
    let app = launch(common::test_settings(config_path.clone()), &shutdown).unwrap();
    settle().await;

    let response = common::http_client()
        .get(format!("http://127.0.0.1:{proxy_port}/x"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(response.status(), 503);

    shutdown.trigger();
    app.join().await;
    let _ = std::fs::remove_file(config_path);
}

#[tokio::test]
async fn backend_dying_after_selection_yields_502() {
    // Serves exactly one connection (the health probe), then refuses.
    let flaky = common::start_backend_serving_n("e", 1).await;

    let proxy_port = 28514;
    let config_path = common::write_config(
        "late-death",
        &format!(r#"{{"servers": ["http://{flaky}"], "port": "{proxy_port}"}}"#),
    );

    let shutdown = Shutdown::new();
    // Long reload interval: the backend must still be marked reachable
    // when the proxied call hits its closed socket.
    let mut settings = common::test_settings(config_path.clone());
    settings.reload_interval = Duration::from_secs(60);
    let app = launch(settings, &shutdown).unwrap();
    settle().await;

    let response = common::http_client()
        .get(format!("http://127.0.0.1:{proxy_port}/x"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(response.status(), 502);

    shutdown.trigger();
    app.join().await;
    let _ = std::fs::remove_file(config_path);
}

#[tokio::test]
async fn startup_fails_fast_on_corrupt_config() {
    let config_path = common::write_config("corrupt", "{not json");

    let shutdown = Shutdown::new();
    let result = launch(common::test_settings(config_path.clone()), &shutdown);
    assert!(result.is_err());

    let _ = std::fs::remove_file(config_path);
}
