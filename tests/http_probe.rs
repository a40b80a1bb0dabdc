use axum::{
    Router,
    extract::Path,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use std::net::SocketAddr;
use std::time::Duration;

use shortlink::domain::probe::{ProbeOutcome, REDIRECT_STATUSES, RedirectProbe};
use shortlink::infrastructure::probe::HttpRedirectProbe;

async fn status_handler(Path(status): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
    (status, [(header::LOCATION, "/landing")])
}

async fn slow_handler() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}

/// Serves `/status/{code}` and `/slow` on an ephemeral local port.
async fn spawn_destination() -> SocketAddr {
    let app = Router::new()
        .route("/status/{status}", get(status_handler))
        .route("/slow", get(slow_handler))
        .route("/landing", get(|| async { "landing" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn probe() -> HttpRedirectProbe {
    HttpRedirectProbe::new(Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn test_redirect_statuses_are_detected_without_following() {
    let addr = spawn_destination().await;
    let probe = probe();

    for status in REDIRECT_STATUSES {
        let outcome = probe.probe(&format!("http://{addr}/status/{status}")).await;
        assert_eq!(outcome, ProbeOutcome::RedirectDetected(status));
    }
}

#[tokio::test]
async fn test_other_statuses_are_not_redirects() {
    let addr = spawn_destination().await;
    let probe = probe();

    for status in [200, 204, 404, 500] {
        let outcome = probe.probe(&format!("http://{addr}/status/{status}")).await;
        assert_eq!(outcome, ProbeOutcome::NotRedirect(status));
    }
}

#[tokio::test]
async fn test_slow_destination_is_unreachable() {
    let addr = spawn_destination().await;

    let outcome = probe().probe(&format!("http://{addr}/slow")).await;

    assert!(matches!(outcome, ProbeOutcome::Unreachable(_)));
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = probe().probe(&format!("http://{addr}/")).await;

    assert!(matches!(outcome, ProbeOutcome::Unreachable(_)));
}
