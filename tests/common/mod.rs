#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shortlink::application::services::CodePolicy;
use shortlink::domain::probe::{ProbeOutcome, RedirectProbe};
use shortlink::infrastructure::persistence::InMemoryStore;
use shortlink::routes::app_router;
use shortlink::state::AppState;

pub const PEER_ADDR: &str = "198.51.100.23:40000";

/// Probe that answers every URL with the same outcome and counts calls.
pub struct FixedProbe {
    outcome: ProbeOutcome,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedirectProbe for FixedProbe {
    async fn probe(&self, _url: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub probe: Arc<FixedProbe>,
}

pub fn create_test_state(
    store: Arc<InMemoryStore>,
    probe: Arc<FixedProbe>,
    behind_proxy: bool,
) -> AppState {
    AppState::new(
        store.clone(),
        store,
        probe,
        CodePolicy::default(),
        behind_proxy,
    )
}

/// Full router over a fresh in-memory store.
pub fn spawn_app_with(outcome: ProbeOutcome, behind_proxy: bool) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let probe = Arc::new(FixedProbe::new(outcome));
    let state = create_test_state(store.clone(), probe.clone(), behind_proxy);

    let peer: SocketAddr = PEER_ADDR.parse().unwrap();
    let app = Router::new()
        .fallback_service(app_router(state))
        .layer(MockConnectInfo(peer));

    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
        probe,
    }
}

/// Full router whose probe reports every destination as a plain 200.
pub fn spawn_app() -> TestApp {
    spawn_app_with(ProbeOutcome::NotRedirect(200), false)
}
