use axum::Router;
use tokio::net::TcpListener;
use workorder_core::session::{Credentials, Session};
use workorder_service::MemoryService;

use crate::seed::{Seed, DEMO_EMAIL, DEMO_PASSWORD};

/// Credentials of the demo account every test server accepts.
pub fn demo_credentials() -> Credentials {
    Credentials {
        email: DEMO_EMAIL.into(),
        password: DEMO_PASSWORD.into(),
    }
}

/// Build a router over the demo seed.
pub fn test_router() -> Router {
    let seed = Seed::demo();
    crate::app(MemoryService::new(seed.dataset.clone()), seed.auth_config())
}

/// Build a router over the demo seed and log in, returning (router, token).
pub async fn test_router_with_token() -> (Router, String) {
    let seed = Seed::demo();
    let auth = seed.auth_config();
    let Session { token, .. } = auth.login(&demo_credentials()).await.unwrap();
    let router = crate::app(MemoryService::new(seed.dataset), auth);
    (router, token)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
