pub mod auth;
mod routes;
pub mod seed;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use workorder_service::MemoryService;

use auth::AuthConfig;
use routes::InnerAppState;

/// Build the full application router over an in-memory service.
pub fn app(service: MemoryService, auth: AuthConfig) -> Router {
    routes::build_router(Arc::new(InnerAppState {
        service,
        auth: Arc::new(auth),
    }))
}

pub async fn serve(listener: TcpListener, service: MemoryService, auth: AuthConfig) -> Result<()> {
    axum::serve(listener, app(service, auth)).await?;
    Ok(())
}
