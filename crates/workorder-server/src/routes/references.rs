use axum::{extract::State, routing::get, Extension, Json, Router};
use workorder_core::reference::{Client, Machine, Part};
use workorder_service::WorkOrderService;

use super::{to_error, ApiError, AppState};
use crate::auth::AuthToken;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/clients", get(list_clients))
        .route("/api/machines", get(list_machines))
        .route("/api/rechanges", get(list_parts))
}

async fn list_clients(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
) -> Result<Json<Vec<Client>>, ApiError> {
    state.service.list_clients(&token).await
        .map(Json)
        .map_err(to_error)
}

async fn list_machines(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
) -> Result<Json<Vec<Machine>>, ApiError> {
    state.service.list_machines(&token).await
        .map(Json)
        .map_err(to_error)
}

async fn list_parts(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
) -> Result<Json<Vec<Part>>, ApiError> {
    state.service.list_parts(&token).await
        .map(Json)
        .map_err(to_error)
}
