use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::info;
use workorder_core::work::{CreatedWork, MechanicRechange, MechanicWork, WorkMessage, WorkPayload};
use workorder_service::WorkOrderService;

use super::{to_error, ApiError, AppState};
use crate::auth::AuthToken;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/mechanic-works", post(create_work))
        .route("/api/mechanic-works/{id}", get(get_work).put(update_work))
        .route("/api/mechanic-works/{id}/finish", post(finish_work))
        .route("/api/mechanic-works/{id}/rechanges", get(list_rechanges))
}

async fn get_work(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Json<MechanicWork>, ApiError> {
    state.service.get_mechanic_work(&token, &id).await
        .map(Json)
        .map_err(to_error)
}

async fn create_work(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Json(payload): Json<WorkPayload>,
) -> Result<(StatusCode, Json<CreatedWork>), ApiError> {
    let created = state.service.create_mechanic_work(&token, &payload).await
        .map_err(to_error)?;
    info!("created mechanic work {}", created.work.mechanic_work_id);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_work(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<String>,
    Json(payload): Json<WorkPayload>,
) -> Result<Json<WorkMessage>, ApiError> {
    let message = state.service.update_mechanic_work(&token, &id, &payload).await
        .map_err(to_error)?;
    info!("updated mechanic work {id} with {} rechanges", payload.rechanges.len());
    Ok(Json(message))
}

async fn finish_work(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Json<WorkMessage>, ApiError> {
    let message = state.service.finish_mechanic_work(&token, &id).await
        .map_err(to_error)?;
    info!("finished mechanic work {id}");
    Ok(Json(message))
}

async fn list_rechanges(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MechanicRechange>>, ApiError> {
    state.service.list_mechanic_rechanges(&token, &id).await
        .map(Json)
        .map_err(to_error)
}
