use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use tracing::{info, warn};
use workorder_core::session::{Credentials, Session};

use super::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, ApiError> {
    match state.auth.login(&credentials).await {
        Some(session) => {
            info!("{} logged in", session.email);
            Ok(Json(session))
        }
        None => {
            warn!("failed login for {}", credentials.email);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid email or password" })),
            ))
        }
    }
}
