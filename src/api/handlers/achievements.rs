use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::achievements::{self, NewAchievement};

pub async fn list_achievements(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match achievements::list(&mut conn) {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_achievement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match achievements::get(&mut conn, id) {
        Ok(Some(achievement)) => Json(achievement).into_response(),
        Ok(None) => {
            (StatusCode::NOT_FOUND, format!("Achievement {} not found", id)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn create_achievement(
    State(state): State<Arc<AppState>>,
    Json(definition): Json<NewAchievement>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match achievements::create(&mut conn, &definition) {
        Ok(achievement) => (StatusCode::CREATED, Json(achievement)).into_response(),
        Err(e) => error_response(e),
    }
}
