use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use super::{AppState, HeatmapParams, error_response};
use crate::api::models::{HeatmapResponse, RecordGameRequest};
use crate::scoring::GameType;

pub async fn record_game(
    State(state): State<Arc<AppState>>,
    Path(learner): Path<String>,
    Json(request): Json<RecordGameRequest>,
) -> impl IntoResponse {
    let game_type = match request.game_type.parse::<GameType>() {
        Ok(game_type) => game_type,
        Err(e) => return error_response(e.into()),
    };

    match state
        .progress
        .record_game(&learner, game_type, request.score, Utc::now())
    {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    Path((learner, lesson_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.progress.complete_lesson(&learner, &lesson_id, Utc::now()) {
        Ok(outcome) if outcome.newly_completed => {
            (StatusCode::CREATED, Json(outcome)).into_response()
        }
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(learner): Path<String>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    match state.progress.snapshot(&learner, today) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_heatmap(
    State(state): State<Arc<AppState>>,
    Path(learner): Path<String>,
    Query(params): Query<HeatmapParams>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    match state.progress.heatmap(&learner, today, params.days) {
        Ok(cells) => Json(HeatmapResponse {
            learner,
            days: cells.len(),
            cells,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_learner_achievements(
    State(state): State<Arc<AppState>>,
    Path(learner): Path<String>,
) -> impl IntoResponse {
    match state.progress.unlocked_achievements(&learner) {
        Ok(achievements) => Json(achievements).into_response(),
        Err(e) => error_response(e),
    }
}
