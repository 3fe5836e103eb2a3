use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::api::models::ErrorResponse;
use crate::database::DbPool;
use crate::errors::is_client_error;
use crate::services::progress::ProgressService;

pub mod achievements;
pub mod difficulty;
pub mod learners;

pub struct AppState {
    pub pool: DbPool,
    pub progress: ProgressService,
}

#[derive(Deserialize)]
pub struct TierParams {
    pub tier: Option<i64>,
}

#[derive(Deserialize)]
pub struct HeatmapParams {
    pub days: Option<u32>,
}

/// Caller mistakes become 400, everything else 500
pub fn error_response(error: anyhow::Error) -> Response {
    let status = if is_client_error(&error) {
        StatusCode::BAD_REQUEST
    } else {
        log::error!("Request failed: {:?}", error);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse { error: format!("{:#}", error) })).into_response()
}
