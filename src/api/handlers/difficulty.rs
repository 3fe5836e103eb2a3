use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, TierParams, error_response};
use crate::api::models::DifficultyResponse;
use crate::scoring::{GameType, SkillTier};

/// Round parameters for an explicit tier, defaulting to tier 1
pub async fn get_difficulty(
    State(state): State<Arc<AppState>>,
    Path(game_type): Path<String>,
    Query(params): Query<TierParams>,
) -> impl IntoResponse {
    let game_type = match game_type.parse::<GameType>() {
        Ok(game_type) => game_type,
        Err(e) => return error_response(e.into()),
    };
    let tier = match params.tier.map(SkillTier::new).transpose() {
        Ok(tier) => tier.unwrap_or_default(),
        Err(e) => return error_response(e.into()),
    };

    match state.progress.resolve(game_type, tier) {
        Ok(config) => Json(DifficultyResponse {
            game_type,
            tier,
            config,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Tier estimated from the learner's history plus the matching round parameters
pub async fn get_learner_difficulty(
    State(state): State<Arc<AppState>>,
    Path((learner, game_type)): Path<(String, String)>,
) -> impl IntoResponse {
    let game_type = match game_type.parse::<GameType>() {
        Ok(game_type) => game_type,
        Err(e) => return error_response(e.into()),
    };

    match state.progress.round_plan(&learner, game_type) {
        Ok(plan) => Json(DifficultyResponse {
            game_type: plan.game_type,
            tier: plan.tier,
            config: plan.config,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
