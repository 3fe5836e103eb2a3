use serde::{Deserialize, Serialize};

use crate::progress::HeatmapCell;
use crate::scoring::{DifficultyConfig, GameType, SkillTier};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyResponse {
    pub game_type: GameType,
    pub tier: SkillTier,
    pub config: DifficultyConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordGameRequest {
    pub game_type: String,
    pub score: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResponse {
    pub learner: String,
    pub days: usize,
    pub cells: Vec<HeatmapCell>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}
