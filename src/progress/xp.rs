use anyhow::Result;
use serde::Serialize;

use super::store::{ProgressKey, ProgressStore, load_json, save_json};
use crate::scoring::GameResult;

/// XP earned by a finished round: the score rounded down
pub fn xp_for_game(result: &GameResult) -> u64 {
    if result.score.is_finite() && result.score > 0.0 {
        result.score.floor() as u64
    } else {
        0
    }
}

/// formula: level = floor(sqrt(xp / base)) + 1
pub fn level_for_xp(total_xp: u64, level_base: u64) -> u32 {
    let steps = total_xp / level_base.max(1);
    steps.isqrt() as u32 + 1
}

/// Total XP needed to reach `level`
pub fn xp_for_level(level: u32, level_base: u64) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    level_base.max(1).saturating_mul(steps.saturating_mul(steps))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub total_xp: u64,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    pub fraction: f64,
}

impl LevelProgress {
    pub fn from_xp(total_xp: u64, level_base: u64) -> Self {
        let level = level_for_xp(total_xp, level_base);
        let current_level_xp = xp_for_level(level, level_base);
        let next_level_xp = xp_for_level(level + 1, level_base);
        let span = next_level_xp.saturating_sub(current_level_xp);
        let fraction = if span == 0 {
            0.0
        } else {
            (total_xp - current_level_xp) as f64 / span as f64
        };

        Self {
            level,
            total_xp,
            current_level_xp,
            next_level_xp,
            fraction,
        }
    }
}

pub fn load_xp(store: &dyn ProgressStore, namespace: &str) -> Result<u64> {
    load_json(store, namespace, ProgressKey::Xp)
}

/// Returns the new total
pub fn add_xp(store: &dyn ProgressStore, namespace: &str, amount: u64) -> Result<u64> {
    let total = load_xp(store, namespace)?.saturating_add(amount);
    if amount > 0 {
        save_json(store, namespace, ProgressKey::Xp, &total)?;
    }
    Ok(total)
}
