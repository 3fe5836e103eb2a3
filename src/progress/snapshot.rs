use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::history::GameHistory;
use super::streak::StreakSummary;
use super::xp::LevelProgress;
use crate::scoring::{GameType, SkillTier};

/// Everything achievement criteria and the progress page look at
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub learner: String,
    pub level: LevelProgress,
    pub lessons_completed: u32,
    pub completed_lessons: Vec<String>,
    pub total_games: u32,
    pub games_played: BTreeMap<GameType, u32>,
    pub tiers: BTreeMap<GameType, SkillTier>,
    pub streak: StreakSummary,
    pub unlocked_achievements: BTreeSet<i64>,
}

impl ProgressSnapshot {
    pub fn total_xp(&self) -> u64 {
        self.level.total_xp
    }

    pub fn games_for(&self, game_type: GameType) -> u32 {
        self.games_played.get(&game_type).copied().unwrap_or(0)
    }

    pub fn tier_for(&self, game_type: GameType) -> SkillTier {
        self.tiers.get(&game_type).copied().unwrap_or_default()
    }
}

pub fn games_played_by_type(history: &GameHistory) -> BTreeMap<GameType, u32> {
    GameType::ALL
        .iter()
        .map(|&game_type| (game_type, history.count_for(game_type) as u32))
        .collect()
}
