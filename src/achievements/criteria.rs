use serde::{Deserialize, Serialize};

use crate::progress::ProgressSnapshot;
use crate::scoring::{GameType, SkillTier};

/// What a learner must reach to unlock an achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AchievementCriteria {
    LessonsCompleted {
        count: u32,
    },
    /// Any game type when `game_type` is absent
    GamesPlayed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_type: Option<GameType>,
        count: u32,
    },
    SkillTier {
        game_type: GameType,
        tier: SkillTier,
    },
    StreakDays {
        days: u32,
    },
    TotalXp {
        xp: u64,
    },
}

impl AchievementCriteria {
    pub fn is_met(&self, snapshot: &ProgressSnapshot) -> bool {
        match self {
            AchievementCriteria::LessonsCompleted { count } => snapshot.lessons_completed >= *count,
            AchievementCriteria::GamesPlayed { game_type: None, count } => {
                snapshot.total_games >= *count
            }
            AchievementCriteria::GamesPlayed {
                game_type: Some(game_type),
                count,
            } => snapshot.games_for(*game_type) >= *count,
            AchievementCriteria::SkillTier { game_type, tier } => {
                snapshot.tier_for(*game_type) >= *tier
            }
            AchievementCriteria::StreakDays { days } => snapshot.streak.longest >= *days,
            AchievementCriteria::TotalXp { xp } => snapshot.total_xp() >= *xp,
        }
    }

    /// Criteria that can never be met or are trivially met are rejected
    pub fn is_meaningful(&self) -> bool {
        match self {
            AchievementCriteria::LessonsCompleted { count }
            | AchievementCriteria::GamesPlayed { count, .. } => *count > 0,
            AchievementCriteria::SkillTier { tier, .. } => *tier > SkillTier::MIN,
            AchievementCriteria::StreakDays { days } => *days > 0,
            AchievementCriteria::TotalXp { xp } => *xp > 0,
        }
    }
}
