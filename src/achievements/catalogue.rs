use anyhow::Result;
use log::info;

use super::{AchievementCriteria, Category, NewAchievement, create};
use crate::database::{self, DbConn};
use crate::scoring::{GameType, SkillTier};

fn achievement(
    name: &str,
    description: &str,
    criteria: AchievementCriteria,
    xp: u32,
    category: Category,
) -> NewAchievement {
    NewAchievement {
        name: name.to_string(),
        description: description.to_string(),
        criteria,
        xp,
        category,
    }
}

fn mastery(game_type: GameType, name: &str) -> NewAchievement {
    achievement(
        name,
        &format!("Reach skill tier 10 in the {} game", game_type),
        AchievementCriteria::SkillTier {
            game_type,
            tier: SkillTier::MAX,
        },
        250,
        Category::Mastery,
    )
}

pub fn default_achievements() -> Vec<NewAchievement> {
    vec![
        achievement(
            "First Lesson",
            "Complete your first lesson",
            AchievementCriteria::LessonsCompleted { count: 1 },
            25,
            Category::Lessons,
        ),
        achievement(
            "Bookworm",
            "Complete 10 lessons",
            AchievementCriteria::LessonsCompleted { count: 10 },
            100,
            Category::Lessons,
        ),
        achievement(
            "Warm Up",
            "Finish your first game",
            AchievementCriteria::GamesPlayed { game_type: None, count: 1 },
            10,
            Category::Games,
        ),
        achievement(
            "Regular",
            "Finish 50 games of any kind",
            AchievementCriteria::GamesPlayed { game_type: None, count: 50 },
            150,
            Category::Games,
        ),
        achievement(
            "Subnet Grinder",
            "Finish 25 subnetting games",
            AchievementCriteria::GamesPlayed {
                game_type: Some(GameType::Subnetting),
                count: 25,
            },
            100,
            Category::Games,
        ),
        achievement(
            "On a Roll",
            "Study 3 days in a row",
            AchievementCriteria::StreakDays { days: 3 },
            30,
            Category::Streaks,
        ),
        achievement(
            "Week Warrior",
            "Study 7 days in a row",
            AchievementCriteria::StreakDays { days: 7 },
            75,
            Category::Streaks,
        ),
        achievement(
            "Packet Pusher",
            "Earn 1000 XP",
            AchievementCriteria::TotalXp { xp: 1000 },
            50,
            Category::Mastery,
        ),
        mastery(GameType::Port, "Port Authority"),
        mastery(GameType::Protocol, "Protocol Droid"),
        mastery(GameType::Subnetting, "Subnet Sage"),
        mastery(GameType::Acronym, "Acronym Ace"),
    ]
}

/// Inserts the default catalogue into an empty table; returns how many were added
pub fn seed_defaults(conn: &mut DbConn) -> Result<usize> {
    if database::achievements::count(conn)? > 0 {
        info!("Achievements already present, skipping seed");
        return Ok(0);
    }

    let defaults = default_achievements();
    for definition in &defaults {
        create(conn, definition)?;
    }
    info!("Seeded {} default achievements", defaults.len());
    Ok(defaults.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup::initialize_pool};

    #[test]
    fn test_defaults_are_valid_and_unique() {
        let defaults = default_achievements();
        for definition in &defaults {
            definition.validate().unwrap();
        }
        let mut names: Vec<&str> = defaults.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), defaults.len());
    }

    #[test]
    fn test_seed_only_once() {
        let pool = create_memory_pool().unwrap();
        initialize_pool(&pool).unwrap();
        let mut conn = get_connection(&pool).unwrap();

        let seeded = seed_defaults(&mut conn).unwrap();
        assert_eq!(seeded, default_achievements().len());
        assert_eq!(seed_defaults(&mut conn).unwrap(), 0);
        assert_eq!(
            database::achievements::count(&mut conn).unwrap() as usize,
            seeded
        );
    }
}
