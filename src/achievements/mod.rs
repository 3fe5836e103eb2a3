pub mod catalogue;
pub mod criteria;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::{self, DbAchievement, DbConn};
use crate::errors::AchievementError;
use crate::progress::ProgressSnapshot;

pub use catalogue::{default_achievements, seed_defaults};
pub use criteria::AchievementCriteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lessons,
    Games,
    Streaks,
    Mastery,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lessons => "lessons",
            Category::Games => "games",
            Category::Streaks => "streaks",
            Category::Mastery => "mastery",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AchievementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lessons" => Ok(Category::Lessons),
            "games" => Ok(Category::Games),
            "streaks" => Ok(Category::Streaks),
            "mastery" => Ok(Category::Mastery),
            _ => Err(AchievementError::UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub criteria: AchievementCriteria,
    pub xp: u32,
    pub category: Category,
}

impl TryFrom<DbAchievement> for Achievement {
    type Error = anyhow::Error;

    fn try_from(row: DbAchievement) -> Result<Self> {
        let criteria = serde_json::from_str(&row.criteria)
            .with_context(|| format!("Failed to parse criteria of achievement {}", row.id))?;
        let category = row.category.parse()?;
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            criteria,
            xp: row.xp,
            category,
        })
    }
}

/// An achievement definition before it has an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    pub name: String,
    pub description: String,
    pub criteria: AchievementCriteria,
    pub xp: u32,
    pub category: Category,
}

impl NewAchievement {
    pub fn validate(&self) -> Result<(), AchievementError> {
        if self.name.trim().is_empty() {
            return Err(AchievementError::InvalidDefinition("name must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AchievementError::InvalidDefinition(
                "description must not be empty".into(),
            ));
        }
        if !self.criteria.is_meaningful() {
            return Err(AchievementError::InvalidDefinition(format!(
                "criteria for {:?} can never be meaningfully met",
                self.name
            )));
        }
        Ok(())
    }
}

pub fn create(conn: &mut DbConn, achievement: &NewAchievement) -> Result<Achievement> {
    achievement.validate()?;
    if database::achievements::find_by_name(conn, achievement.name.trim())?.is_some() {
        return Err(AchievementError::InvalidDefinition(format!(
            "an achievement named {:?} already exists",
            achievement.name.trim()
        ))
        .into());
    }

    let criteria = serde_json::to_string(&achievement.criteria)?;
    let row = database::achievements::insert_achievement(
        conn,
        achievement.name.trim(),
        achievement.description.trim(),
        &criteria,
        achievement.xp,
        achievement.category.as_str(),
    )?;
    log::info!("Created achievement {} ({})", row.name, row.id);
    Achievement::try_from(row)
}

pub fn list(conn: &mut DbConn) -> Result<Vec<Achievement>> {
    database::achievements::list_all(conn)?
        .into_iter()
        .map(Achievement::try_from)
        .collect()
}

pub fn get(conn: &mut DbConn, id: i64) -> Result<Option<Achievement>> {
    database::achievements::get_by_id(conn, id)?
        .map(Achievement::try_from)
        .transpose()
}

/// Achievements whose criteria the snapshot meets, locked or not
pub fn evaluate<'a>(
    achievements: &'a [Achievement],
    snapshot: &ProgressSnapshot,
) -> Vec<&'a Achievement> {
    achievements
        .iter()
        .filter(|achievement| achievement.criteria.is_met(snapshot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup::initialize_pool};
    use crate::scoring::GameType;

    fn conn() -> DbConn {
        let pool = create_memory_pool().unwrap();
        initialize_pool(&pool).unwrap();
        get_connection(&pool).unwrap()
    }

    fn first_steps() -> NewAchievement {
        NewAchievement {
            name: "First Steps".to_string(),
            description: "Play your first port game".to_string(),
            criteria: AchievementCriteria::GamesPlayed {
                game_type: Some(GameType::Port),
                count: 1,
            },
            xp: 25,
            category: Category::Games,
        }
    }

    #[test]
    fn test_create_and_read_back() {
        let mut conn = conn();
        let created = create(&mut conn, &first_steps()).unwrap();
        assert_eq!(created.name, "First Steps");
        assert_eq!(created.category, Category::Games);

        let fetched = get(&mut conn, created.id).unwrap();
        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(list(&mut conn).unwrap(), vec![created]);
        assert_eq!(get(&mut conn, 999).unwrap(), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut conn = conn();
        create(&mut conn, &first_steps()).unwrap();
        let err = create(&mut conn, &first_steps()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AchievementError>(),
            Some(AchievementError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let mut conn = conn();
        let mut blank = first_steps();
        blank.name = "  ".to_string();
        assert!(create(&mut conn, &blank).is_err());
        assert_eq!(database::achievements::count(&mut conn).unwrap(), 0);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("mastery".parse::<Category>(), Ok(Category::Mastery));
        assert!("misc".parse::<Category>().is_err());
    }
}
