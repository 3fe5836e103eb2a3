use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::achievements::{self, Achievement};
use crate::config::settings::AppConfig;
use crate::database::{self, DbPool};
use crate::progress::lessons::LessonLog;
use crate::progress::store::{encode_json, load_json};
use crate::progress::{
    GameHistory, HeatmapCell, LevelProgress, ProgressKey, ProgressSnapshot, ProgressStore,
    StreakSummary, lessons, snapshot, streak, xp,
};
use crate::scoring::{
    DifficultyConfig, DifficultyTables, GameResult, GameType, SkillEstimator, SkillTier,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPlan {
    pub game_type: GameType,
    pub tier: SkillTier,
    pub config: DifficultyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub game_type: GameType,
    pub score: f64,
    pub tier: SkillTier,
    pub xp_gained: u64,
    pub level: LevelProgress,
    pub unlocked: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutcome {
    pub lesson_id: String,
    pub newly_completed: bool,
    pub xp_gained: u64,
    pub level: LevelProgress,
    pub unlocked: Vec<Achievement>,
}

/// A learner's stored progress, changed in memory and written back in one batch
#[derive(Debug, Default)]
struct LearnerProgress {
    history: GameHistory,
    lessons: LessonLog,
    total_xp: u64,
    unlocked: BTreeSet<i64>,
}

impl LearnerProgress {
    fn load(store: &dyn ProgressStore, learner: &str) -> Result<Self> {
        Ok(Self {
            history: GameHistory::load(store, learner)?,
            lessons: lessons::completed_lessons(store, learner)?,
            total_xp: xp::load_xp(store, learner)?,
            unlocked: load_json(store, learner, ProgressKey::UnlockedAchievements)?,
        })
    }

    fn save(&self, store: &dyn ProgressStore, learner: &str) -> Result<()> {
        let entries = [
            entry(learner, ProgressKey::GameHistory, &self.history)?,
            entry(learner, ProgressKey::CompletedLessons, &self.lessons)?,
            entry(learner, ProgressKey::Xp, &self.total_xp)?,
            entry(learner, ProgressKey::UnlockedAchievements, &self.unlocked)?,
        ];
        store.set_many(learner, &entries)
    }

    fn add_xp(&mut self, amount: u64) {
        self.total_xp = self.total_xp.saturating_add(amount);
    }

    fn activity_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.history
            .activity_dates()
            .chain(lessons::activity_dates(&self.lessons))
    }
}

fn entry<T: Serialize>(
    learner: &str,
    key: ProgressKey,
    value: &T,
) -> Result<(&'static str, String)> {
    Ok((key.as_str(), encode_json(learner, key, value)?))
}

/// Learner-facing operations over the progress store and the scoring core
pub struct ProgressService {
    pool: DbPool,
    store: Arc<dyn ProgressStore>,
    config: AppConfig,
    estimator: SkillEstimator,
    tables: DifficultyTables,
    write_lock: Mutex<()>,
}

impl ProgressService {
    pub fn new(pool: DbPool, store: Arc<dyn ProgressStore>, config: AppConfig) -> Result<Self> {
        Ok(Self {
            pool,
            store,
            estimator: SkillEstimator::new(&config.scoring),
            tables: DifficultyTables::standard()?,
            config,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn resolve(&self, game_type: GameType, tier: SkillTier) -> Result<DifficultyConfig> {
        self.tables.resolve(game_type, tier)
    }

    /// Tier estimated from stored history and the round parameters it unlocks
    pub fn round_plan(&self, learner: &str, game_type: GameType) -> Result<RoundPlan> {
        let history = GameHistory::load(self.store.as_ref(), learner)?;
        let tier = self.estimator.estimate(history.results(), game_type)?;
        let config = self.resolve(game_type, tier)?;
        debug!("Round plan for {} in {}: tier {}", learner, game_type, tier);
        Ok(RoundPlan {
            game_type,
            tier,
            config,
        })
    }

    /// Nothing is written unless the game, its XP and any unlocks are all computed
    pub fn record_game(
        &self,
        learner: &str,
        game_type: GameType,
        score: f64,
        played_at: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let _guard = self.lock_writes();
        let result = GameResult::new(game_type, score, played_at);
        let game_xp = xp::xp_for_game(&result);

        let catalogue = self.load_achievements()?;
        let mut progress = LearnerProgress::load(self.store.as_ref(), learner)?;
        progress.history.push(result)?;
        progress.add_xp(game_xp);
        let (unlocked, bonus_xp) =
            self.unlock_achievements(learner, &catalogue, &mut progress, played_at.date_naive())?;
        let tier = self.estimator.estimate(progress.history.results(), game_type)?;

        progress.save(self.store.as_ref(), learner)?;
        let level = self.level(progress.total_xp);
        info!(
            "{} finished a {} game: score {}, tier {}, level {}",
            learner, game_type, score, tier, level.level
        );

        Ok(RecordOutcome {
            game_type,
            score,
            tier,
            xp_gained: game_xp.saturating_add(bonus_xp),
            level,
            unlocked,
        })
    }

    pub fn complete_lesson(
        &self,
        learner: &str,
        lesson_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<LessonOutcome> {
        let _guard = self.lock_writes();
        let catalogue = self.load_achievements()?;
        let mut progress = LearnerProgress::load(self.store.as_ref(), learner)?;
        let newly_completed =
            lessons::insert_lesson(&mut progress.lessons, lesson_id, completed_at)?;

        let mut xp_gained = 0;
        let mut unlocked = Vec::new();
        if newly_completed {
            let lesson_xp = self.config.progress.xp_per_lesson;
            progress.add_xp(lesson_xp);
            let (newly, bonus_xp) = self.unlock_achievements(
                learner,
                &catalogue,
                &mut progress,
                completed_at.date_naive(),
            )?;
            progress.save(self.store.as_ref(), learner)?;
            info!("{} completed lesson {}", learner, lesson_id.trim());
            xp_gained = lesson_xp.saturating_add(bonus_xp);
            unlocked = newly;
        }

        Ok(LessonOutcome {
            lesson_id: lesson_id.trim().to_string(),
            newly_completed,
            xp_gained,
            level: self.level(progress.total_xp),
            unlocked,
        })
    }

    pub fn snapshot(&self, learner: &str, today: NaiveDate) -> Result<ProgressSnapshot> {
        let progress = LearnerProgress::load(self.store.as_ref(), learner)?;
        self.build_snapshot(learner, &progress, today)
    }

    /// `days` falls back to the configured default and is capped at the configured maximum
    pub fn heatmap(
        &self,
        learner: &str,
        today: NaiveDate,
        days: Option<u32>,
    ) -> Result<Vec<HeatmapCell>> {
        let settings = &self.config.progress;
        let days = days
            .unwrap_or(settings.heatmap_days)
            .clamp(1, settings.max_heatmap_days);

        let progress = LearnerProgress::load(self.store.as_ref(), learner)?;
        Ok(streak::heatmap(progress.activity_dates(), today, days))
    }

    pub fn unlocked_achievements(&self, learner: &str) -> Result<Vec<Achievement>> {
        let unlocked: BTreeSet<i64> =
            load_json(self.store.as_ref(), learner, ProgressKey::UnlockedAchievements)?;
        Ok(self
            .load_achievements()?
            .into_iter()
            .filter(|achievement| unlocked.contains(&achievement.id))
            .collect())
    }

    fn build_snapshot(
        &self,
        learner: &str,
        progress: &LearnerProgress,
        today: NaiveDate,
    ) -> Result<ProgressSnapshot> {
        let tiers = GameType::ALL
            .iter()
            .map(|&game_type| {
                let tier = self.estimator.estimate(progress.history.results(), game_type)?;
                Ok::<_, anyhow::Error>((game_type, tier))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(ProgressSnapshot {
            learner: learner.to_string(),
            level: self.level(progress.total_xp),
            lessons_completed: progress.lessons.len() as u32,
            completed_lessons: progress.lessons.keys().cloned().collect(),
            total_games: progress.history.len() as u32,
            games_played: snapshot::games_played_by_type(&progress.history),
            tiers,
            streak: StreakSummary::from_dates(progress.activity_dates(), today),
            unlocked_achievements: progress.unlocked.clone(),
        })
    }

    /// Unlocking can award enough XP to meet further XP criteria, so repeat until stable
    fn unlock_achievements(
        &self,
        learner: &str,
        catalogue: &[Achievement],
        progress: &mut LearnerProgress,
        today: NaiveDate,
    ) -> Result<(Vec<Achievement>, u64)> {
        let mut unlocked_now = Vec::new();
        let mut bonus_xp: u64 = 0;

        loop {
            let snapshot = self.build_snapshot(learner, progress, today)?;
            let newly: Vec<&Achievement> = achievements::evaluate(catalogue, &snapshot)
                .into_iter()
                .filter(|achievement| !progress.unlocked.contains(&achievement.id))
                .collect();
            if newly.is_empty() {
                break;
            }

            let mut round_xp: u64 = 0;
            for achievement in newly {
                info!("{} unlocked achievement {:?}", learner, achievement.name);
                progress.unlocked.insert(achievement.id);
                round_xp = round_xp.saturating_add(u64::from(achievement.xp));
                unlocked_now.push(achievement.clone());
            }
            progress.add_xp(round_xp);
            bonus_xp = bonus_xp.saturating_add(round_xp);
        }

        Ok((unlocked_now, bonus_xp))
    }

    fn load_achievements(&self) -> Result<Vec<Achievement>> {
        let mut conn = database::get_connection(&self.pool)?;
        achievements::list(&mut conn)
    }

    fn level(&self, total_xp: u64) -> LevelProgress {
        LevelProgress::from_xp(total_xp, self.config.progress.xp_level_base)
    }

    /// The guarded state lives in the store, so a panicked writer leaves nothing to repair
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementCriteria, Category, NewAchievement};
    use crate::database::{create_memory_pool, get_connection, setup::initialize_pool};
    use crate::errors::ScoringError;
    use crate::progress::{MemoryProgressStore, SqliteProgressStore};
    use chrono::TimeZone;

    fn service_with(definitions: &[NewAchievement]) -> ProgressService {
        let pool = create_memory_pool().unwrap();
        initialize_pool(&pool).unwrap();
        {
            let mut conn = get_connection(&pool).unwrap();
            for definition in definitions {
                achievements::create(&mut conn, definition).unwrap();
            }
        }
        ProgressService::new(pool, Arc::new(MemoryProgressStore::new()), AppConfig::default())
            .unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, day, 20, 0, 0).unwrap()
    }

    fn definition(name: &str, criteria: AchievementCriteria, xp: u32) -> NewAchievement {
        NewAchievement {
            name: name.to_string(),
            description: format!("{} description", name),
            criteria,
            xp,
            category: Category::Games,
        }
    }

    #[test]
    fn test_new_learner_gets_baseline_round() {
        let service = service_with(&[]);
        let plan = service.round_plan("alice", GameType::Port).unwrap();
        assert_eq!(plan.tier, SkillTier::MIN);
        assert_eq!(plan.config.time_limit(), Some(60));
    }

    #[test]
    fn test_recorded_games_raise_tier() {
        let service = service_with(&[]);
        for i in 0..10 {
            service.record_game("alice", GameType::Port, 10.0, at(1 + i)).unwrap();
        }
        let plan = service.round_plan("alice", GameType::Port).unwrap();
        assert_eq!(plan.tier.value(), 4);
        assert_eq!(plan.config.count("port_count"), Some(6));

        // other game types are unaffected
        let other = service.round_plan("alice", GameType::Acronym).unwrap();
        assert_eq!(other.tier, SkillTier::MIN);
        assert_eq!(service.round_plan("bob", GameType::Port).unwrap().tier, SkillTier::MIN);
    }

    #[test]
    fn test_record_game_awards_xp_and_unlocks_once() {
        let service = service_with(&[definition(
            "Warm Up",
            AchievementCriteria::GamesPlayed { game_type: None, count: 1 },
            10,
        )]);

        let first = service.record_game("alice", GameType::Protocol, 42.7, at(1)).unwrap();
        assert_eq!(first.xp_gained, 52);
        assert_eq!(first.unlocked.len(), 1);
        assert_eq!(first.level.total_xp, 52);

        let second = service.record_game("alice", GameType::Protocol, 5.0, at(2)).unwrap();
        assert_eq!(second.xp_gained, 5);
        assert!(second.unlocked.is_empty());
        assert_eq!(service.unlocked_achievements("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_xp_achievements_chain() {
        let service = service_with(&[
            definition("Hundred", AchievementCriteria::TotalXp { xp: 100 }, 100),
            definition("Two Hundred", AchievementCriteria::TotalXp { xp: 200 }, 5),
        ]);
        let outcome = service.record_game("alice", GameType::Port, 100.0, at(1)).unwrap();
        assert_eq!(outcome.unlocked.len(), 2);
        assert_eq!(outcome.level.total_xp, 205);
    }

    #[test]
    fn test_invalid_score_is_client_error() {
        let service = service_with(&[]);
        let err = service.record_game("alice", GameType::Port, -3.0, at(1)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoringError>(),
            Some(ScoringError::InvalidScore { .. })
        ));
        assert_eq!(service.snapshot("alice", at(1).date_naive()).unwrap().total_games, 0);
    }

    #[test]
    fn test_lessons_and_streaks_in_snapshot() {
        let service = service_with(&[definition(
            "On a Roll",
            AchievementCriteria::StreakDays { days: 3 },
            30,
        )]);

        let first = service.complete_lesson("alice", "osi-model", at(1)).unwrap();
        assert!(first.newly_completed);
        assert_eq!(first.xp_gained, 50);

        let repeat = service.complete_lesson("alice", "osi-model", at(2)).unwrap();
        assert!(!repeat.newly_completed);
        assert_eq!(repeat.xp_gained, 0);

        service.record_game("alice", GameType::Subnetting, 3.0, at(2)).unwrap();
        let third = service.complete_lesson("alice", "vlans", at(3)).unwrap();
        assert_eq!(third.unlocked.len(), 1);

        let snapshot = service.snapshot("alice", at(3).date_naive()).unwrap();
        assert_eq!(snapshot.lessons_completed, 2);
        assert_eq!(snapshot.total_games, 1);
        assert_eq!(snapshot.games_for(GameType::Subnetting), 1);
        assert_eq!(snapshot.streak.current, 3);
        assert_eq!(snapshot.streak.longest, 3);
        assert_eq!(snapshot.total_xp(), 50 + 3 + 50 + 30);
    }

    #[test]
    fn test_heatmap_window_is_clamped() {
        let service = service_with(&[]);
        service.record_game("alice", GameType::Port, 1.0, at(5)).unwrap();
        let today = at(5).date_naive();

        let cells = service.heatmap("alice", today, None).unwrap();
        assert_eq!(cells.len(), 84);
        assert_eq!(cells.last().map(|c| c.count), Some(1));

        assert_eq!(service.heatmap("alice", today, Some(10_000)).unwrap().len(), 366);
        assert_eq!(service.heatmap("alice", today, Some(0)).unwrap().len(), 1);
    }

    #[test]
    fn test_huge_score_saturates_xp() {
        let service = service_with(&[definition(
            "Warm Up",
            AchievementCriteria::GamesPlayed { game_type: None, count: 1 },
            10,
        )]);

        let outcome = service.record_game("alice", GameType::Port, 1e20, at(1)).unwrap();
        assert_eq!(outcome.xp_gained, u64::MAX);
        assert_eq!(outcome.level.total_xp, u64::MAX);
        assert_eq!(outcome.tier, SkillTier::MAX);
        assert_eq!(outcome.unlocked.len(), 1);

        let next = service.record_game("bob", GameType::Port, 5.0, at(1)).unwrap();
        assert_eq!(next.xp_gained, 15);
    }

    #[test]
    fn test_writes_continue_after_a_panicked_writer() {
        let service = service_with(&[]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = service.lock_writes();
            panic!("writer failed");
        }));
        assert!(result.is_err());

        service.record_game("bob", GameType::Port, 5.0, at(1)).unwrap();
        service.complete_lesson("bob", "osi-model", at(1)).unwrap();
        assert_eq!(service.snapshot("bob", at(1).date_naive()).unwrap().total_games, 1);
    }

    #[test]
    fn test_failed_unlock_records_nothing() {
        let service = service_with(&[]);
        {
            let mut conn = get_connection(&service.pool).unwrap();
            database::achievements::insert_achievement(
                &mut conn,
                "Broken",
                "Broken criteria",
                "not json",
                5,
                "games",
            )
            .unwrap();
        }

        assert!(service.record_game("alice", GameType::Port, 7.0, at(1)).is_err());
        assert!(service.complete_lesson("alice", "osi-model", at(1)).is_err());

        let snapshot = service.snapshot("alice", at(1).date_naive()).unwrap();
        assert_eq!(snapshot.total_games, 0);
        assert_eq!(snapshot.lessons_completed, 0);
        assert_eq!(snapshot.total_xp(), 0);
    }

    #[test]
    fn test_sqlite_store_keeps_progress() {
        let pool = create_memory_pool().unwrap();
        initialize_pool(&pool).unwrap();
        let store = Arc::new(SqliteProgressStore::new(pool.clone()));
        let service = ProgressService::new(pool, store, AppConfig::default()).unwrap();

        service.record_game("alice", GameType::Acronym, 12.0, at(1)).unwrap();
        service.complete_lesson("alice", "dns", at(2)).unwrap();

        let snapshot = service.snapshot("alice", at(2).date_naive()).unwrap();
        assert_eq!(snapshot.total_games, 1);
        assert_eq!(snapshot.completed_lessons, vec!["dns".to_string()]);
        assert_eq!(snapshot.total_xp(), 62);
    }
}
