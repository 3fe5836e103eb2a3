use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::store::{ProgressKey, ProgressStore, load_json, save_json};
use crate::errors::ScoringError;
use crate::scoring::{GameResult, GameType};

/// Append-only log of a learner's finished rounds, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHistory {
    results: Vec<GameResult>,
}

impl GameHistory {
    pub fn load(store: &dyn ProgressStore, namespace: &str) -> Result<Self> {
        load_json(store, namespace, ProgressKey::GameHistory)
    }

    /// Validates the score, appends it and persists the log
    pub fn record(store: &dyn ProgressStore, namespace: &str, result: GameResult) -> Result<Self> {
        let mut history = Self::load(store, namespace)?;
        history.push(result)?;
        save_json(store, namespace, ProgressKey::GameHistory, &history)?;
        Ok(history)
    }

    /// In-memory append; nothing is persisted
    pub fn push(&mut self, result: GameResult) -> Result<(), ScoringError> {
        result.validate()?;
        self.results.push(result);
        Ok(())
    }

    pub fn results(&self) -> &[GameResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn count_for(&self, game_type: GameType) -> usize {
        self.results
            .iter()
            .filter(|result| result.game_type == game_type)
            .count()
    }

    pub fn activity_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.results.iter().map(|result| result.played_at.date_naive())
    }
}
