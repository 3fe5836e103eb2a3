use log::debug;

use super::types::{GameResult, GameType, SkillTier};
use crate::config::settings::ScoringSettings;
use crate::errors::ScoringError;

/// Reduces recent results of one game type to a skill tier
#[derive(Debug, Clone)]
pub struct SkillEstimator {
    window: usize,
    score_scale: f64,
    log_base: f64,
}

impl SkillEstimator {
    pub fn new(settings: &ScoringSettings) -> Self {
        Self {
            window: settings.recency_window,
            score_scale: settings.score_scale,
            log_base: settings.log_base,
        }
    }

    pub fn estimate(
        &self,
        history: &[GameResult],
        game_type: GameType,
    ) -> Result<SkillTier, ScoringError> {
        let window = recent_window(history, game_type, self.window);
        if window.is_empty() {
            return Ok(SkillTier::MIN);
        }

        validate_window(&window)?;
        let mean = mean_score(&window);
        let tier = self.tier_for_mean(mean);
        debug!(
            "{}: {} recent results, mean {:.2} -> tier {}",
            game_type,
            window.len(),
            mean,
            tier
        );
        Ok(tier)
    }

    pub fn tier_for_mean(&self, mean: f64) -> SkillTier {
        // formula: tier = ceil(ln(mean × scale + 1) / ln(base))
        let compressed = (mean * self.score_scale + 1.0).ln() / self.log_base.ln();
        SkillTier::clamped(compressed.ceil())
    }
}

impl Default for SkillEstimator {
    fn default() -> Self {
        Self::new(&ScoringSettings::default())
    }
}

pub fn estimate_skill(
    history: &[GameResult],
    game_type: GameType,
) -> Result<SkillTier, ScoringError> {
    SkillEstimator::default().estimate(history, game_type)
}

/// Last `size` entries of `game_type`, oldest first
fn recent_window(history: &[GameResult], game_type: GameType, size: usize) -> Vec<&GameResult> {
    let mut window: Vec<&GameResult> = history
        .iter()
        .rev()
        .filter(|result| result.game_type == game_type)
        .take(size)
        .collect();
    window.reverse();
    window
}

fn validate_window(window: &[&GameResult]) -> Result<(), ScoringError> {
    window.iter().try_for_each(|result| result.validate())
}

fn mean_score(window: &[&GameResult]) -> f64 {
    let total: f64 = window.iter().map(|result| result.score).sum();
    total / window.len() as f64
}
