use std::collections::BTreeMap;
use std::sync::OnceLock;

use anyhow::{Result, bail};

use super::tables;
use super::types::{DifficultyConfig, GameType, OptionValue, SkillTier};

/// Overrides that apply once a learner reaches `min_tier`
#[derive(Debug, Clone)]
pub struct Threshold {
    pub min_tier: u8,
    pub overrides: Vec<(&'static str, OptionValue)>,
}

/// Baseline round parameters plus cumulative tier overrides for one game type
#[derive(Debug, Clone)]
pub struct DifficultyTable {
    game_type: GameType,
    baseline: Vec<(&'static str, OptionValue)>,
    thresholds: Vec<Threshold>,
}

impl DifficultyTable {
    pub fn new(game_type: GameType, baseline: &[(&'static str, OptionValue)]) -> Self {
        Self {
            game_type,
            baseline: baseline.to_vec(),
            thresholds: Vec::new(),
        }
    }

    pub fn threshold(mut self, min_tier: u8, overrides: &[(&'static str, OptionValue)]) -> Self {
        self.thresholds.push(Threshold {
            min_tier,
            overrides: overrides.to_vec(),
        });
        self
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    pub fn baseline(&self) -> DifficultyConfig {
        let mut config = DifficultyConfig::new();
        apply_overrides(&mut config, &self.baseline);
        config
    }

    /// Baseline with every reached threshold layered on in ascending order
    pub fn resolve(&self, tier: SkillTier) -> DifficultyConfig {
        let mut config = self.baseline();
        for threshold in self.reached_thresholds(tier) {
            apply_overrides(&mut config, &threshold.overrides);
        }
        config
    }

    fn reached_thresholds(&self, tier: SkillTier) -> impl Iterator<Item = &Threshold> {
        self.thresholds
            .iter()
            .filter(move |threshold| threshold.min_tier <= tier.value())
    }

    /// Checks ordering, field shapes and that every change makes rounds harder
    pub fn validate(&self) -> Result<()> {
        self.validate_baseline()?;

        let mut running = self.baseline();
        let mut previous_tier = SkillTier::MIN.value();
        for threshold in &self.thresholds {
            if threshold.min_tier <= previous_tier || threshold.min_tier > SkillTier::MAX.value() {
                bail!(
                    "{}: threshold tier {} is out of order or range",
                    self.game_type,
                    threshold.min_tier
                );
            }
            for (name, next) in &threshold.overrides {
                let Some(current) = running.get(name) else {
                    bail!(
                        "{}: tier {} overrides unknown field {}",
                        self.game_type,
                        threshold.min_tier,
                        name
                    );
                };
                check_value(self.game_type, name, next)?;
                match is_harder_or_equal(&current, next) {
                    Some(true) => {}
                    Some(false) => bail!(
                        "{}: field {} gets easier at tier {} ({} -> {})",
                        self.game_type,
                        name,
                        threshold.min_tier,
                        current,
                        next
                    ),
                    None => bail!(
                        "{}: field {} changes from {} to {} at tier {}",
                        self.game_type,
                        name,
                        current.kind(),
                        next.kind(),
                        threshold.min_tier
                    ),
                }
                running.set(name, *next);
            }
            previous_tier = threshold.min_tier;
        }
        Ok(())
    }

    fn validate_baseline(&self) -> Result<()> {
        if self.baseline.is_empty() {
            bail!("{}: baseline has no fields", self.game_type);
        }
        for (name, value) in &self.baseline {
            check_value(self.game_type, name, value)?;
        }
        Ok(())
    }
}

fn apply_overrides(config: &mut DifficultyConfig, overrides: &[(&'static str, OptionValue)]) {
    for (name, value) in overrides {
        config.set(name, *value);
    }
}

fn check_value(game_type: GameType, name: &str, value: &OptionValue) -> Result<()> {
    match value {
        OptionValue::Seconds(0) | OptionValue::Count(0) => {
            bail!("{}: field {} must be positive", game_type, name)
        }
        OptionValue::Probability(p) if !(0.0..=1.0).contains(p) => {
            bail!("{}: field {} is not a probability: {}", game_type, name, p)
        }
        _ => Ok(()),
    }
}

/// `None` when the two values have different shapes
fn is_harder_or_equal(current: &OptionValue, next: &OptionValue) -> Option<bool> {
    match (current, next) {
        (OptionValue::Seconds(a), OptionValue::Seconds(b)) => Some(b <= a),
        (OptionValue::Count(a), OptionValue::Count(b)) => Some(b >= a),
        (OptionValue::Probability(a), OptionValue::Probability(b)) => Some(b >= a),
        (OptionValue::Toggle(a), OptionValue::Toggle(b)) => Some(!(*a && !*b)),
        _ => None,
    }
}

/// Difficulty tables keyed by game type
#[derive(Debug, Clone)]
pub struct DifficultyTables {
    tables: BTreeMap<GameType, DifficultyTable>,
}

impl DifficultyTables {
    pub fn new(tables: Vec<DifficultyTable>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|table| (table.game_type(), table))
                .collect(),
        }
    }

    /// The built-in tables, validated and covering every game type
    pub fn standard() -> Result<Self> {
        let tables = Self::new(tables::standard_tables());
        tables.validate()?;
        for game_type in GameType::ALL {
            if tables.get(game_type).is_none() {
                bail!("No difficulty table for {}", game_type);
            }
        }
        Ok(tables)
    }

    pub fn get(&self, game_type: GameType) -> Option<&DifficultyTable> {
        self.tables.get(&game_type)
    }

    pub fn resolve(&self, game_type: GameType, tier: SkillTier) -> Result<DifficultyConfig> {
        match self.get(game_type) {
            Some(table) => Ok(table.resolve(tier)),
            None => bail!("No difficulty table for {}", game_type),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.tables.values().try_for_each(DifficultyTable::validate)
    }
}

fn standard_tables() -> Result<&'static DifficultyTables> {
    static TABLES: OnceLock<DifficultyTables> = OnceLock::new();
    if let Some(tables) = TABLES.get() {
        return Ok(tables);
    }
    let tables = DifficultyTables::standard()?;
    Ok(TABLES.get_or_init(|| tables))
}

pub fn resolve_difficulty(game_type: GameType, tier: SkillTier) -> Result<DifficultyConfig> {
    standard_tables()?.resolve(game_type, tier)
}
