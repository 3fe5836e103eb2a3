use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;

pub const TIME_LIMIT: &str = "time_limit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Port,
    Protocol,
    Subnetting,
    Acronym,
}

impl GameType {
    pub const ALL: [GameType; 4] = [
        GameType::Port,
        GameType::Protocol,
        GameType::Subnetting,
        GameType::Acronym,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Port => "port",
            GameType::Protocol => "protocol",
            GameType::Subnetting => "subnetting",
            GameType::Acronym => "acronym",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "port" => Ok(GameType::Port),
            "protocol" => Ok(GameType::Protocol),
            "subnetting" => Ok(GameType::Subnetting),
            "acronym" => Ok(GameType::Acronym),
            _ => Err(ScoringError::UnknownGameType(s.to_string())),
        }
    }
}

/// A finished round. Entries are never rewritten once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_type: GameType,
    pub score: f64,
    pub played_at: DateTime<Utc>,
}

impl GameResult {
    pub fn new(game_type: GameType, score: f64, played_at: DateTime<Utc>) -> Self {
        Self {
            game_type,
            score,
            played_at,
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        validate_score(self.game_type, self.score)
    }
}

pub fn validate_score(game_type: GameType, score: f64) -> Result<(), ScoringError> {
    if score.is_finite() && score >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidScore {
            game_type: game_type.to_string(),
            score,
        })
    }
}

/// Skill tier in 1..=10, 1 meaning little or no history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct SkillTier(u8);

impl SkillTier {
    pub const MIN: SkillTier = SkillTier(1);
    pub const MAX: SkillTier = SkillTier(10);

    pub fn new(value: i64) -> Result<Self, ScoringError> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(SkillTier(value as u8))
        } else {
            Err(ScoringError::TierOutOfRange(value))
        }
    }

    /// Clamp an already-rounded value into range; NaN lands on the floor
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() || raw <= Self::MIN.0 as f64 {
            Self::MIN
        } else if raw >= Self::MAX.0 as f64 {
            Self::MAX
        } else {
            SkillTier(raw as u8)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SkillTier> {
        (Self::MIN.0..=Self::MAX.0).map(SkillTier)
    }
}

impl Default for SkillTier {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<i64> for SkillTier {
    type Error = ScoringError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        SkillTier::new(value)
    }
}

impl From<SkillTier> for u8 {
    fn from(tier: SkillTier) -> Self {
        tier.0
    }
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One round parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Seconds(u32),
    Count(u32),
    Probability(f64),
    Toggle(bool),
}

impl OptionValue {
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Seconds(_) => "seconds",
            OptionValue::Count(_) => "count",
            OptionValue::Probability(_) => "probability",
            OptionValue::Toggle(_) => "toggle",
        }
    }

    pub fn same_kind(&self, other: &OptionValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Seconds(s) => write!(f, "{}s", s),
            OptionValue::Count(c) => write!(f, "{}", c),
            OptionValue::Probability(p) => write!(f, "{:.2}", p),
            OptionValue::Toggle(t) => write!(f, "{}", t),
        }
    }
}

/// Resolved round parameters for one game type at one tier
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DifficultyConfig {
    options: BTreeMap<String, OptionValue>,
}

impl DifficultyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: OptionValue) -> Option<OptionValue> {
        self.options.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<OptionValue> {
        self.options.get(name).copied()
    }

    pub fn seconds(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            OptionValue::Seconds(s) => Some(s),
            _ => None,
        }
    }

    pub fn count(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            OptionValue::Count(c) => Some(c),
            _ => None,
        }
    }

    pub fn probability(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            OptionValue::Probability(p) => Some(p),
            _ => None,
        }
    }

    pub fn toggle(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            OptionValue::Toggle(t) => Some(t),
            _ => None,
        }
    }

    pub fn time_limit(&self) -> Option<u32> {
        self.seconds(TIME_LIMIT)
    }

    pub fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
        self.options.iter().filter_map(|(name, value)| match value {
            OptionValue::Probability(p) => Some((name.as_str(), *p)),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
