pub mod estimator;
pub mod resolver;
pub mod tables;
pub mod types;

pub use estimator::{SkillEstimator, estimate_skill};
pub use resolver::{DifficultyTable, DifficultyTables, resolve_difficulty};
pub use types::{DifficultyConfig, GameResult, GameType, OptionValue, SkillTier};
