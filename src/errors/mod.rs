use anyhow::Context as _;
use thiserror::Error;

/// Caller contract violations in the scoring core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("unknown game type: {0:?}")]
    UnknownGameType(String),

    #[error("invalid score {score} for {game_type}: scores must be finite and non-negative")]
    InvalidScore { game_type: String, score: f64 },

    #[error("skill tier {0} is outside 1..=10")]
    TierOutOfRange(i64),
}

/// Rejected achievement definitions and stored values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AchievementError {
    #[error("unknown achievement category: {0:?}")]
    UnknownCategory(String),

    #[error("invalid achievement: {0}")]
    InvalidDefinition(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("lesson id must not be empty")]
    EmptyLessonId,
}

/// Add context to progress store errors
pub fn store_context(operation: &str, namespace: &str, key: &str) -> String {
    format!("Failed to {} progress entry {}/{}", operation, namespace, key)
}

/// Wrap result with progress store context
pub fn with_store_context<T, E>(
    result: Result<T, E>,
    operation: &str,
    namespace: &str,
    key: &str,
) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.with_context(|| store_context(operation, namespace, key))
}

/// True when the error chain carries a caller mistake rather than a server fault
pub fn is_client_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<ScoringError>().is_some()
        || error.downcast_ref::<AchievementError>().is_some()
        || error.downcast_ref::<ProgressError>().is_some()
}
