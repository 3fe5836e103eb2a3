pub mod history;
pub mod lessons;
pub mod snapshot;
pub mod store;
pub mod streak;
pub mod xp;

pub use history::GameHistory;
pub use snapshot::ProgressSnapshot;
pub use store::{MemoryProgressStore, ProgressKey, ProgressStore, SqliteProgressStore};
pub use streak::{HeatmapCell, StreakSummary};
pub use xp::LevelProgress;
