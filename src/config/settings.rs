#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub recency_window: usize,
    pub score_scale: f64,
    pub log_base: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            recency_window: 10,
            score_scale: 0.4,
            log_base: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressSettings {
    pub xp_level_base: u64,
    pub xp_per_lesson: u64,
    pub heatmap_days: u32,
    pub max_heatmap_days: u32,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            xp_level_base: 100,
            xp_per_lesson: 50,
            heatmap_days: 84, // 12 weeks
            max_heatmap_days: 366,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: "netquest.db".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub progress: ProgressSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server: ServerSettings::from_env(),
            ..Self::default()
        }
    }
}
