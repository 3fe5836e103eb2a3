pub mod achievements;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod progress;
pub mod scoring;
pub mod services;

use anyhow::Result;
use chrono::Utc;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::scoring::{
    DifficultyConfig, GameResult, GameType, SkillEstimator, SkillTier, resolve_difficulty,
};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_tiers(game_type: &str) -> Result<()> {
    let game_type: GameType = game_type.parse()?;
    println!("{}", format!("Round parameters for the {} game", game_type).bold());

    let mut previous: Option<DifficultyConfig> = None;
    for tier in SkillTier::all() {
        let config = resolve_difficulty(game_type, tier)?;
        let options: Vec<String> = config
            .iter()
            .map(|(name, value)| {
                let changed = previous
                    .as_ref()
                    .and_then(|previous| previous.get(name))
                    .is_some_and(|old| old != *value);
                let text = format!("{}={}", name, value);
                if changed { text.yellow().to_string() } else { text }
            })
            .collect();
        println!("  {:>2}  {}", tier.to_string().cyan(), options.join("  "));
        previous = Some(config);
    }
    Ok(())
}

pub fn handle_estimate(game_type: &str, scores: &[f64]) -> Result<()> {
    let game_type: GameType = game_type.parse()?;
    let now = Utc::now();
    let history: Vec<GameResult> = scores
        .iter()
        .map(|&score| GameResult::new(game_type, score, now))
        .collect();

    let config = AppConfig::new();
    let tier = SkillEstimator::new(&config.scoring).estimate(&history, game_type)?;
    let window = scores.len().min(config.scoring.recency_window);
    println!(
        "{} tier {} (from the last {} of {} scores)",
        game_type,
        tier.to_string().green().bold(),
        window,
        scores.len()
    );
    Ok(())
}

pub fn handle_seed() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.server.database_path)?;
    database::setup::initialize_pool(&pool)?;
    let mut conn = database::get_connection(&pool)?;
    let added = achievements::seed_defaults(&mut conn)?;
    println!("Added {} achievements to {}", added, config.server.database_path);
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
