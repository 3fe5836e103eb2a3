use anyhow::Result;

use netquest::cli::Command;
use netquest::{
    handle_completions, handle_estimate, handle_seed, handle_serve, handle_tiers, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Tiers { game_type } => handle_tiers(game_type),
        Command::Estimate { game_type, scores } => handle_estimate(game_type, scores),
        Command::Seed => handle_seed(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
