use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "NetQuest adaptive difficulty and progress backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Print the round parameters of a game type for every skill tier
    Tiers {
        /// Game type: port, protocol, subnetting or acronym
        game_type: String,
    },
    /// Estimate the skill tier for a list of scores, oldest first
    Estimate {
        /// Game type: port, protocol, subnetting or acronym
        game_type: String,
        /// Scores of finished games
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        scores: Vec<f64>,
    },
    /// Insert the default achievements into an empty database
    Seed,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::try_parse_from(["netquest", "estimate", "port", "10", "12.5"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Estimate {
                game_type: "port".to_string(),
                scores: vec![10.0, 12.5]
            }
        );
    }

    #[test]
    fn test_serve_default_port() {
        let cli = Cli::try_parse_from(["netquest", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }

    #[test]
    fn test_negative_score_reaches_estimate() {
        let cli = Cli::try_parse_from(["netquest", "estimate", "port", "4", "-5"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Estimate {
                game_type: "port".to_string(),
                scores: vec![4.0, -5.0]
            }
        );
    }

    #[test]
    fn test_estimate_requires_scores() {
        assert!(Cli::try_parse_from(["netquest", "estimate", "port"]).is_err());
    }
}
