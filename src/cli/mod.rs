//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `query`: process a single query and print the result as JSON

pub mod query;
pub mod serve;

use clap::{Parser, Subcommand};

/// Maestro - semantic cache and adaptive retrieval routing
#[derive(Parser)]
#[command(name = "maestro")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Process one query and print the result
    Query(query::QueryArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["maestro", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_query_flags() {
        let cli = Cli::try_parse_from([
            "maestro",
            "query",
            "Compare your pricing to competitors",
            "--strategy",
            "fast",
            "--no-cache",
        ])
        .unwrap();

        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.text, "Compare your pricing to competitors");
        assert_eq!(args.strategy.as_deref(), Some("fast"));
        assert!(args.no_cache);
    }

    #[test]
    fn test_query_requires_text() {
        assert!(Cli::try_parse_from(["maestro", "query"]).is_err());
    }
}
