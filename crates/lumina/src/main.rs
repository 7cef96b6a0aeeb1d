// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lumina - a conversational research assistant.
//!
//! This is the binary entry point.

mod render;
mod serve;
mod shell;
mod stats;

use clap::{Parser, Subcommand};
use colored::Colorize;
use lumina_config::LuminaConfig;

/// Lumina - a conversational research assistant that learns from its conversations.
#[derive(Parser, Debug)]
#[command(name = "lumina", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive research shell (default).
    Shell,
    /// Serve the HTTP query endpoint.
    Serve,
    /// Print learning statistics from the saved state without contacting the provider.
    Stats {
        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match lumina_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            lumina_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            init_tracing(log_filter(&config, false));
            shell::run_shell(config).await
        }
        Commands::Serve => {
            init_tracing(log_filter(&config, config.server.quiet));
            serve::run_serve(config).await
        }
        Commands::Stats { json } => stats::run_stats(&config, json).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Default filter directive; `RUST_LOG` takes precedence.
fn log_filter(config: &LuminaConfig, quiet: bool) -> String {
    if quiet {
        "lumina=warn,warn".to_string()
    } else {
        format!("lumina={},warn", config.agent.log_level)
    }
}

fn init_tracing(default_filter: String) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::parse_from(["lumina"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn stats_accepts_json_flag() {
        let cli = Cli::parse_from(["lumina", "stats", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
    }

    #[test]
    fn quiet_lowers_filter() {
        let config = LuminaConfig::default();
        assert_eq!(log_filter(&config, true), "lumina=warn,warn");
        assert_eq!(log_filter(&config, false), "lumina=info,warn");
    }
}
