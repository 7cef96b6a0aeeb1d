// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumina shell` command implementation.
//!
//! Interactive REPL with a colored prompt and readline history. Every line
//! is either a built-in command, feedback on the last answer, or a query.

use std::sync::Arc;

use colored::Colorize;
use lumina_agent::{AssistantSession, TurnLearning, TurnOutcome};
use lumina_config::LuminaConfig;
use lumina_core::LuminaError;
use lumina_mistral::MistralProvider;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::error;

use crate::render;

/// Results listed by `search`.
const SEARCH_LIMIT: usize = 10;

const FEEDBACK_PROMPT: &str =
    "Was my response helpful? (Type 'yes', 'no', or just continue with your next question)";

/// A parsed shell line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Exit,
    Stats,
    Help,
    Clusters,
    Search(&'a str),
    SearchUsage,
    /// Feedback or a query.
    Text(&'a str),
}

impl<'a> ShellCommand<'a> {
    /// Commands match case-insensitively; `line` is already trimmed.
    fn parse(line: &'a str) -> Self {
        let lowered = line.to_lowercase();
        match lowered.as_str() {
            "exit" => return Self::Exit,
            "stats" => return Self::Stats,
            "help" => return Self::Help,
            "clusters" => return Self::Clusters,
            "search" => return Self::SearchUsage,
            _ => {}
        }
        if lowered.starts_with("search ") {
            let query = line.get("search ".len()..).unwrap_or_default().trim();
            return if query.is_empty() {
                Self::SearchUsage
            } else {
                Self::Search(query)
            };
        }
        Self::Text(line)
    }
}

/// Runs the `lumina shell` interactive REPL.
pub async fn run_shell(config: LuminaConfig) -> Result<(), LuminaError> {
    println!("{}", "Initializing research assistant...".dimmed());

    let provider = Arc::new(MistralProvider::new(&config).inspect_err(|_| {
        eprintln!(
            "error: Mistral API key required. Set mistral.api_key in config or the MISTRAL_API_KEY env var."
        );
    })?);
    let mut session = AssistantSession::initialize(config, provider.clone(), provider).await;

    let mut rl = DefaultEditor::new()
        .map_err(|e| LuminaError::Internal(format!("failed to initialize readline: {e}")))?;

    print_welcome(&session);

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match ShellCommand::parse(trimmed) {
                    ShellCommand::Exit => break,
                    ShellCommand::Stats => println!("\n{}", render::stats(&session.stats())),
                    ShellCommand::Help => println!("\n{}", render::help()),
                    ShellCommand::Clusters => {
                        println!("\n{}", render::clusters(&session.analyze_clusters()));
                    }
                    ShellCommand::SearchUsage => println!("Usage: search [your query]"),
                    ShellCommand::Search(query) => {
                        let hits = session.search_similar(query, SEARCH_LIMIT).await;
                        println!("\n{}", render::search_hits(&hits));
                    }
                    ShellCommand::Text(text) => handle_text(&mut session, text).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("\n{}", "Thank you for helping me learn! Goodbye!".green().bold());
    println!("\n{}", render::stats(&session.stats()));
    session.flush().await
}

fn print_welcome(session: &AssistantSession) {
    let stats = session.stats();
    println!("\n{}", "Lumina research assistant".bold().green());
    println!("I learn from our conversations to provide better assistance.");
    println!(
        "Learning phase: {}  Interactions: {}  Cached embeddings: {}",
        stats.learning.phase.record_kind().to_uppercase().cyan(),
        stats.learning.interactions,
        stats.cached_embeddings
    );
    println!("Type {} for commands, {} to quit.\n", "help".yellow(), "exit".yellow());
}

/// Feedback first; anything that is not feedback is processed as a query.
async fn handle_text(session: &mut AssistantSession, text: &str) {
    match session.handle_feedback(text).await {
        Ok(true) => {
            println!("{}", "Thank you for your feedback!".green());
            return;
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "failed to persist feedback");
            eprintln!("{}: {e}", "error".red());
            return;
        }
    }

    match session.process_input(text).await {
        Ok(TurnOutcome::Rejected { message, .. }) => {
            println!("\n{} {}\n", "Assistant:".bold().blue(), message.yellow());
        }
        Ok(TurnOutcome::Answered(turn)) => {
            println!(
                "\n{} {}",
                format!("Assistant [{}]:", turn.phase).bold().blue(),
                turn.response
            );
            if let TurnLearning::Unsupervised {
                semantic_similarity,
                ..
            } = turn.learning
            {
                println!(
                    "{}",
                    format!(
                        "Semantic similarity with past conversations: {}",
                        render::percent(semantic_similarity)
                    )
                    .dimmed()
                );
            }
            if turn.feedback_requested {
                println!("\n{}", FEEDBACK_PROMPT.cyan());
            }
            println!();
        }
        Err(e) => {
            eprintln!("{}: {e}", "error processing input".red());
            println!("Please try again or type 'help' for available commands.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_ignore_case() {
        assert_eq!(ShellCommand::parse("EXIT"), ShellCommand::Exit);
        assert_eq!(ShellCommand::parse("Stats"), ShellCommand::Stats);
        assert_eq!(ShellCommand::parse("clusters"), ShellCommand::Clusters);
        assert_eq!(ShellCommand::parse("help"), ShellCommand::Help);
    }

    #[test]
    fn search_takes_the_rest_of_the_line() {
        assert_eq!(
            ShellCommand::parse("Search  machine learning"),
            ShellCommand::Search("machine learning")
        );
        assert_eq!(ShellCommand::parse("search"), ShellCommand::SearchUsage);
        assert_eq!(ShellCommand::parse("search    "), ShellCommand::SearchUsage);
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(ShellCommand::parse("yes"), ShellCommand::Text("yes"));
        assert_eq!(
            ShellCommand::parse("What is machine learning?"),
            ShellCommand::Text("What is machine learning?")
        );
        assert_eq!(ShellCommand::parse("searching for meaning"), ShellCommand::Text("searching for meaning"));
    }
}
