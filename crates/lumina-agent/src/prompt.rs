// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt assembly.

use lumina_core::ConversationTurn;
use lumina_learning::LearningPhase;

/// Placeholder replaced with the phase label in the persona text.
pub const PHASE_PLACEHOLDER: &str = "{phase}";

/// Default persona. Note the trailing space after the first sentence.
pub const DEFAULT_PERSONA: &str = "You are an intelligent research assistant that learns and adapts. \nCurrent learning phase: {phase}\n\nCore capabilities:\n1. Focus on academic and research topics\n2. Provide detailed, well-structured responses\n3. Engage naturally while maintaining research focus\n4. Learn from interactions and improve over time";

/// Characters of a past query shown as a prompt example.
pub const EXAMPLE_QUERY_CHARS: usize = 100;

/// Hints learned in the steady-state phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct LearnedHints<'a> {
    pub research_patterns: &'a [&'a str],
    pub similar_queries: &'a [&'a str],
}

/// Build the system prompt for `phase`.
///
/// `persona` overrides [`DEFAULT_PERSONA`]; `{phase}` is substituted in
/// either. Hints are only rendered when non-empty.
pub fn system_prompt(persona: Option<&str>, phase: LearningPhase, hints: LearnedHints<'_>) -> String {
    let label = phase.record_kind().to_uppercase();
    let mut prompt = persona
        .unwrap_or(DEFAULT_PERSONA)
        .replace(PHASE_PLACEHOLDER, &label);

    if !hints.research_patterns.is_empty() {
        prompt.push_str("\n\nLearned research patterns: ");
        prompt.push_str(&hints.research_patterns.join(", "));
    }

    if !hints.similar_queries.is_empty() {
        let examples: Vec<String> = hints
            .similar_queries
            .iter()
            .map(|q| {
                let head: String = q.chars().take(EXAMPLE_QUERY_CHARS).collect();
                format!("Q: {head}...")
            })
            .collect();
        prompt.push_str("\n\nSimilar past queries:\n");
        prompt.push_str(&examples.join("\n"));
    }

    prompt
}

/// Append the recent conversation as `role: content` lines.
pub fn with_recent_context(system: &str, turns: &[ConversationTurn]) -> String {
    let context: Vec<String> = turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect();
    format!("{system}\n\nRecent context:\n{}", context.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_prompt_is_the_bare_persona() {
        let prompt = system_prompt(None, LearningPhase::Bootstrap, LearnedHints::default());
        assert!(prompt.starts_with("You are an intelligent research assistant that learns and adapts. \n"));
        assert!(prompt.contains("Current learning phase: SUPERVISED\n"));
        assert!(prompt.ends_with("4. Learn from interactions and improve over time"));
    }

    #[test]
    fn steady_state_prompt_lists_hints() {
        let long = "x".repeat(150);
        let prompt = system_prompt(
            None,
            LearningPhase::SteadyState,
            LearnedHints {
                research_patterns: &["machine learning", "neural networks"],
                similar_queries: &["what is backprop", &long],
            },
        );
        assert!(prompt.contains("Current learning phase: UNSUPERVISED"));
        assert!(prompt.contains("\n\nLearned research patterns: machine learning, neural networks"));
        let expected = format!(
            "\n\nSimilar past queries:\nQ: what is backprop...\nQ: {}...",
            "x".repeat(100)
        );
        assert!(prompt.ends_with(&expected), "got: {prompt}");
    }

    #[test]
    fn custom_persona_gets_phase_substituted() {
        let prompt = system_prompt(
            Some("Be terse. Phase={phase}"),
            LearningPhase::Bootstrap,
            LearnedHints::default(),
        );
        assert_eq!(prompt, "Be terse. Phase=SUPERVISED");
    }

    #[test]
    fn recent_context_renders_roles() {
        let turns = vec![
            ConversationTurn::user("what is entropy"),
            ConversationTurn::assistant("a measure of disorder"),
        ];
        assert_eq!(
            with_recent_context("SYS", &turns),
            "SYS\n\nRecent context:\nuser: what is entropy\nassistant: a measure of disorder"
        );
    }
}
