// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Research-domain classification rules.
//!
//! The checks that need no remote calls live here. The session layers the
//! embedding-based and learned-pattern checks on top (see
//! [`AssistantSession::classify`](crate::session::AssistantSession::classify)).

use std::sync::LazyLock;

use regex::Regex;

/// Returned to the user instead of a completion for out-of-domain queries.
pub const REJECTION_MESSAGE: &str =
    "I specialize in research topics. Could you ask me about an academic subject or research area?";

/// Queries at least this long (in characters) pass the keyword rule.
pub const MIN_ACCEPTED_CHARS: usize = 15;

/// Substrings that mark a query as research-related.
pub const RESEARCH_KEYWORDS: &[&str] = &[
    "research",
    "study",
    "analysis",
    "theory",
    "methodology",
    "data",
    "experiment",
    "hypothesis",
    "scientific",
    "academic",
    "paper",
    "journal",
    "publication",
    "findings",
    "literature",
    "review",
    "investigation",
    "what",
    "why",
    "how",
    "explain",
    "define",
    "analyze",
    "compare",
    "evaluate",
    "discuss",
    "examine",
    "explore",
    "investigate",
];

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(hi|hello|hey|greetings|thanks|thank you|bye|goodbye)").expect("valid regex")
});

static GREETING_ANY_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey|greetings|thanks|thank you|bye|goodbye)")
        .expect("valid regex")
});

/// Why a query was accepted, or that it was not.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClass {
    /// Starts with a greeting or courtesy word.
    Greeting,
    /// Contains a research keyword or is long enough.
    Keywords,
    /// Mean similarity of the nearest past queries.
    SemanticNeighbors(f32),
    /// A learned research shingle appears in the query.
    LearnedPattern(String),
    OutOfDomain,
}

impl QueryClass {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, QueryClass::OutOfDomain)
    }
}

/// Greeting prefix check on an already-lowercased query.
///
/// This is a prefix match, so "history" counts as starting with "hi".
pub fn starts_with_greeting(query_lower: &str) -> bool {
    GREETING.is_match(query_lower)
}

/// Greeting check on raw user input: trimmed, any case.
pub fn is_greeting(input: &str) -> bool {
    GREETING_ANY_CASE.is_match(input.trim())
}

/// Keyword rule on an already-lowercased query.
pub fn keyword_hit(query_lower: &str) -> bool {
    RESEARCH_KEYWORDS.iter().any(|k| query_lower.contains(k))
        || query_lower.chars().count() >= MIN_ACCEPTED_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_prefix_matches_lowercase_only() {
        assert!(starts_with_greeting("hi"));
        assert!(starts_with_greeting("thank you so much"));
        assert!(!starts_with_greeting(" hi"));
        assert!(!starts_with_greeting("oh hi"));
    }

    #[test]
    fn greeting_is_a_prefix_match() {
        assert!(starts_with_greeting("history of rome"));
    }

    #[test]
    fn is_greeting_trims_and_ignores_case() {
        assert!(is_greeting("  Hello there"));
        assert!(is_greeting("BYE"));
        assert!(!is_greeting("banana"));
    }

    #[test]
    fn keyword_rule() {
        assert!(keyword_hit("what is machine learning?"));
        assert!(keyword_hit("somewhatlong"));
        assert!(keyword_hit("fifteen chars!!"));
        assert!(!keyword_hit("banana"));
        assert!(!keyword_hit("fourteen chars"));
    }

    #[test]
    fn only_out_of_domain_is_rejected() {
        assert!(QueryClass::Greeting.is_accepted());
        assert!(QueryClass::SemanticNeighbors(0.9).is_accepted());
        assert!(QueryClass::LearnedPattern("neural networks".into()).is_accepted());
        assert!(!QueryClass::OutOfDomain.is_accepted());
    }
}
