// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical feature extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Features;

static QUESTION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(what|why|how|when|where|who)\b").expect("valid regex")
});

static RESEARCH_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(study|research|analysis|theory)\b").expect("valid regex")
});

/// Shingle words must be longer than this many characters.
const MIN_SHINGLE_WORD_CHARS: usize = 3;

/// Compute the fixed feature vector recorded for steady-state turns.
pub fn extract_features(input: &str) -> Features {
    Features {
        length: input.chars().count(),
        word_count: input.split_whitespace().count(),
        has_question_words: QUESTION_WORDS.is_match(input),
        has_research_terms: RESEARCH_TERMS.is_match(input),
        complexity: input.split(['.', '!', '?']).count(),
    }
}

/// Adjacent pairs of lowercase words longer than three characters.
///
/// Short words are dropped before pairing, so "the theory of relativity"
/// yields the single shingle "theory relativity".
pub fn topic_shingles(input: &str) -> Vec<String> {
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_SHINGLE_WORD_CHARS)
        .collect();
    words.windows(2).map(|pair| pair.join(" ")).collect()
}
