// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text rendering for shell and `stats` output.

use lumina_agent::{SearchHit, SessionStats};
use lumina_memory::ClusterSummary;

/// Characters of a past query shown per search hit.
const SEARCH_PREVIEW_CHARS: usize = 80;

/// Characters of the sample query shown per cluster.
const CLUSTER_SAMPLE_CHARS: usize = 100;

fn head(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

/// Similarity as a percentage with one decimal, e.g. `87.5%`.
pub fn percent(similarity: f32) -> String {
    format!("{:.1}%", similarity * 100.0)
}

pub fn stats(stats: &SessionStats) -> String {
    let learning = &stats.learning;
    format!(
        "Learning Statistics:\n\
         Interactions: {}\n\
         Learning Phase: {}\n\
         Supervised Data Points: {}\n\
         Unsupervised Data Points: {}\n\
         Learned Patterns: {}\n\
         User Feedback Received: {}\n\
         Cached Embeddings: {}\n\
         Conversation Embeddings: {}\n",
        learning.interactions,
        learning.phase.record_kind().to_uppercase(),
        learning.supervised_records,
        learning.unsupervised_records,
        learning.learned_patterns,
        learning.feedback_received,
        stats.cached_embeddings,
        stats.conversation_embeddings,
    )
}

pub fn search_hits(hits: &[SearchHit]) -> String {
    let mut out = format!("Found {} similar conversations:\n", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}...\n",
            i + 1,
            percent(hit.similarity),
            head(&hit.input, SEARCH_PREVIEW_CHARS)
        ));
    }
    out
}

pub fn clusters(clusters: &[ClusterSummary]) -> String {
    let mut out = format!(
        "Conversation Clusters Analysis:\nTotal clusters: {}\n",
        clusters.len()
    );
    for cluster in clusters {
        out.push_str(&format!(
            "\nCluster {}: {} conversations\nSample: {}...\n",
            cluster.cluster,
            cluster.count,
            head(&cluster.sample, CLUSTER_SAMPLE_CHARS)
        ));
    }
    out
}

pub fn help() -> &'static str {
    "Lumina Help:\n\
     Research questions: ask about any academic topic, theory, or research area\n\
     stats            - view learning statistics and progress\n\
     search [query]   - find similar conversations from history\n\
     clusters         - analyze conversation topic clusters\n\
     help             - show this help message\n\
     exit             - end the conversation and show final stats\n\
     \n\
     Examples:\n\
     \x20 What is machine learning?\n\
     \x20 Explain quantum computing principles\n\
     \x20 search machine learning\n\
     \x20 clusters\n"
}
