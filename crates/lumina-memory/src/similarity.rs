// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cosine similarity and linear-scan ranking over the conversation corpus.
//!
//! Every query is an O(n·d) scan; there is no index structure.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::types::{ClusterSummary, ConversationEmbedding, ScoredEmbedding};

/// Cosine similarity of two vectors, in `[-1, 1]`.
///
/// Returns 0 for empty or mismatched-length inputs, zero-norm vectors, and
/// non-finite results, so ranking code never has to branch on errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    let sim = dot / denom;
    if !sim.is_finite() {
        return 0.0;
    }
    sim.clamp(-1.0, 1.0) as f32
}

/// Rank corpus entries by similarity to `query`, highest first.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn rank_similar<'a>(
    query: &[f32],
    corpus: &'a [ConversationEmbedding],
    top_k: usize,
) -> Vec<ScoredEmbedding<'a>> {
    let mut scored: Vec<ScoredEmbedding<'a>> = corpus
        .iter()
        .map(|entry| ScoredEmbedding {
            entry,
            similarity: cosine_similarity(query, &entry.embedding),
        })
        .collect();

    scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    scored
}

/// Best similarity against the whole corpus, floored at 0.
pub fn max_similarity(query: &[f32], corpus: &[ConversationEmbedding]) -> f32 {
    corpus
        .iter()
        .map(|entry| cosine_similarity(query, &entry.embedding))
        .fold(0.0, f32::max)
}

/// Mean similarity of the `k` nearest entries, or `None` for an empty corpus.
pub fn mean_top_k_similarity(
    query: &[f32],
    corpus: &[ConversationEmbedding],
    k: usize,
) -> Option<f32> {
    let nearest = rank_similar(query, corpus, k);
    if nearest.is_empty() {
        return None;
    }
    let total: f32 = nearest.iter().map(|s| s.similarity).sum();
    Some(total / nearest.len() as f32)
}

/// Resolve the cluster for a new steady-state turn.
///
/// Returns the cluster of the first clustered entry whose similarity is
/// strictly above `threshold` (first match, not best match). Otherwise
/// mints `semantic_cluster_<millis>`, or `cluster_<millis>` when the turn
/// has no embedding. Minted ids are not guaranteed unique.
pub fn find_or_create_cluster(
    query: Option<&[f32]>,
    corpus: &[ConversationEmbedding],
    threshold: f32,
    now: DateTime<Utc>,
) -> String {
    let Some(query) = query else {
        return format!("cluster_{}", now.timestamp_millis());
    };

    corpus
        .iter()
        .filter_map(|entry| entry.cluster().map(|cluster| (entry, cluster)))
        .find(|(entry, _)| cosine_similarity(query, &entry.embedding) > threshold)
        .map(|(_, cluster)| cluster.to_string())
        .unwrap_or_else(|| format!("semantic_cluster_{}", now.timestamp_millis()))
}

/// Group clustered corpus entries by cluster id, in first-seen order.
pub fn group_clusters(corpus: &[ConversationEmbedding]) -> Vec<ClusterSummary> {
    let mut groups: Vec<ClusterSummary> = Vec::new();
    for entry in corpus {
        let Some(cluster) = entry.cluster() else {
            continue;
        };
        match groups.iter_mut().find(|g| g.cluster == cluster) {
            Some(group) => group.count += 1,
            None => groups.push(ClusterSummary {
                cluster: cluster.to_string(),
                count: 1,
                sample: entry.input.clone(),
            }),
        }
    }
    groups
}
