// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding memory for the Lumina research assistant.
//!
//! - **EmbeddingCache**: memoizes remote embeddings by a 100-character text prefix
//! - **similarity**: cosine similarity, top-k ranking, and cluster resolution
//!   over the conversation corpus (linear scan, no index)
//! - **types**: ConversationEmbedding, CorpusLabel, ScoredEmbedding, ClusterSummary

pub mod cache;
pub mod similarity;
pub mod types;

pub use cache::EmbeddingCache;
pub use similarity::{
    cosine_similarity, find_or_create_cluster, group_clusters, max_similarity,
    mean_top_k_similarity, rank_similar,
};
pub use types::*;
