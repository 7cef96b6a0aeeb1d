// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus types for similarity search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a corpus entry was labelled when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusLabel {
    /// Recorded during the bootstrap phase.
    Supervised { is_research_related: bool },
    /// Recorded during the steady-state phase.
    Unsupervised { cluster: String },
}

/// A past exchange whose input embedding is searchable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEmbedding {
    pub input: String,
    pub response: String,
    /// Embedding of `input`.
    pub embedding: Vec<f32>,
    pub timestamp: DateTime<Utc>,
    pub label: CorpusLabel,
}

impl ConversationEmbedding {
    /// Cluster id, for entries recorded in the steady-state phase.
    pub fn cluster(&self) -> Option<&str> {
        match &self.label {
            CorpusLabel::Unsupervised { cluster } => Some(cluster.as_str()),
            CorpusLabel::Supervised { .. } => None,
        }
    }
}

/// A corpus entry paired with its similarity to a query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredEmbedding<'a> {
    pub entry: &'a ConversationEmbedding,
    pub similarity: f32,
}

/// Members of one cluster, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub cluster: String,
    pub count: usize,
    /// Input of the first member.
    pub sample: String,
}
