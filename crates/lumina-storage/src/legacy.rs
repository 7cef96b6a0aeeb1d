// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import of the legacy three-file layout.
//!
//! Earlier releases kept `conversation_history.json`, `learning_data.json`
//! and `embeddings_cache.json` side by side in the working directory, with
//! camelCase keys and maps stored as `[key, value]` arrays. Each file is
//! read independently; a missing or malformed file contributes nothing.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use lumina_core::ConversationTurn;
use lumina_learning::{
    FeedbackEntry, Features, LearningPhase, LearningState, QualityStat, SupervisedRecord,
    TopicPatterns, UnsupervisedRecord,
};
use lumina_memory::{ConversationEmbedding, CorpusLabel};

use crate::snapshot::{EmbeddingsSnapshot, StateSnapshot};

pub const CONVERSATION_FILE: &str = "conversation_history.json";
pub const LEARNING_FILE: &str = "learning_data.json";
pub const EMBEDDINGS_FILE: &str = "embeddings_cache.json";

/// Interaction count at which legacy data was considered past bootstrap.
const LEGACY_BOOTSTRAP_THRESHOLD: u64 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyLearningFile {
    learning_data: LegacyLearningData,
    user_feedback: Vec<LegacyFeedback>,
    topic_patterns: Vec<(String, bool)>,
    response_quality: Vec<(String, LegacyQuality)>,
    interaction_count: u64,
    learning_phase: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyLearningData {
    supervised: Vec<LegacySupervised>,
    unsupervised: Vec<LegacyUnsupervised>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySupervised {
    input: String,
    #[serde(default)]
    response: String,
    timestamp: Option<DateTime<Utc>>,
    feedback: Option<String>,
    /// Older writers stored feedback under this key instead.
    user_feedback: Option<String>,
    #[serde(default)]
    is_research_related: bool,
    input_embedding: Option<Vec<f32>>,
    response_embedding: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUnsupervised {
    input: String,
    #[serde(default)]
    response: String,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    cluster: String,
    patterns: Option<LegacyFeatures>,
    input_embedding: Option<Vec<f32>>,
    response_embedding: Option<Vec<f32>>,
    #[serde(default)]
    semantic_similarity: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFeatures {
    length: usize,
    word_count: usize,
    has_question_words: bool,
    has_research_terms: bool,
    complexity: usize,
}

#[derive(Debug, Deserialize)]
struct LegacyFeedback {
    feedback: String,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    context: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyQuality {
    count: u64,
    avg_length: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyEmbeddingsFile {
    embeddings_cache: Vec<(String, Vec<f32>)>,
    conversation_embeddings: Vec<LegacyConversationEmbedding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyConversationEmbedding {
    input: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    embedding: Vec<f32>,
    timestamp: Option<DateTime<Utc>>,
    cluster: Option<String>,
    #[serde(default)]
    is_research_related: bool,
}

/// Read the legacy files in `dir`. Returns `None` when none of them exist.
pub async fn import(dir: &Path) -> Option<StateSnapshot> {
    let conversation: Option<Vec<ConversationTurn>> =
        read_legacy(&dir.join(CONVERSATION_FILE)).await;
    let learning: Option<LegacyLearningFile> = read_legacy(&dir.join(LEARNING_FILE)).await;
    let embeddings: Option<LegacyEmbeddingsFile> = read_legacy(&dir.join(EMBEDDINGS_FILE)).await;

    if conversation.is_none() && learning.is_none() && embeddings.is_none() {
        return None;
    }

    let now = Utc::now();
    Some(StateSnapshot {
        conversation: conversation.unwrap_or_default(),
        learning: learning.map(|l| convert_learning(l, now)).unwrap_or_default(),
        embeddings: embeddings
            .map(|e| convert_embeddings(e, now))
            .unwrap_or_default(),
        ..StateSnapshot::default()
    })
}

async fn read_legacy<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "legacy file unreadable, skipping");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "legacy file malformed, skipping");
            None
        }
    }
}

fn convert_learning(file: LegacyLearningFile, now: DateTime<Utc>) -> LearningState {
    let past_bootstrap = file.interaction_count >= LEGACY_BOOTSTRAP_THRESHOLD
        || file.learning_phase.as_deref() == Some("unsupervised");

    LearningState {
        phase: if past_bootstrap {
            LearningPhase::SteadyState
        } else {
            LearningPhase::Bootstrap
        },
        interaction_count: file.interaction_count,
        supervised: file
            .learning_data
            .supervised
            .into_iter()
            .map(|r| SupervisedRecord {
                input: r.input,
                response: r.response,
                timestamp: r.timestamp.unwrap_or(now),
                feedback: r.feedback.or(r.user_feedback),
                is_research_related: r.is_research_related,
                input_embedding: r.input_embedding,
                response_embedding: r.response_embedding,
            })
            .collect(),
        unsupervised: file
            .learning_data
            .unsupervised
            .into_iter()
            .map(|r| UnsupervisedRecord {
                features: r.patterns.map_or_else(
                    || lumina_learning::extract_features(&r.input),
                    |p| Features {
                        length: p.length,
                        word_count: p.word_count,
                        has_question_words: p.has_question_words,
                        has_research_terms: p.has_research_terms,
                        complexity: p.complexity,
                    },
                ),
                input: r.input,
                response: r.response,
                timestamp: r.timestamp.unwrap_or(now),
                cluster: r.cluster,
                input_embedding: r.input_embedding,
                response_embedding: r.response_embedding,
                semantic_similarity: r.semantic_similarity,
            })
            .collect(),
        feedback: file
            .user_feedback
            .into_iter()
            .map(|f| FeedbackEntry {
                feedback: f.feedback,
                timestamp: f.timestamp.unwrap_or(now),
                context: f.context,
            })
            .collect(),
        topic_patterns: TopicPatterns::from(file.topic_patterns),
        response_quality: file
            .response_quality
            .into_iter()
            .map(|(key, q)| {
                (
                    key,
                    QualityStat {
                        count: q.count,
                        avg_length: q.avg_length,
                    },
                )
            })
            .collect(),
    }
}

fn convert_embeddings(file: LegacyEmbeddingsFile, now: DateTime<Utc>) -> EmbeddingsSnapshot {
    let corpus = file
        .conversation_embeddings
        .into_iter()
        .filter(|e| !e.embedding.is_empty())
        .map(|e| ConversationEmbedding {
            input: e.input,
            response: e.response,
            embedding: e.embedding,
            timestamp: e.timestamp.unwrap_or(now),
            label: match e.cluster {
                Some(cluster) => CorpusLabel::Unsupervised { cluster },
                None => CorpusLabel::Supervised {
                    is_research_related: e.is_research_related,
                },
            },
        })
        .collect();

    EmbeddingsSnapshot {
        cache: file.embeddings_cache,
        corpus,
    }
}
