// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant session: owns all conversational and learned state and
//! runs one query at a time through classify, complete, record, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use lumina_config::LuminaConfig;
use lumina_core::retention::{push_bounded, truncate_oldest};
use lumina_core::{
    CompletionProvider, CompletionRequest, ConversationTurn, EmbeddingProvider, LuminaError,
};
use lumina_learning::{
    Features, LearningPhase, LearningStats, LearningTracker, SupervisedRecord, UnsupervisedRecord,
    extract_features,
};
use lumina_memory::{
    ClusterSummary, ConversationEmbedding, CorpusLabel, EmbeddingCache, find_or_create_cluster,
    group_clusters, max_similarity, mean_top_k_similarity, rank_similar,
};
use lumina_storage::snapshot::SNAPSHOT_VERSION;
use lumina_storage::{
    ConversationStore, EmbeddingsSnapshot, SnapshotStore, StateSnapshot, load_state,
};

use crate::prompt::{self, LearnedHints};
use crate::validator::{self, QueryClass, REJECTION_MESSAGE};

/// Nearest neighbours averaged by the semantic acceptance rule.
const SEMANTIC_NEIGHBORS: usize = 3;

/// Research shingles listed in the steady-state prompt.
const PROMPT_PATTERN_LIMIT: usize = 10;

/// Past queries offered as examples in the steady-state prompt.
const PROMPT_EXAMPLE_LIMIT: usize = 3;

/// Result of one call to [`AssistantSession::process_input`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered(AnsweredTurn),
    /// The query was out of domain. Nothing was recorded or persisted.
    Rejected { input: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnsweredTurn {
    pub input: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub phase: LearningPhase,
    #[serde(flatten)]
    pub learning: TurnLearning,
    /// The shell should ask whether the answer helped.
    pub feedback_requested: bool,
}

/// Phase-specific details of an answered turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TurnLearning {
    Supervised {
        is_research_related: bool,
        feedback: Option<String>,
    },
    Unsupervised {
        cluster: String,
        features: Features,
        semantic_similarity: f32,
    },
}

/// A past conversation matched by [`AssistantSession::search_similar`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub input: String,
    pub response: String,
    pub similarity: f32,
    pub timestamp: DateTime<Utc>,
}

/// Learning counters plus memory sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    #[serde(flatten)]
    pub learning: LearningStats,
    pub cached_embeddings: usize,
    pub conversation_embeddings: usize,
    pub history_turns: usize,
}

impl SessionStats {
    /// Stats of a persisted snapshot, without building a session.
    pub fn from_snapshot(snapshot: &StateSnapshot, config: &LuminaConfig) -> Self {
        let tracker =
            LearningTracker::new(snapshot.learning.clone(), &config.learning, &config.retention);
        Self {
            learning: tracker.stats(),
            cached_embeddings: snapshot.embeddings.cache.len(),
            conversation_embeddings: snapshot.embeddings.corpus.len(),
            history_turns: snapshot.conversation.len(),
        }
    }
}

/// Process-wide assistant state.
///
/// Created once on start with [`initialize`](Self::initialize) and written
/// back with [`flush`](Self::flush). Every answered turn and accepted
/// feedback is persisted as one snapshot.
pub struct AssistantSession {
    config: LuminaConfig,
    completion: Arc<dyn CompletionProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    conversation: ConversationStore,
    tracker: LearningTracker,
    cache: EmbeddingCache,
    corpus: Vec<ConversationEmbedding>,
    store: SnapshotStore,
}

impl AssistantSession {
    /// Load persisted state (snapshot, legacy files, or empty) and build the session.
    pub async fn initialize(
        config: LuminaConfig,
        completion: Arc<dyn CompletionProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let store = SnapshotStore::from_config(&config.storage);
        let snapshot = load_state(&store, &config.storage).await;
        let session = Self::from_snapshot(config, snapshot, store, completion, embedder);
        info!(
            phase = %session.phase(),
            interactions = session.tracker.interaction_count(),
            turns = session.conversation.len(),
            corpus = session.corpus.len(),
            "session initialized"
        );
        session
    }

    pub fn from_snapshot(
        config: LuminaConfig,
        snapshot: StateSnapshot,
        store: SnapshotStore,
        completion: Arc<dyn CompletionProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let retention = &config.retention;
        let conversation = ConversationStore::new(snapshot.conversation, retention.max_history_turns);
        let tracker = LearningTracker::new(snapshot.learning, &config.learning, retention);
        let cache = EmbeddingCache::from_pairs(snapshot.embeddings.cache, retention.max_cache_entries);
        let mut corpus = snapshot.embeddings.corpus;
        truncate_oldest(&mut corpus, retention.max_corpus_entries);

        Self {
            config,
            completion,
            embedder,
            conversation,
            tracker,
            cache,
            corpus,
            store,
        }
    }

    pub fn phase(&self) -> LearningPhase {
        self.tracker.phase()
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        self.conversation.turns()
    }

    pub fn tracker(&self) -> &LearningTracker {
        &self.tracker
    }

    pub fn corpus(&self) -> &[ConversationEmbedding] {
        &self.corpus
    }

    /// Handle one user query end to end.
    ///
    /// On a completion error the user turn is rolled back and the error is
    /// returned; the interaction counter keeps its increment.
    pub async fn process_input(&mut self, input: &str) -> Result<TurnOutcome, LuminaError> {
        self.tracker.begin_interaction();

        let class = self.classify(input).await;
        if !class.is_accepted() && !validator::is_greeting(input) {
            warn!("{REJECTION_MESSAGE}");
            return Ok(TurnOutcome::Rejected {
                input: input.to_string(),
                message: REJECTION_MESSAGE.to_string(),
            });
        }
        debug!(class = ?class, "query accepted");

        let phase = self.tracker.phase();
        self.conversation.push(ConversationTurn::user(input));
        let system = self.build_system_prompt(input, phase).await;
        let request = CompletionRequest {
            system_prompt: prompt::with_recent_context(
                &system,
                self.conversation.recent(self.config.learning.context_turns),
            ),
            user_message: input.to_string(),
            max_tokens: None,
        };

        let response = match self.completion.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                self.conversation.pop();
                return Err(e);
            }
        };
        let text = response.content;
        self.conversation.push(ConversationTurn::assistant(text.clone()));

        let timestamp = Utc::now();
        let learning = match phase {
            LearningPhase::Bootstrap => self.record_supervised(input, &text, timestamp).await,
            LearningPhase::SteadyState => self.record_unsupervised(input, &text, timestamp).await,
        };
        let feedback_requested = self.tracker.feedback_due();

        self.flush().await?;

        Ok(TurnOutcome::Answered(AnsweredTurn {
            input: input.to_string(),
            response: text,
            timestamp,
            phase,
            learning,
            feedback_requested,
        }))
    }

    /// Run the classification rules against `query`.
    ///
    /// In order: greeting prefix, semantic neighbours (steady state with a
    /// non-empty corpus), learned research shingles (steady state), keywords.
    pub async fn classify(&mut self, query: &str) -> QueryClass {
        let query_lower = query.to_lowercase();
        if validator::starts_with_greeting(&query_lower) {
            return QueryClass::Greeting;
        }
        let keyword_hit = validator::keyword_hit(&query_lower);

        if self.tracker.phase() == LearningPhase::SteadyState {
            if !self.corpus.is_empty()
                && let Some(vector) = self.cache.get_or_compute(&*self.embedder, query).await
                && let Some(mean) = mean_top_k_similarity(&vector, &self.corpus, SEMANTIC_NEIGHBORS)
                && mean > self.config.learning.semantic_accept_threshold
            {
                return QueryClass::SemanticNeighbors(mean);
            }

            if let Some(shingle) = self.tracker.matching_research_pattern(&query_lower) {
                return QueryClass::LearnedPattern(shingle.to_string());
            }
        }

        if keyword_hit {
            QueryClass::Keywords
        } else {
            QueryClass::OutOfDomain
        }
    }

    /// Attach feedback to the latest supervised record and persist.
    ///
    /// Returns `false` without side effects unless `text` is exactly one of
    /// the feedback words and a supervised record exists.
    pub async fn handle_feedback(&mut self, text: &str) -> Result<bool, LuminaError> {
        if !self.tracker.handle_feedback(text, Utc::now()) {
            return Ok(false);
        }
        self.flush().await?;
        Ok(true)
    }

    /// Past conversations most similar to `query`, above the search threshold.
    ///
    /// Returns nothing when the query cannot be embedded.
    pub async fn search_similar(&mut self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let Some(vector) = self.cache.get_or_compute(&*self.embedder, query).await else {
            return Vec::new();
        };
        let threshold = self.config.learning.search_threshold;
        rank_similar(&vector, &self.corpus, top_k)
            .into_iter()
            .filter(|s| s.similarity > threshold)
            .map(|s| SearchHit {
                input: s.entry.input.clone(),
                response: s.entry.response.clone(),
                similarity: s.similarity,
                timestamp: s.entry.timestamp,
            })
            .collect()
    }

    pub fn analyze_clusters(&self) -> Vec<ClusterSummary> {
        group_clusters(&self.corpus)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            learning: self.tracker.stats(),
            cached_embeddings: self.cache.len(),
            conversation_embeddings: self.corpus.len(),
            history_turns: self.conversation.len(),
        }
    }

    /// Write the whole state as one atomic snapshot.
    pub async fn flush(&self) -> Result<(), LuminaError> {
        self.store.save(&self.to_snapshot()).await
    }

    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now()),
            conversation: self.conversation.turns().to_vec(),
            learning: self.tracker.state().clone(),
            embeddings: EmbeddingsSnapshot {
                cache: self.cache.to_pairs(),
                corpus: self.corpus.clone(),
            },
        }
    }

    async fn build_system_prompt(&mut self, input: &str, phase: LearningPhase) -> String {
        let persona = self.config.agent.system_prompt.as_deref();
        if phase == LearningPhase::Bootstrap {
            return prompt::system_prompt(persona, phase, LearnedHints::default());
        }

        let mut examples: Vec<String> = Vec::new();
        if !self.corpus.is_empty()
            && let Some(vector) = self.cache.get_or_compute(&*self.embedder, input).await
        {
            let threshold = self.config.learning.prompt_similarity_threshold;
            examples = rank_similar(&vector, &self.corpus, PROMPT_EXAMPLE_LIMIT)
                .into_iter()
                .filter(|s| s.similarity > threshold)
                .map(|s| s.entry.input.clone())
                .collect();
        }

        let patterns = self.tracker.research_patterns(PROMPT_PATTERN_LIMIT);
        let example_refs: Vec<&str> = examples.iter().map(String::as_str).collect();
        prompt::system_prompt(
            persona,
            phase,
            LearnedHints {
                research_patterns: &patterns,
                similar_queries: &example_refs,
            },
        )
    }

    async fn record_supervised(
        &mut self,
        input: &str,
        response: &str,
        timestamp: DateTime<Utc>,
    ) -> TurnLearning {
        let input_embedding = self.cache.get_or_compute(&*self.embedder, input).await;
        let response_embedding = self.cache.get_or_compute(&*self.embedder, response).await;
        let is_research_related = self.classify(input).await.is_accepted();

        if let Some(embedding) = input_embedding.clone() {
            self.push_corpus(ConversationEmbedding {
                input: input.to_string(),
                response: response.to_string(),
                embedding,
                timestamp,
                label: CorpusLabel::Supervised { is_research_related },
            });
        }

        self.tracker.record_supervised(SupervisedRecord {
            input: input.to_string(),
            response: response.to_string(),
            timestamp,
            feedback: None,
            is_research_related,
            input_embedding,
            response_embedding,
        });

        TurnLearning::Supervised {
            is_research_related,
            feedback: None,
        }
    }

    async fn record_unsupervised(
        &mut self,
        input: &str,
        response: &str,
        timestamp: DateTime<Utc>,
    ) -> TurnLearning {
        let input_embedding = self.cache.get_or_compute(&*self.embedder, input).await;
        let response_embedding = self.cache.get_or_compute(&*self.embedder, response).await;

        let semantic_similarity = input_embedding
            .as_deref()
            .map_or(0.0, |v| max_similarity(v, &self.corpus));
        let cluster = find_or_create_cluster(
            input_embedding.as_deref(),
            &self.corpus,
            self.config.learning.cluster_threshold,
            timestamp,
        );
        let features = extract_features(input);

        if let Some(embedding) = input_embedding.clone() {
            self.push_corpus(ConversationEmbedding {
                input: input.to_string(),
                response: response.to_string(),
                embedding,
                timestamp,
                label: CorpusLabel::Unsupervised {
                    cluster: cluster.clone(),
                },
            });
        }

        self.tracker.record_unsupervised(UnsupervisedRecord {
            input: input.to_string(),
            response: response.to_string(),
            timestamp,
            cluster: cluster.clone(),
            features,
            input_embedding,
            response_embedding,
            semantic_similarity,
        });

        TurnLearning::Unsupervised {
            cluster,
            features,
            semantic_similarity,
        }
    }

    fn push_corpus(&mut self, entry: ConversationEmbedding) {
        push_bounded(&mut self.corpus, entry, self.config.retention.max_corpus_entries);
    }
}
