// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lumina research assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Lumina configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LuminaConfig {
    /// Assistant identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Mistral API settings.
    #[serde(default)]
    pub mistral: MistralConfig,

    /// Snapshot location and legacy import.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Phase and similarity thresholds.
    #[serde(default)]
    pub learning: LearningConfig,

    /// Size bounds for in-memory collections.
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name shown in the shell banner.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Replaces the built-in research persona when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
        }
    }
}

fn default_agent_name() -> String {
    "lumina".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Mistral API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MistralConfig {
    /// API key. Falls back to the `MISTRAL_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for chat completions.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; the provider default applies when unset.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Per-request timeout for both endpoints.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.mistral.ai/v1".to_string()
}

fn default_chat_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_embedding_model() -> String {
    "mistral-embed".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the state snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Snapshot file name inside `data_dir`.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Directory searched for the legacy three-file layout.
    #[serde(default = "default_legacy_dir")]
    pub legacy_dir: String,

    /// Import legacy files when no snapshot exists yet.
    #[serde(default = "default_true")]
    pub import_legacy: bool,
}

impl StorageConfig {
    /// Full path of the snapshot file.
    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.state_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_file: default_state_file(),
            legacy_dir: default_legacy_dir(),
            import_legacy: default_true(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("lumina"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "lumina-data".to_string())
}

fn default_state_file() -> String {
    "lumina_state.json".to_string()
}

fn default_legacy_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Listening port. The conventional `PORT` variable overrides it.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lower console logging to warnings while serving.
    #[serde(default = "default_true")]
    pub quiet: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            quiet: default_true(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Heuristic learning thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LearningConfig {
    /// Interaction count at which the bootstrap phase ends.
    #[serde(default = "default_bootstrap_threshold")]
    pub bootstrap_threshold: u64,

    /// Number of recent turns included in the prompt.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Similarity above which a new turn joins an existing cluster.
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold: f32,

    /// Mean top-3 similarity above which a query is accepted.
    #[serde(default = "default_semantic_accept_threshold")]
    pub semantic_accept_threshold: f32,

    /// Minimum similarity for past queries quoted in the prompt.
    #[serde(default = "default_half")]
    pub prompt_similarity_threshold: f32,

    /// Minimum similarity for `search` results.
    #[serde(default = "default_half")]
    pub search_threshold: f32,

    /// Ask for feedback every N interactions during bootstrap.
    #[serde(default = "default_feedback_interval")]
    pub feedback_interval: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            bootstrap_threshold: default_bootstrap_threshold(),
            context_turns: default_context_turns(),
            cluster_threshold: default_cluster_threshold(),
            semantic_accept_threshold: default_semantic_accept_threshold(),
            prompt_similarity_threshold: default_half(),
            search_threshold: default_half(),
            feedback_interval: default_feedback_interval(),
        }
    }
}

fn default_bootstrap_threshold() -> u64 {
    50
}

fn default_context_turns() -> usize {
    10
}

fn default_cluster_threshold() -> f32 {
    0.75
}

fn default_semantic_accept_threshold() -> f32 {
    0.7
}

fn default_half() -> f32 {
    0.5
}

fn default_feedback_interval() -> u64 {
    5
}

/// Upper bounds on in-memory collections. Oldest entries go first.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    #[serde(default = "default_max_entries")]
    pub max_cache_entries: usize,

    #[serde(default = "default_max_entries")]
    pub max_corpus_entries: usize,

    /// Applies separately to supervised records, unsupervised records, and feedback.
    #[serde(default = "default_max_entries")]
    pub max_learning_records: usize,

    /// Learned topic shingles; oldest-inserted shingles are forgotten first.
    #[serde(default = "default_max_entries")]
    pub max_topic_patterns: usize,

    /// Response-quality entries keyed by input prefix.
    #[serde(default = "default_max_entries")]
    pub max_quality_entries: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            max_cache_entries: default_max_entries(),
            max_corpus_entries: default_max_entries(),
            max_learning_records: default_max_entries(),
            max_topic_patterns: default_max_entries(),
            max_quality_entries: default_max_entries(),
        }
    }
}

fn default_max_history_turns() -> usize {
    1000
}

fn default_max_entries() -> usize {
    5000
}
