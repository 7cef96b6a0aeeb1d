// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup loading: snapshot, legacy import, and cold start.

use lumina_config::model::StorageConfig;
use lumina_learning::LearningPhase;
use lumina_memory::CorpusLabel;
use lumina_storage::{SnapshotStore, StateSnapshot, load_state};

const LEARNING: &str = r#"{
  "learningData": {
    "supervised": [
      {
        "input": "What is machine learning?",
        "response": "A field of study.",
        "timestamp": "2024-05-01T12:00:00.000Z",
        "feedback": null,
        "userFeedback": "yes",
        "isResearchRelated": true,
        "inputEmbedding": [0.1, 0.2],
        "responseEmbedding": null
      }
    ],
    "unsupervised": [
      {
        "input": "Explain protein folding",
        "response": "Proteins fold.",
        "timestamp": "2024-05-02T08:30:00.000Z",
        "cluster": "semantic_cluster_1714638600000",
        "patterns": {
          "length": 23,
          "wordCount": 3,
          "hasQuestionWords": false,
          "hasResearchTerms": false,
          "complexity": 1
        },
        "inputEmbedding": [0.3, 0.4],
        "responseEmbedding": [0.5, 0.6],
        "semanticSimilarity": 0.42
      }
    ]
  },
  "userFeedback": [
    { "feedback": "yes", "timestamp": "2024-05-01T12:01:00.000Z", "context": "What is machine learning?" }
  ],
  "topicPatterns": [["machine learning?", true], ["explain protein", true]],
  "responseQuality": [["Explain protein folding", { "count": 1, "avgLength": 7 }]],
  "interactionCount": 51,
  "learningPhase": "unsupervised"
}"#;

const HISTORY: &str = r#"[
  { "role": "user", "content": "What is machine learning?" },
  { "role": "assistant", "content": "A field of study." }
]"#;

const EMBEDDINGS: &str = r#"{
  "embeddingsCache": [["What is machine learning?", [0.1, 0.2]]],
  "conversationEmbeddings": [
    {
      "input": "What is machine learning?",
      "response": "A field of study.",
      "embedding": [0.1, 0.2],
      "timestamp": "2024-05-01T12:00:00.000Z",
      "isResearchRelated": true
    },
    {
      "input": "Explain protein folding",
      "response": "Proteins fold.",
      "embedding": [0.3, 0.4],
      "timestamp": "2024-05-02T08:30:00.000Z",
      "cluster": "semantic_cluster_1714638600000"
    }
  ]
}"#;

fn storage_config(data_dir: &std::path::Path, legacy_dir: &std::path::Path) -> StorageConfig {
    StorageConfig {
        data_dir: data_dir.display().to_string(),
        legacy_dir: legacy_dir.display().to_string(),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn imports_all_three_legacy_files() {
    let data = tempfile::tempdir().unwrap();
    let legacy = tempfile::tempdir().unwrap();
    std::fs::write(legacy.path().join("learning_data.json"), LEARNING).unwrap();
    std::fs::write(legacy.path().join("conversation_history.json"), HISTORY).unwrap();
    std::fs::write(legacy.path().join("embeddings_cache.json"), EMBEDDINGS).unwrap();

    let config = storage_config(data.path(), legacy.path());
    let state = load_state(&SnapshotStore::from_config(&config), &config).await;

    assert_eq!(state.conversation.len(), 2);
    assert_eq!(state.learning.interaction_count, 51);
    assert_eq!(state.learning.phase, LearningPhase::SteadyState);
    assert_eq!(state.learning.supervised[0].feedback.as_deref(), Some("yes"));
    assert_eq!(state.learning.unsupervised[0].features.word_count, 3);
    assert_eq!(state.learning.feedback.len(), 1);
    assert_eq!(state.learning.topic_patterns.len(), 2);
    let quality = state.learning.response_quality.get("Explain protein folding").unwrap();
    assert_eq!(quality.avg_length, 7.0);
    assert_eq!(state.embeddings.cache.len(), 1);
    assert_eq!(state.embeddings.corpus.len(), 2);
    assert!(matches!(
        state.embeddings.corpus[0].label,
        CorpusLabel::Supervised { is_research_related: true }
    ));
    assert_eq!(
        state.embeddings.corpus[1].cluster(),
        Some("semantic_cluster_1714638600000")
    );
}

#[tokio::test]
async fn malformed_legacy_file_is_skipped() {
    let data = tempfile::tempdir().unwrap();
    let legacy = tempfile::tempdir().unwrap();
    std::fs::write(legacy.path().join("learning_data.json"), "{ broken").unwrap();
    std::fs::write(legacy.path().join("conversation_history.json"), HISTORY).unwrap();

    let config = storage_config(data.path(), legacy.path());
    let state = load_state(&SnapshotStore::from_config(&config), &config).await;

    assert_eq!(state.conversation.len(), 2);
    assert_eq!(state.learning.interaction_count, 0);
    assert_eq!(state.learning.phase, LearningPhase::Bootstrap);
}

#[tokio::test]
async fn snapshot_takes_precedence_over_legacy() {
    let data = tempfile::tempdir().unwrap();
    let legacy = tempfile::tempdir().unwrap();
    std::fs::write(legacy.path().join("conversation_history.json"), HISTORY).unwrap();

    let config = storage_config(data.path(), legacy.path());
    let store = SnapshotStore::from_config(&config);
    let mut snapshot = StateSnapshot::default();
    snapshot.learning.interaction_count = 7;
    store.save(&snapshot).await.unwrap();

    let state = load_state(&store, &config).await;
    assert_eq!(state.learning.interaction_count, 7);
    assert!(state.conversation.is_empty());
}

#[tokio::test]
async fn import_can_be_disabled() {
    let data = tempfile::tempdir().unwrap();
    let legacy = tempfile::tempdir().unwrap();
    std::fs::write(legacy.path().join("conversation_history.json"), HISTORY).unwrap();

    let mut config = storage_config(data.path(), legacy.path());
    config.import_legacy = false;
    let state = load_state(&SnapshotStore::from_config(&config), &config).await;
    assert_eq!(state, StateSnapshot::default());
}

#[tokio::test]
async fn empty_directories_cold_start() {
    let data = tempfile::tempdir().unwrap();
    let legacy = tempfile::tempdir().unwrap();
    let config = storage_config(data.path(), legacy.path());
    let state = load_state(&SnapshotStore::from_config(&config), &config).await;
    assert_eq!(state, StateSnapshot::default());
}
