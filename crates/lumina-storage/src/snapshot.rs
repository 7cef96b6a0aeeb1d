// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-file state snapshot with atomic replace.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lumina_config::model::StorageConfig;
use lumina_core::{ConversationTurn, LuminaError};
use lumina_learning::LearningState;
use lumina_memory::ConversationEmbedding;

use crate::legacy;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Embedding cache entries and the searchable corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsSnapshot {
    /// `(prefix key, vector)` pairs, oldest first.
    pub cache: Vec<(String, Vec<f32>)>,
    pub corpus: Vec<ConversationEmbedding>,
}

/// Everything the assistant persists, written as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    pub conversation: Vec<ConversationTurn>,
    pub learning: LearningState,
    pub embeddings: EmbeddingsSnapshot,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            conversation: Vec::new(),
            learning: LearningState::default(),
            embeddings: EmbeddingsSnapshot::default(),
        }
    }
}

/// Reads and atomically replaces the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Load the snapshot. `Ok(None)` means there is no snapshot yet.
    ///
    /// An unparseable snapshot is moved aside to `<file>.corrupt` and
    /// reported as missing so the caller cold-starts.
    pub async fn load(&self) -> Result<Option<StateSnapshot>, LuminaError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LuminaError::storage(e)),
        };

        match serde_json::from_slice::<StateSnapshot>(&bytes) {
            Ok(snapshot) => {
                debug!(path = %self.path.display(), "snapshot loaded");
                Ok(Some(snapshot))
            }
            Err(e) => {
                let backup = self.sibling(".corrupt");
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "snapshot is corrupt, moving it aside"
                );
                tokio::fs::rename(&self.path, &backup).await?;
                Ok(None)
            }
        }
    }

    /// Write the snapshot to a temporary sibling, then rename it into place.
    pub async fn save(&self, snapshot: &StateSnapshot) -> Result<(), LuminaError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.sibling(".tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "snapshot saved");
        Ok(())
    }
}

/// Load persisted state for startup. Never fails.
///
/// Order: snapshot file, then (when enabled) the legacy three-file layout,
/// then an empty state.
pub async fn load_state(store: &SnapshotStore, config: &StorageConfig) -> StateSnapshot {
    match store.load().await {
        Ok(Some(snapshot)) => return snapshot,
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "could not read snapshot, starting fresh");
            return StateSnapshot::default();
        }
    }

    if config.import_legacy
        && let Some(snapshot) = legacy::import(Path::new(&config.legacy_dir)).await
    {
        info!(
            dir = %config.legacy_dir,
            interactions = snapshot.learning.interaction_count,
            turns = snapshot.conversation.len(),
            "imported legacy state files"
        );
        return snapshot;
    }

    info!("no prior state, starting fresh");
    StateSnapshot::default()
}
