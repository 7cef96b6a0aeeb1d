// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding provider with deterministic vectors.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use lumina_core::{AdapterType, EmbeddingProvider, HealthStatus, LuminaError, ProviderAdapter};

/// Dimension of generated vectors.
pub const MOCK_DIMENSIONS: usize = 8;

/// An embedding provider that never touches the network.
///
/// Texts containing a pinned keyword get that keyword's vector (first match
/// wins). Other texts get a character-histogram vector, so identical texts
/// always embed identically.
#[derive(Default)]
pub struct MockEmbedder {
    pinned: Mutex<Vec<(String, Vec<f32>)>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `vector` for every text containing `keyword`.
    pub fn with_keyword(mut self, keyword: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.get_mut().push((keyword.into(), vector));
        self
    }

    /// Make every subsequent `embed` call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn histogram(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; MOCK_DIMENSIONS];
        for c in text.chars() {
            vector[c as usize % MOCK_DIMENSIONS] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl ProviderAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, LuminaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LuminaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LuminaError::provider("mock embedder unavailable"));
        }
        let pinned = self.pinned.lock().await;
        let vector = pinned
            .iter()
            .find(|(keyword, _)| text.contains(keyword.as_str()))
            .map(|(_, vector)| vector.clone())
            .unwrap_or_else(|| Self::histogram(text));
        Ok(vector)
    }
}
