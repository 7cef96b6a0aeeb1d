// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prefix-keyed embedding cache.
//!
//! The key is the first [`CACHE_KEY_CHARS`] characters of the text, not a
//! hash of the full content: two long texts sharing that prefix alias to
//! the same vector. Entries are evicted oldest-first once the configured
//! capacity is exceeded.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use lumina_core::EmbeddingProvider;

/// Number of leading characters used as the cache key.
pub const CACHE_KEY_CHARS: usize = 100;

/// Derive the cache key for `text`.
pub fn cache_key(text: &str) -> String {
    text.chars().take(CACHE_KEY_CHARS).collect()
}

/// Memoizes embedding vectors to avoid repeated remote calls.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    entries: HashMap<String, Vec<f32>>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
    capacity: usize,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild a cache from persisted `(key, vector)` pairs, oldest first.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Vec<f32>)>, capacity: usize) -> Self {
        let mut cache = Self::new(capacity);
        for (key, vector) in pairs {
            cache.insert_key(key, vector);
        }
        cache
    }

    /// Entries as `(key, vector)` pairs, oldest first.
    pub fn to_pairs(&self) -> Vec<(String, Vec<f32>)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|v| (key.clone(), v.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached vector for `text`, without calling the provider.
    pub fn get(&self, text: &str) -> Option<&Vec<f32>> {
        self.entries.get(&cache_key(text))
    }

    /// Store a vector for `text` under its prefix key.
    pub fn insert(&mut self, text: &str, vector: Vec<f32>) {
        self.insert_key(cache_key(text), vector);
    }

    /// Return the cached vector for `text`, or embed it remotely.
    ///
    /// Provider failures are logged and yield `None`; nothing is cached, so
    /// a later call for the same text retries.
    pub async fn get_or_compute(
        &mut self,
        embedder: &dyn EmbeddingProvider,
        text: &str,
    ) -> Option<Vec<f32>> {
        let key = cache_key(text);
        if let Some(vector) = self.entries.get(&key) {
            debug!(key_chars = key.chars().count(), "embedding cache hit");
            return Some(vector.clone());
        }

        match embedder.embed(text).await {
            Ok(vector) => {
                self.insert_key(key, vector.clone());
                Some(vector)
            }
            Err(e) => {
                warn!(error = %e, "embedding request failed, continuing without vector");
                None
            }
        }
    }

    fn insert_key(&mut self, key: String, vector: Vec<f32>) {
        if self.entries.insert(key.clone(), vector).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}
