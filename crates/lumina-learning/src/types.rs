// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Learning records and aggregate state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Learning phase. The transition to `SteadyState` is one-way.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum LearningPhase {
    #[default]
    Bootstrap,
    SteadyState,
}

impl LearningPhase {
    /// Kind of record produced in this phase.
    pub fn record_kind(self) -> &'static str {
        match self {
            LearningPhase::Bootstrap => "supervised",
            LearningPhase::SteadyState => "unsupervised",
        }
    }
}

/// Cheap lexical features of a steady-state input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// Length in characters.
    pub length: usize,
    pub word_count: usize,
    pub has_question_words: bool,
    pub has_research_terms: bool,
    /// Number of pieces after splitting on sentence punctuation.
    pub complexity: usize,
}

/// A bootstrap-phase turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisedRecord {
    pub input: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub feedback: Option<String>,
    pub is_research_related: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_embedding: Option<Vec<f32>>,
}

/// A steady-state turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupervisedRecord {
    pub input: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub cluster: String,
    pub features: Features,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_embedding: Option<Vec<f32>>,
    /// Best similarity against the corpus before this turn was added.
    pub semantic_similarity: f32,
}

/// One accepted piece of user feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
    /// Input of the record the feedback was attached to.
    pub context: String,
}

/// Running response-length statistic for one input prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityStat {
    pub count: u64,
    /// Two-sample blend: `(avg_length + len) / 2`, not a true mean.
    pub avg_length: f64,
}

/// String-keyed map that remembers insertion order.
///
/// Rewriting a key keeps its original position (last write wins on the
/// value only). Serialized as a list of `[key, value]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "Vec<(String, V)>",
    into = "Vec<(String, V)>",
    bound(serialize = "V: Serialize + Clone", deserialize = "V: Deserialize<'de>")
)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

/// Shingle to research-label map.
pub type TopicPatterns = OrderedMap<bool>;

/// Input prefix to response-length statistic.
pub type ResponseQuality = OrderedMap<QualityStat>;

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn insert(&mut self, key: String, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Value for `key`, inserting `V::default()` at the back when absent.
    pub fn get_or_default(&mut self, key: String) -> &mut V
    where
        V: Default,
    {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, V::default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Drop the oldest-inserted keys so at most `limit` remain.
    pub fn truncate_oldest(&mut self, limit: usize) {
        let limit = limit.max(1);
        if self.entries.len() <= limit {
            return;
        }
        let excess = self.entries.len() - limit;
        self.entries.drain(..excess);
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.clone(), i))
            .collect();
    }
}

impl TopicPatterns {
    /// Research-flagged shingles in insertion order.
    pub fn research(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, is_research)| *is_research)
            .map(|(shingle, _)| shingle.as_str())
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> From<Vec<(String, V)>> for OrderedMap<V> {
    fn from(pairs: Vec<(String, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<V> From<OrderedMap<V>> for Vec<(String, V)> {
    fn from(map: OrderedMap<V>) -> Self {
        map.entries
    }
}

/// Everything the tracker persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningState {
    pub phase: LearningPhase,
    pub interaction_count: u64,
    pub supervised: Vec<SupervisedRecord>,
    pub unsupervised: Vec<UnsupervisedRecord>,
    pub feedback: Vec<FeedbackEntry>,
    pub topic_patterns: TopicPatterns,
    pub response_quality: ResponseQuality,
}

/// Counters reported by `stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub interactions: u64,
    pub phase: LearningPhase,
    pub supervised_records: usize,
    pub unsupervised_records: usize,
    pub learned_patterns: usize,
    pub feedback_received: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_and_serde() {
        assert_eq!(LearningPhase::SteadyState.to_string(), "steady-state");
        assert_eq!(
            serde_json::to_string(&LearningPhase::SteadyState).unwrap(),
            r#""steady_state""#
        );
        assert!(LearningPhase::SteadyState > LearningPhase::Bootstrap);
    }

    #[test]
    fn topic_patterns_last_write_wins_in_place() {
        let mut patterns = TopicPatterns::default();
        patterns.insert("quantum field".into(), true);
        patterns.insert("field theory".into(), false);
        patterns.insert("quantum field".into(), false);
        patterns.insert("field theory".into(), true);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns.get("quantum field"), Some(&false));
        assert_eq!(patterns.research().collect::<Vec<_>>(), vec!["field theory"]);
    }

    #[test]
    fn topic_patterns_serialize_as_ordered_pairs() {
        let mut patterns = TopicPatterns::default();
        patterns.insert("zeta alpha".into(), true);
        patterns.insert("alpha zeta".into(), false);
        let json = serde_json::to_string(&patterns).unwrap();
        assert_eq!(json, r#"[["zeta alpha",true],["alpha zeta",false]]"#);

        let back: TopicPatterns = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patterns);
    }

    #[test]
    fn truncate_oldest_keeps_lookup_consistent() {
        let mut quality: ResponseQuality = (0..5)
            .map(|i| (format!("prefix {i}"), QualityStat::default()))
            .collect();
        quality.truncate_oldest(2);

        let keys: Vec<&str> = quality.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["prefix 3", "prefix 4"]);
        assert!(quality.get("prefix 0").is_none());
        quality.get_or_default("prefix 4".to_string()).count = 7;
        assert_eq!(quality.get("prefix 4").map(|q| q.count), Some(7));
        assert_eq!(quality.len(), 2);
    }
}
