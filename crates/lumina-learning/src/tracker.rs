// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phase tracking and record keeping.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use lumina_config::model::{LearningConfig, RetentionConfig};
use lumina_core::retention::{push_bounded, truncate_oldest};

use crate::features::topic_shingles;
use crate::types::{
    FeedbackEntry, LearningPhase, LearningState, LearningStats, SupervisedRecord,
    UnsupervisedRecord,
};

/// Accepted feedback words, compared case-insensitively.
pub const FEEDBACK_VOCABULARY: &[&str] = &["yes", "no", "good", "bad", "helpful", "not helpful"];

/// Number of leading characters keying the response-quality map.
const QUALITY_KEY_CHARS: usize = 50;

/// Owns the learning state and applies the phase rules to it.
#[derive(Debug, Clone)]
pub struct LearningTracker {
    state: LearningState,
    bootstrap_threshold: u64,
    feedback_interval: u64,
    record_limit: usize,
    pattern_limit: usize,
    quality_limit: usize,
}

impl LearningTracker {
    /// Wrap persisted state. A counter already past the threshold forces the
    /// steady-state phase; a persisted steady-state phase is never reverted.
    ///
    /// Loaded collections larger than the retention limits are cut down to
    /// their newest entries.
    pub fn new(
        mut state: LearningState,
        learning: &LearningConfig,
        retention: &RetentionConfig,
    ) -> Self {
        if state.interaction_count >= learning.bootstrap_threshold {
            state.phase = LearningPhase::SteadyState;
        }
        let record_limit = retention.max_learning_records;
        truncate_oldest(&mut state.supervised, record_limit);
        truncate_oldest(&mut state.unsupervised, record_limit);
        truncate_oldest(&mut state.feedback, record_limit);
        state.topic_patterns.truncate_oldest(retention.max_topic_patterns);
        state.response_quality.truncate_oldest(retention.max_quality_entries);

        Self {
            state,
            bootstrap_threshold: learning.bootstrap_threshold,
            feedback_interval: learning.feedback_interval.max(1),
            record_limit,
            pattern_limit: retention.max_topic_patterns,
            quality_limit: retention.max_quality_entries,
        }
    }

    pub fn phase(&self) -> LearningPhase {
        self.state.phase
    }

    pub fn interaction_count(&self) -> u64 {
        self.state.interaction_count
    }

    pub fn state(&self) -> &LearningState {
        &self.state
    }

    /// Count a new interaction. Returns `true` when this call switched the
    /// tracker into the steady-state phase.
    pub fn begin_interaction(&mut self) -> bool {
        self.state.interaction_count += 1;
        if self.state.phase == LearningPhase::Bootstrap
            && self.state.interaction_count >= self.bootstrap_threshold
        {
            self.state.phase = LearningPhase::SteadyState;
            info!(
                interactions = self.state.interaction_count,
                "switched to steady-state learning"
            );
            return true;
        }
        false
    }

    /// Whether the shell should prompt for feedback after this turn.
    pub fn feedback_due(&self) -> bool {
        self.state.phase == LearningPhase::Bootstrap
            && self.state.interaction_count % self.feedback_interval == 0
    }

    /// Store a bootstrap record and label the input's shingles with its verdict.
    pub fn record_supervised(&mut self, record: SupervisedRecord) {
        for shingle in topic_shingles(&record.input) {
            self.state
                .topic_patterns
                .insert(shingle, record.is_research_related);
        }
        self.state.topic_patterns.truncate_oldest(self.pattern_limit);
        debug!(
            research = record.is_research_related,
            patterns = self.state.topic_patterns.len(),
            "supervised record collected"
        );
        push_bounded(&mut self.state.supervised, record, self.record_limit);
    }

    /// Store a steady-state record and update the response-quality statistic.
    pub fn record_unsupervised(&mut self, record: UnsupervisedRecord) {
        let key: String = record.input.chars().take(QUALITY_KEY_CHARS).collect();
        let stat = self.state.response_quality.get_or_default(key);
        stat.count += 1;
        stat.avg_length = (stat.avg_length + record.response.chars().count() as f64) / 2.0;
        self.state.response_quality.truncate_oldest(self.quality_limit);

        debug!(cluster = %record.cluster, "unsupervised record collected");
        push_bounded(&mut self.state.unsupervised, record, self.record_limit);
    }

    /// Attach feedback to the latest supervised record.
    ///
    /// Only exact (case-insensitive, trimmed) vocabulary words count. Returns
    /// `false` without side effects for any other text, or when there is no
    /// supervised record yet.
    pub fn handle_feedback(&mut self, text: &str, now: DateTime<Utc>) -> bool {
        let feedback = text.trim();
        let lowered = feedback.to_lowercase();
        if !FEEDBACK_VOCABULARY.contains(&lowered.as_str()) {
            return false;
        }
        let Some(last) = self.state.supervised.last_mut() else {
            return false;
        };

        last.feedback = Some(feedback.to_string());
        let entry = FeedbackEntry {
            feedback: feedback.to_string(),
            timestamp: now,
            context: last.input.clone(),
        };
        push_bounded(&mut self.state.feedback, entry, self.record_limit);
        info!(feedback = %lowered, "feedback recorded");
        true
    }

    /// Up to `limit` research-flagged shingles, in insertion order.
    pub fn research_patterns(&self, limit: usize) -> Vec<&str> {
        self.state.topic_patterns.research().take(limit).collect()
    }

    /// First research-flagged shingle contained in the lowercased query.
    pub fn matching_research_pattern(&self, query_lower: &str) -> Option<&str> {
        self.state
            .topic_patterns
            .research()
            .find(|shingle| query_lower.contains(shingle))
    }

    pub fn stats(&self) -> LearningStats {
        LearningStats {
            interactions: self.state.interaction_count,
            phase: self.state.phase,
            supervised_records: self.state.supervised.len(),
            unsupervised_records: self.state.unsupervised.len(),
            learned_patterns: self.state.topic_patterns.len(),
            feedback_received: self.state.feedback.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;

    fn tracker_with(state: LearningState, threshold: u64) -> LearningTracker {
        let learning = LearningConfig {
            bootstrap_threshold: threshold,
            ..LearningConfig::default()
        };
        LearningTracker::new(state, &learning, &RetentionConfig::default())
    }

    fn supervised(input: &str, research: bool) -> SupervisedRecord {
        SupervisedRecord {
            input: input.to_string(),
            response: "response".to_string(),
            timestamp: Utc::now(),
            feedback: None,
            is_research_related: research,
            input_embedding: None,
            response_embedding: None,
        }
    }

    fn unsupervised(input: &str, response: &str) -> UnsupervisedRecord {
        UnsupervisedRecord {
            input: input.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
            cluster: "cluster_1".to_string(),
            features: extract_features(input),
            input_embedding: None,
            response_embedding: None,
            semantic_similarity: 0.0,
        }
    }

    #[test]
    fn transitions_once_at_threshold() {
        let mut tracker = tracker_with(LearningState::default(), 3);
        assert!(!tracker.begin_interaction());
        assert!(!tracker.begin_interaction());
        assert!(tracker.begin_interaction());
        assert_eq!(tracker.phase(), LearningPhase::SteadyState);
        for _ in 0..10 {
            assert!(!tracker.begin_interaction());
            assert_eq!(tracker.phase(), LearningPhase::SteadyState);
        }
    }

    #[test]
    fn loaded_counter_past_threshold_forces_steady_state() {
        let state = LearningState {
            interaction_count: 50,
            ..LearningState::default()
        };
        assert_eq!(tracker_with(state, 50).phase(), LearningPhase::SteadyState);
    }

    #[test]
    fn persisted_steady_state_never_reverts() {
        let state = LearningState {
            phase: LearningPhase::SteadyState,
            interaction_count: 2,
            ..LearningState::default()
        };
        let mut tracker = tracker_with(state, 50);
        tracker.begin_interaction();
        assert_eq!(tracker.phase(), LearningPhase::SteadyState);
    }

    #[test]
    fn feedback_due_every_fifth_bootstrap_interaction() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        let due: Vec<bool> = (0..10)
            .map(|_| {
                tracker.begin_interaction();
                tracker.feedback_due()
            })
            .collect();
        assert_eq!(due.iter().filter(|d| **d).count(), 2);
        assert!(due[4] && due[9]);
    }

    #[test]
    fn supervised_record_labels_shingles() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        tracker.record_supervised(supervised("explain protein folding dynamics", true));
        tracker.record_supervised(supervised("cheap pizza delivery", false));

        assert_eq!(
            tracker.research_patterns(10),
            vec!["explain protein", "protein folding", "folding dynamics"]
        );
        assert_eq!(
            tracker.matching_research_pattern("tell me about protein folding"),
            Some("protein folding")
        );
        assert_eq!(tracker.matching_research_pattern("cheap pizza delivery"), None);
    }

    #[test]
    fn response_quality_is_two_sample_blend() {
        let mut tracker = tracker_with(LearningState::default(), 1);
        tracker.record_unsupervised(unsupervised("same prefix", &"x".repeat(100)));
        tracker.record_unsupervised(unsupervised("same prefix", &"x".repeat(20)));

        let stat = tracker.state().response_quality.get("same prefix").unwrap();
        assert_eq!(stat.count, 2);
        assert_eq!(stat.avg_length, 35.0);
    }

    #[test]
    fn feedback_attaches_to_latest_supervised_record() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        tracker.record_supervised(supervised("first question", true));
        tracker.record_supervised(supervised("second question", true));

        assert!(tracker.handle_feedback("  Helpful ", Utc::now()));
        let state = tracker.state();
        assert_eq!(state.supervised[1].feedback.as_deref(), Some("Helpful"));
        assert_eq!(state.supervised[0].feedback, None);
        assert_eq!(state.feedback.len(), 1);
        assert_eq!(state.feedback[0].context, "second question");
    }

    #[test]
    fn feedback_without_record_has_no_effect() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        assert!(!tracker.handle_feedback("yes", Utc::now()));
        assert!(tracker.state().feedback.is_empty());
    }

    #[test]
    fn free_text_is_not_feedback() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        tracker.record_supervised(supervised("question", true));
        let before = tracker.state().clone();

        assert!(!tracker.handle_feedback("yes please explain more", Utc::now()));
        assert!(!tracker.handle_feedback("not", Utc::now()));
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn records_respect_retention_limit() {
        let retention = RetentionConfig {
            max_learning_records: 2,
            ..RetentionConfig::default()
        };
        let mut tracker =
            LearningTracker::new(LearningState::default(), &LearningConfig::default(), &retention);
        for i in 0..5 {
            tracker.record_supervised(supervised(&format!("question {i}"), true));
        }
        let inputs: Vec<&str> = tracker
            .state()
            .supervised
            .iter()
            .map(|r| r.input.as_str())
            .collect();
        assert_eq!(inputs, vec!["question 3", "question 4"]);
    }

    #[test]
    fn learned_maps_respect_retention_limits() {
        let retention = RetentionConfig {
            max_learning_records: 2,
            max_topic_patterns: 4,
            max_quality_entries: 3,
            ..RetentionConfig::default()
        };
        let mut tracker =
            LearningTracker::new(LearningState::default(), &LearningConfig::default(), &retention);
        for i in 0..200 {
            tracker.record_supervised(supervised(&format!("alpha{i} beta{i} gamma{i}"), true));
            tracker.record_unsupervised(unsupervised(&format!("distinct input {i}"), "answer"));
        }

        let state = tracker.state();
        assert_eq!(state.supervised.len(), 2);
        assert_eq!(state.unsupervised.len(), 2);
        assert_eq!(state.topic_patterns.len(), 4);
        assert_eq!(state.response_quality.len(), 3);
        assert_eq!(
            tracker.research_patterns(10),
            vec!["alpha198 beta198", "beta198 gamma198", "alpha199 beta199", "beta199 gamma199"]
        );
        assert!(state.response_quality.get("distinct input 199").is_some());
        assert!(state.response_quality.get("distinct input 196").is_none());
    }

    #[test]
    fn oversized_loaded_state_is_trimmed() {
        let state = LearningState {
            supervised: (0..5).map(|i| supervised(&format!("question {i}"), true)).collect(),
            unsupervised: (0..5).map(|i| unsupervised(&format!("input {i}"), "a")).collect(),
            feedback: (0..5)
                .map(|i| FeedbackEntry {
                    feedback: "yes".to_string(),
                    timestamp: Utc::now(),
                    context: format!("question {i}"),
                })
                .collect(),
            topic_patterns: (0..5).map(|i| (format!("shingle {i}"), true)).collect(),
            ..LearningState::default()
        };
        let retention = RetentionConfig {
            max_learning_records: 2,
            max_topic_patterns: 3,
            ..RetentionConfig::default()
        };
        let tracker = LearningTracker::new(state, &LearningConfig::default(), &retention);

        let state = tracker.state();
        assert_eq!(state.supervised.len(), 2);
        assert_eq!(state.supervised[0].input, "question 3");
        assert_eq!(state.unsupervised.len(), 2);
        assert_eq!(state.feedback.len(), 2);
        assert_eq!(tracker.research_patterns(10), vec!["shingle 2", "shingle 3", "shingle 4"]);
    }

    #[test]
    fn stats_reflect_state() {
        let mut tracker = tracker_with(LearningState::default(), 50);
        tracker.begin_interaction();
        tracker.record_supervised(supervised("research methods overview", true));
        tracker.handle_feedback("good", Utc::now());

        let stats = tracker.stats();
        assert_eq!(stats.interactions, 1);
        assert_eq!(stats.phase, LearningPhase::Bootstrap);
        assert_eq!(stats.supervised_records, 1);
        assert_eq!(stats.unsupervised_records, 0);
        assert_eq!(stats.learned_patterns, 2);
        assert_eq!(stats.feedback_received, 1);
    }

    #[tracing_test::traced_test]
    #[test]
    fn transition_is_logged() {
        let mut tracker = tracker_with(LearningState::default(), 1);
        tracker.begin_interaction();
        assert!(logs_contain("switched to steady-state learning"));
    }
}
