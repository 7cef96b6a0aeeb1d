// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::LuminaConfig;

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &LuminaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!("server.host `{host}` is not a valid IP address or hostname"));
    }

    if config.server.port == 0 {
        fail("server.port must be between 1 and 65535".to_string());
    }

    if config.storage.data_dir.trim().is_empty() {
        fail("storage.data_dir must not be empty".to_string());
    }
    if config.storage.state_file.trim().is_empty() {
        fail("storage.state_file must not be empty".to_string());
    }

    if config.mistral.base_url.trim().is_empty() {
        fail("mistral.base_url must not be empty".to_string());
    }
    if config.mistral.request_timeout_secs == 0 {
        fail("mistral.request_timeout_secs must be positive".to_string());
    }
    if config.mistral.max_tokens == 0 {
        fail("mistral.max_tokens must be positive".to_string());
    }

    let learning = &config.learning;
    if !(0.0..=1.0).contains(&learning.cluster_threshold) {
        fail(format!(
            "learning.cluster_threshold must be within 0.0..=1.0, got {}",
            learning.cluster_threshold
        ));
    }
    for (name, value) in [
        ("semantic_accept_threshold", learning.semantic_accept_threshold),
        ("prompt_similarity_threshold", learning.prompt_similarity_threshold),
        ("search_threshold", learning.search_threshold),
    ] {
        if !(-1.0..=1.0).contains(&value) {
            fail(format!("learning.{name} must be within -1.0..=1.0, got {value}"));
        }
    }
    if learning.bootstrap_threshold == 0 {
        fail("learning.bootstrap_threshold must be positive".to_string());
    }
    if learning.context_turns == 0 {
        fail("learning.context_turns must be positive".to_string());
    }
    if learning.feedback_interval == 0 {
        fail("learning.feedback_interval must be positive".to_string());
    }

    let retention = &config.retention;
    for (name, value) in [
        ("max_history_turns", retention.max_history_turns),
        ("max_cache_entries", retention.max_cache_entries),
        ("max_corpus_entries", retention.max_corpus_entries),
        ("max_learning_records", retention.max_learning_records),
        ("max_topic_patterns", retention.max_topic_patterns),
        ("max_quality_entries", retention.max_quality_entries),
    ] {
        if value == 0 {
            fail(format!("retention.{name} must be positive"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &LuminaConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LuminaConfig::default()).is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = LuminaConfig::default();
        config.server.port = 0;
        assert!(messages(&config).iter().any(|m| m.contains("server.port")));
    }

    #[test]
    fn cluster_threshold_out_of_range() {
        let mut config = LuminaConfig::default();
        config.learning.cluster_threshold = 1.5;
        assert!(messages(&config).iter().any(|m| m.contains("cluster_threshold")));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = LuminaConfig::default();
        config.server.host = " ".to_string();
        config.storage.data_dir = String::new();
        config.retention.max_cache_entries = 0;
        let errors = messages(&config);
        assert_eq!(errors.len(), 3, "got {errors:?}");
    }

    #[test]
    fn hostname_with_invalid_characters_rejected() {
        let mut config = LuminaConfig::default();
        config.server.host = "local host!".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("server.host")));
    }
}
