// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mistral AI provider for Lumina.
//!
//! One [`MistralProvider`] serves both the chat completion and the embedding
//! capability over the same HTTP client.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use lumina_config::LuminaConfig;
use lumina_core::{
    AdapterType, CompletionProvider, CompletionRequest, CompletionResponse, EmbeddingProvider,
    HealthStatus, LuminaError, ProviderAdapter, TokenUsage,
};
use tracing::{debug, info};

use crate::client::MistralClient;

/// Mistral provider implementing [`CompletionProvider`] and [`EmbeddingProvider`].
///
/// API key resolution order: config -> `MISTRAL_API_KEY` env var -> error.
pub struct MistralProvider {
    client: MistralClient,
    chat_model: String,
    embedding_model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl MistralProvider {
    /// Creates a provider from the `[mistral]` config section.
    pub fn new(config: &LuminaConfig) -> Result<Self, LuminaError> {
        let mistral = &config.mistral;
        let api_key = resolve_api_key(&mistral.api_key)?;
        let client = MistralClient::new(
            &api_key,
            &mistral.base_url,
            Duration::from_secs(mistral.request_timeout_secs),
        )?;

        info!(
            chat_model = mistral.chat_model,
            embedding_model = mistral.embedding_model,
            "Mistral provider initialized"
        );

        Ok(Self {
            client,
            chat_model: mistral.chat_model.clone(),
            embedding_model: mistral.embedding_model.clone(),
            max_tokens: mistral.max_tokens,
            temperature: mistral.temperature,
        })
    }
}

#[async_trait]
impl ProviderAdapter for MistralProvider {
    fn name(&self) -> &str {
        "mistral"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// Reports the completion role only. The same provider also serves
    /// embeddings through [`EmbeddingProvider`].
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, LuminaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for MistralProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LuminaError> {
        let body = MistralClient::chat_request(
            &self.chat_model,
            &request.system_prompt,
            &request.user_message,
            request.max_tokens.unwrap_or(self.max_tokens),
            self.temperature,
        );
        let response = self.client.chat(&body).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LuminaError::provider("chat response contained no choices"))?;

        debug!(model = response.model, chars = content.len(), "completion received");

        Ok(CompletionResponse {
            content,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for MistralProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LuminaError> {
        self.client.embed(&self.embedding_model, text).await
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, LuminaError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("MISTRAL_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            LuminaError::Config(
                "Mistral API key not found. Set mistral.api_key in config or MISTRAL_API_KEY environment variable.".into(),
            )
        })
}
