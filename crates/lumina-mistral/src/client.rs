// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Mistral REST API.
//!
//! Handles bearer authentication, per-request timeouts, and a single retry
//! on transient errors (429, 500, 502, 503).

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use lumina_core::LuminaError;

use crate::types::{
    ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
};

/// Delay before the single retry of a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MistralClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    timeout: Duration,
}

impl MistralClient {
    /// Creates a client for `base_url` (e.g. `https://api.mistral.ai/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, LuminaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| LuminaError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LuminaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            timeout,
        })
    }

    /// `POST /chat/completions`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LuminaError> {
        self.post_json("chat/completions", request).await
    }

    /// `POST /embeddings` for a single text.
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, LuminaError> {
        let request = EmbeddingRequest {
            model: model.to_string(),
            input: vec![text.to_string()],
        };
        let response: EmbeddingResponse = self.post_json("embeddings", &request).await?;
        response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| LuminaError::provider("embedding response contained no vectors"))
    }

    /// Build a two-message chat request.
    pub fn chat_request(
        model: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens,
            temperature,
        }
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp, LuminaError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| self.transport_error(e))?;
                return serde_json::from_str(&text).map_err(|e| LuminaError::Provider {
                    message: format!("failed to parse {endpoint} response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let text = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(LuminaError::provider(format!("API returned {status}: {text}")));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => format!("Mistral API error ({status}): {}", api_err.describe()),
                Err(_) => format!("API returned {status}: {text}"),
            };
            return Err(LuminaError::provider(message));
        }

        Err(last_error.unwrap_or_else(|| LuminaError::provider("request failed after retries")))
    }

    fn transport_error(&self, e: reqwest::Error) -> LuminaError {
        if e.is_timeout() {
            return LuminaError::Timeout {
                duration: self.timeout,
            };
        }
        LuminaError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

/// Returns true for HTTP status codes worth one retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> MistralClient {
        MistralClient::new("test-api-key", base_url, Duration::from_secs(5)).unwrap()
    }

    fn chat_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "model": "mistral-small-latest",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        })
    }

    fn request() -> ChatRequest {
        MistralClient::chat_request("mistral-small-latest", "be brief", "hello", 64, None)
    }

    #[tokio::test]
    async fn chat_success_sends_bearer_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "mistral-small-latest",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Hi!")))
            .expect(1)
            .mount(&server)
            .await;

        let response = test_client(&server.uri()).chat(&request()).await.unwrap();
        assert_eq!(response.choices[0].message.content, "Hi!");
        assert_eq!(response.usage.unwrap().prompt_tokens, 12);
    }

    #[tokio::test]
    async fn chat_retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("after retry")))
            .mount(&server)
            .await;

        let response = test_client(&server.uri()).chat(&request()).await.unwrap();
        assert_eq!(response.choices[0].message.content, "after retry");
    }

    #[tokio::test]
    async fn chat_exhausts_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "object": "error",
                "message": "Service overloaded",
                "type": "service_unavailable"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).chat(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Service overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn chat_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Unauthorized",
                "request_id": "abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).chat(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Unauthorized"), "got: {err}");
    }

    #[tokio::test]
    async fn embed_returns_first_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({
                "model": "mistral-embed",
                "input": ["what is entropy"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "emb-1",
                "object": "list",
                "model": "mistral-embed",
                "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5, 1.0]}]
            })))
            .mount(&server)
            .await;

        let vector = test_client(&server.uri())
            .embed("mistral-embed", "what is entropy")
            .await
            .unwrap();
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn empty_embedding_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).embed("mistral-embed", "x").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn slow_server_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            MistralClient::new("k", &server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.chat(&request()).await.unwrap_err();
        assert!(matches!(err, LuminaError::Timeout { .. }), "got: {err}");
    }
}
