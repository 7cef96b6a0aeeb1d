// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text generation capability.

use async_trait::async_trait;

use crate::error::LuminaError;
use crate::traits::adapter::ProviderAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for chat-completion style LLM endpoints.
///
/// Failures propagate to the caller unchanged.
#[async_trait]
pub trait CompletionProvider: ProviderAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, LuminaError>;
}
