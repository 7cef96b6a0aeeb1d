// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector embedding capability.

use async_trait::async_trait;

use crate::error::LuminaError;
use crate::traits::adapter::ProviderAdapter;

/// Adapter for converting text into an embedding vector.
#[async_trait]
pub trait EmbeddingProvider: ProviderAdapter {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LuminaError>;
}
