// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lumina research assistant.
//!
//! Holds the error type, the conversation and completion types, and the
//! traits that every remote provider implements.

pub mod error;
pub mod retention;
pub mod traits;
pub mod types;

pub use error::LuminaError;
pub use types::{
    AdapterType, CompletionRequest, CompletionResponse, ConversationTurn, HealthStatus, Role,
    TokenUsage,
};

pub use traits::{CompletionProvider, EmbeddingProvider, ProviderAdapter};
