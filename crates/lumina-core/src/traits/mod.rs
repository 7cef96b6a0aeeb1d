// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote capability traits.
//!
//! Both capabilities extend the [`ProviderAdapter`] base trait and use
//! `#[async_trait]` so they can be held as trait objects.

pub mod adapter;
pub mod completion;
pub mod embedding;

pub use adapter::ProviderAdapter;
pub use completion::CompletionProvider;
pub use embedding::EmbeddingProvider;
