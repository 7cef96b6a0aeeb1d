// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lumina integration tests.
//!
//! Deterministic stand-ins for the remote Mistral endpoints so the
//! orchestrator can be exercised without network access.
//!
//! - [`MockProvider`] - completion provider with queued responses
//! - [`MockEmbedder`] - embedding provider with keyword-pinned vectors

pub mod mock_embedder;
pub mod mock_provider;

pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
