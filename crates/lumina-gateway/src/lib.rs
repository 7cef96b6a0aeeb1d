// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Lumina research assistant.
//!
//! Serves one shared [`AssistantSession`](lumina_agent::AssistantSession)
//! over axum. Requests are serialized on the session lock.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, router, start_server};
