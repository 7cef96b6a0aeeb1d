// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the Lumina research assistant.
//!
//! All state lives in one JSON snapshot that is rewritten in full after
//! every processed turn. Writes go to a temporary file that is renamed over
//! the target, so a crash leaves either the old snapshot or the new one.
//! The three-file layout written by earlier releases is imported on first
//! start.

pub mod conversation;
pub mod legacy;
pub mod snapshot;

pub use conversation::ConversationStore;
pub use snapshot::{EmbeddingsSnapshot, SnapshotStore, StateSnapshot, load_state};
