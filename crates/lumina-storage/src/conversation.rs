// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only conversation log.

use lumina_core::ConversationTurn;
use lumina_core::retention::{push_bounded, truncate_oldest};

/// Ordered user/assistant turns, bounded to the newest `limit` entries.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
    limit: usize,
}

impl ConversationStore {
    pub fn new(mut turns: Vec<ConversationTurn>, limit: usize) -> Self {
        truncate_oldest(&mut turns, limit);
        Self { turns, limit }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        push_bounded(&mut self.turns, turn, self.limit);
    }

    /// Remove the newest turn. Used to roll back a user turn whose
    /// completion failed.
    pub fn pop(&mut self) -> Option<ConversationTurn> {
        self.turns.pop()
    }

    /// The newest `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
