// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query orchestration for the Lumina research assistant.
//!
//! [`AssistantSession`] owns the conversation, the learning tracker, the
//! embedding cache and the similarity corpus. It classifies each query,
//! builds the prompt, calls the completion provider, records what it
//! learned and persists the result.

pub mod prompt;
pub mod session;
pub mod shutdown;
pub mod validator;

pub use session::{AnsweredTurn, AssistantSession, SearchHit, SessionStats, TurnLearning, TurnOutcome};
pub use shutdown::{flush_on_shutdown, install_signal_handler};
pub use validator::{QueryClass, REJECTION_MESSAGE, is_greeting};
