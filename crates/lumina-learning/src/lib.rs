// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Learning tracker for the Lumina research assistant.
//!
//! The "learning" here is a set of documented heuristics, not statistical
//! learning: an interaction counter drives a one-way bootstrap to
//! steady-state transition, bootstrap turns label two-word shingles as
//! research-related or not, and steady-state turns record cheap lexical
//! features and a semantic cluster id.

pub mod features;
pub mod tracker;
pub mod types;

pub use features::{extract_features, topic_shingles};
pub use tracker::LearningTracker;
pub use types::*;
