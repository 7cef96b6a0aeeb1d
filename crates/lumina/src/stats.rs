// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumina stats` command implementation.
//!
//! Reads the saved state and prints learning statistics. Never contacts the
//! provider and never writes the snapshot.

use lumina_agent::SessionStats;
use lumina_config::LuminaConfig;
use lumina_core::LuminaError;
use lumina_storage::{SnapshotStore, load_state};

use crate::render;

/// Stats of whatever state a session would start from.
pub async fn collect_stats(config: &LuminaConfig) -> SessionStats {
    let store = SnapshotStore::from_config(&config.storage);
    let snapshot = load_state(&store, &config.storage).await;
    SessionStats::from_snapshot(&snapshot, config)
}

pub async fn run_stats(config: &LuminaConfig, json: bool) -> Result<(), LuminaError> {
    let stats = collect_stats(config).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render::stats(&stats));
    }
    Ok(())
}
