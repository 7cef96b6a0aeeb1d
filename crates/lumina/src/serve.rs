// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lumina serve` command implementation.
//!
//! Loads state once, shares a single session behind a mutex, serves the
//! HTTP gateway until SIGINT/SIGTERM, then flushes the snapshot.

use std::sync::Arc;

use lumina_agent::{AssistantSession, flush_on_shutdown, install_signal_handler};
use lumina_config::LuminaConfig;
use lumina_core::LuminaError;
use lumina_gateway::GatewayState;
use lumina_mistral::MistralProvider;
use tokio::sync::Mutex;
use tracing::info;

pub async fn run_serve(config: LuminaConfig) -> Result<(), LuminaError> {
    info!("starting lumina serve");

    let provider = Arc::new(MistralProvider::new(&config)?);
    let server_config = config.server.clone();
    let session = AssistantSession::initialize(config, provider.clone(), provider).await;
    let session = Arc::new(Mutex::new(session));

    let shutdown = install_signal_handler();
    let state = GatewayState::new(session.clone());

    println!(
        "Server is running on http://{}:{}",
        server_config.host, server_config.port
    );
    let served = lumina_gateway::start_server(&server_config, state, shutdown).await;

    flush_on_shutdown(&session).await;
    served
}
