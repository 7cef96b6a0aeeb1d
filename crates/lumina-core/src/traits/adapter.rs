// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every remote capability adapter.

use async_trait::async_trait;

use crate::error::LuminaError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, lifecycle, and health reporting for a remote adapter.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns which capability this adapter serves.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, LuminaError>;

    /// Releases any held resources.
    async fn shutdown(&self) -> Result<(), LuminaError> {
        Ok(())
    }
}
