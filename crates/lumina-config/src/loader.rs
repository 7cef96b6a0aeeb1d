// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./lumina.toml` > `~/.config/lumina/lumina.toml` > `/etc/lumina/lumina.toml`,
//! then `LUMINA_*` environment variables and the conventional `MISTRAL_API_KEY` / `PORT`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LuminaConfig;

/// Section names recognized in `LUMINA_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["agent", "mistral", "storage", "server", "learning", "retention"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lumina/lumina.toml`
/// 3. `~/.config/lumina/lumina.toml`
/// 4. `./lumina.toml`
/// 5. `LUMINA_*` environment variables
/// 6. `MISTRAL_API_KEY` and `PORT`
pub fn load_config() -> Result<LuminaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LuminaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LuminaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LuminaConfig, figment::Error> {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(LuminaConfig::default()))
            .merge(Toml::file(path)),
    )
    .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(LuminaConfig::default()))
            .merge(Toml::file("/etc/lumina/lumina.toml"))
            .merge(Toml::file(
                dirs::config_dir()
                    .map(|d| d.join("lumina/lumina.toml"))
                    .unwrap_or_default(),
            ))
            .merge(Toml::file("lumina.toml")),
    )
}

fn with_env(figment: Figment) -> Figment {
    figment
        .merge(env_provider())
        .merge(Env::raw().only(&["MISTRAL_API_KEY"]).map(|_| "mistral.api_key".into()))
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
}

/// Map `LUMINA_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `LUMINA_MISTRAL_CHAT_MODEL` must become `mistral.chat_model`.
fn env_provider() -> Env {
    Env::prefixed("LUMINA_").map(|key| {
        let key_str = key.as_str();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}
