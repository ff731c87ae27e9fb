// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vitrina.toml` > `~/.config/vitrina/vitrina.toml` > `/etc/vitrina/vitrina.toml`
//! with environment variable overrides via `VITRINA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VitrinaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vitrina/vitrina.toml` (system-wide)
/// 3. `~/.config/vitrina/vitrina.toml` (user XDG config)
/// 4. `./vitrina.toml` (local directory)
/// 5. `VITRINA_*` environment variables
pub fn load_config() -> Result<VitrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VitrinaConfig::default()))
        .merge(Toml::file("/etc/vitrina/vitrina.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vitrina/vitrina.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vitrina.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for callers that supply config inline.
pub fn load_config_from_str(toml_content: &str) -> Result<VitrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VitrinaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VitrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VitrinaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VITRINA_STORAGE_DATABASE_PATH`
/// must map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("VITRINA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VITRINA_BOT_TOKEN -> "bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("moderation_", "moderation.", 1)
            .replacen("publication_", "publication.", 1)
            .replacen("search_", "search.", 1);
        mapped.into()
    })
}
