// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vitrina marketplace bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vitrina configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values; missing required
/// values (bot token, moderator list) are caught by post-deserialization validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VitrinaConfig {
    /// Telegram bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Moderation team settings.
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Public channel publication settings.
    #[serde(default)]
    pub publication: PublicationConfig,

    /// Natural-language search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Telegram bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Telegram Bot API token. Required at runtime; `None` fails validation.
    #[serde(default)]
    pub token: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vitrina").join("vitrina.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vitrina.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Moderation team configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationConfig {
    /// Telegram user IDs of the moderators. Must be non-empty: every
    /// submission is fanned out to this list for review.
    #[serde(default)]
    pub moderator_ids: Vec<i64>,

    /// Minimum length (in characters) for a rejection comment.
    #[serde(default = "default_min_comment_len")]
    pub min_comment_len: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            moderator_ids: Vec::new(),
            min_comment_len: default_min_comment_len(),
        }
    }
}

fn default_min_comment_len() -> usize {
    5
}

/// Public channel publication configuration.
///
/// When `chat_id` is unset, approved announcements are not published
/// anywhere public; the rest of the approval flow proceeds normally.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PublicationConfig {
    /// Chat ID of the public channel to publish approved announcements to.
    #[serde(default)]
    pub chat_id: Option<i64>,

    /// Forum topic ID inside the channel. Requires `chat_id` to be set.
    #[serde(default)]
    pub topic_id: Option<i64>,

    /// Public URL of the channel, included in approval notifications.
    #[serde(default)]
    pub chat_url: Option<String>,
}

/// Natural-language search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// OpenAI API key. `None` disables LLM ranking; search degrades to
    /// deterministic substring matching.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Model to use for relevance ranking.
    #[serde(default = "default_search_model")]
    pub model: String,

    /// Maximum number of results to return per query.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Minimum relevance score (0-10) for a ranked hit to be included.
    #[serde(default = "default_min_relevance")]
    pub min_relevance: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_search_model(),
            max_results: default_max_results(),
            min_relevance: default_min_relevance(),
        }
    }
}

fn default_search_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_min_relevance() -> u8 {
    6
}
