// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vitrina marketplace bot.

use thiserror::Error;

/// The primary error type used across all Vitrina trait boundaries and core operations.
///
/// A moderation race (resolving an already-resolved listing) is deliberately
/// NOT an error variant -- it is a first-class outcome, see
/// [`crate::types::ResolveOutcome::AlreadyProcessed`].
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (send/edit failure, rate limiting, connection loss).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The referenced message handle no longer points at an editable message.
    ///
    /// Recovered locally by sending a fresh message and re-binding the handle.
    #[error("stale message handle")]
    StaleHandle,

    /// Smart-search backend errors (API failure, malformed response).
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// User input rejected by a local validation rule. Recovered by re-prompting
    /// the same step; the message is shown to the user verbatim.
    #[error("validation error: {0}")]
    Validation(String),

    /// A moderation action was attempted by an identity outside the configured
    /// moderator set.
    #[error("unauthorized")]
    Unauthorized,

    /// The referenced listing does not exist.
    #[error("not found")]
    NotFound,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
