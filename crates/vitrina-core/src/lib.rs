// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vitrina marketplace bot.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Vitrina workspace. The submission wizard,
//! moderation engine, storage, search, and transport crates all build on the
//! seams defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VitrinaError;
pub use traits::{ListingStore, SearchBackend, Transport};
pub use types::{
    ChatId, Decision, DeliveryReport, Listing, ListingKind, ListingRef, MessageRef,
    ModerationStatus, ResolveOutcome, UserId,
};
