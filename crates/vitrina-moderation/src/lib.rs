// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moderation workflow for the Vitrina marketplace bot.
//!
//! The engine applies the at-most-once approve/reject transition through the
//! listing store; the notifier handles everything around it: fanning
//! submissions out to the moderator team, telling the submitter the outcome,
//! and publishing approved listings to the public channel.

pub mod engine;
pub mod fanout;
pub mod format;
pub mod notify;
pub mod testing;

pub use engine::{callbacks, BeginRejection, ModerationEngine, RejectionOutcome};
pub use fanout::broadcast;
pub use notify::{ModerationNotifier, PublicationTarget};
