// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-step submission wizard for the Vitrina marketplace bot.
//!
//! Two flows: the structured announcement form and the free-form custom
//! request. Both are explicit state machines with total transition
//! functions: every `(state, event)` pair yields a defined outcome, and
//! validation failures never move the state. Drafts leave the wizard only
//! through `Confirm` on the preview screen.

pub mod announcement;
pub mod custom_request;
pub mod event;
pub mod session;
pub mod validate;

pub use announcement::{AnnouncementField, AnnouncementStep, AnnouncementWizard};
pub use custom_request::{CustomRequestField, CustomRequestStep, CustomRequestWizard};
pub use event::{callbacks, Outcome, Screen, WizardEvent};
pub use session::{FormSession, SessionStore};
