// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wizard events, step outcomes, and the rendered screen model.

use vitrina_core::types::{
    DocumentAttachment, Keyboard, NewAnnouncement, NewCustomRequest, VideoAttachment,
};

/// Everything a form session can receive, from either a typed message or a
/// button press. The transition functions are total over this enum: events
/// that make no sense in the current step come back as [`Outcome::Invalid`]
/// with the state unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Text(String),
    Document(DocumentAttachment),
    Video(VideoAttachment),
    Next,
    Back,
    Cancel,
    AttachmentsDone,
    Confirm,
    Edit,
    /// Jump to re-collect one field from the edit menu. The payload is the
    /// field key as rendered into the edit-menu callback data.
    EditField(String),
    /// Custom-request only: fill the budget sentinel and jump to preview.
    BudgetUndefined,
}

/// Result of feeding one event into a wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// State advanced (or the event was a harmless no-op); re-render.
    Continue,
    /// Validation failed; the state did not move. The string is shown to
    /// the user verbatim.
    Invalid(String),
    /// Confirm was pressed on the preview. The only way a draft leaves the
    /// wizard; the caller persists it.
    CompletedAnnouncement(Box<NewAnnouncement>),
    CompletedCustomRequest(NewCustomRequest),
    /// The session is discarded; nothing was persisted.
    Cancelled,
}

/// Channel-agnostic rendering of the current step: prompt text plus the
/// inline keyboard for it. The transport layer decides how to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Callback payloads used by wizard keyboards. The dispatcher parses these
/// back into [`WizardEvent`]s.
pub mod callbacks {
    use super::WizardEvent;

    pub const NEXT: &str = "wizard:next";
    pub const BACK: &str = "wizard:back";
    pub const CANCEL: &str = "wizard:cancel";
    pub const ATTACHMENTS_DONE: &str = "wizard:attachments_done";
    pub const CONFIRM: &str = "wizard:confirm";
    pub const EDIT: &str = "wizard:edit";
    pub const BUDGET_UNDEFINED: &str = "wizard:budget_undefined";
    pub const EDIT_FIELD_PREFIX: &str = "wizard:edit_field:";

    /// Complexity choices are delivered as plain field text.
    pub const COMPLEXITY_PREFIX: &str = "wizard:complexity:";

    pub fn edit_field(key: &str) -> String {
        format!("{EDIT_FIELD_PREFIX}{key}")
    }

    pub fn complexity(level: &str) -> String {
        format!("{COMPLEXITY_PREFIX}{level}")
    }

    /// Parse callback data into a wizard event. Returns `None` for payloads
    /// that belong to other subsystems.
    pub fn parse(data: &str) -> Option<WizardEvent> {
        match data {
            NEXT => Some(WizardEvent::Next),
            BACK => Some(WizardEvent::Back),
            CANCEL => Some(WizardEvent::Cancel),
            ATTACHMENTS_DONE => Some(WizardEvent::AttachmentsDone),
            CONFIRM => Some(WizardEvent::Confirm),
            EDIT => Some(WizardEvent::Edit),
            BUDGET_UNDEFINED => Some(WizardEvent::BudgetUndefined),
            _ => {
                if let Some(key) = data.strip_prefix(EDIT_FIELD_PREFIX) {
                    Some(WizardEvent::EditField(key.to_string()))
                } else {
                    data.strip_prefix(COMPLEXITY_PREFIX)
                        .map(|level| WizardEvent::Text(level.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_round_trips() {
        assert_eq!(callbacks::parse("wizard:next"), Some(WizardEvent::Next));
        assert_eq!(callbacks::parse("wizard:cancel"), Some(WizardEvent::Cancel));
        assert_eq!(
            callbacks::parse(&callbacks::edit_field("price")),
            Some(WizardEvent::EditField("price".to_string()))
        );
        assert_eq!(
            callbacks::parse(&callbacks::complexity("high")),
            Some(WizardEvent::Text("high".to_string()))
        );
        assert_eq!(callbacks::parse("moderation:approve:announcement:1"), None);
    }
}
