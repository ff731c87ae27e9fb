// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom request flow: three collected answers, preview with an edit loop,
//! confirm. The budget step carries an "I don't know yet" button that fills
//! the sentinel value and jumps straight to preview.

use std::str::FromStr;

use strum::{Display, EnumString};
use vitrina_core::types::{
    Button, ChatId, Keyboard, NewCustomRequest, UserId, BUDGET_UNDEFINED,
};

use crate::event::{callbacks, Outcome, Screen, WizardEvent};
use crate::validate;

/// The three collected custom-request fields, in asking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CustomRequestField {
    BusinessDescription,
    AutomationTask,
    Budget,
}

const FIELD_ORDER: [CustomRequestField; 3] = [
    CustomRequestField::BusinessDescription,
    CustomRequestField::AutomationTask,
    CustomRequestField::Budget,
];

impl CustomRequestField {
    fn next(self) -> Option<Self> {
        let idx = FIELD_ORDER.iter().position(|f| *f == self)?;
        FIELD_ORDER.get(idx + 1).copied()
    }

    fn previous(self) -> Option<Self> {
        let idx = FIELD_ORDER.iter().position(|f| *f == self)?;
        idx.checked_sub(1).map(|i| FIELD_ORDER[i])
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomRequestField::BusinessDescription => "Business description",
            CustomRequestField::AutomationTask => "Task to automate",
            CustomRequestField::Budget => "Budget",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            CustomRequestField::BusinessDescription => {
                "Tell me about your business: what do you do and for whom?"
            }
            CustomRequestField::AutomationTask => {
                "What routine or process would you like to automate?"
            }
            CustomRequestField::Budget => {
                "What budget do you have in mind? If you are not sure, press the button below."
            }
        }
    }
}

/// Steps of the custom-request flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomRequestStep {
    Collecting(CustomRequestField),
    Preview,
    EditMenu,
    EditingField(CustomRequestField),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomRequestDraft {
    pub business_description: Option<String>,
    pub automation_task: Option<String>,
    pub budget: Option<String>,
}

/// State machine for one custom-request submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRequestWizard {
    user_id: UserId,
    chat_id: ChatId,
    step: CustomRequestStep,
    draft: CustomRequestDraft,
}

impl CustomRequestWizard {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self {
            user_id,
            chat_id,
            step: CustomRequestStep::Collecting(FIELD_ORDER[0]),
            draft: CustomRequestDraft::default(),
        }
    }

    pub fn step(&self) -> CustomRequestStep {
        self.step
    }

    /// Feed one event. Same totality contract as the announcement flow.
    pub fn apply(&mut self, event: WizardEvent) -> Outcome {
        if event == WizardEvent::Cancel {
            return Outcome::Cancelled;
        }
        if event == WizardEvent::Back {
            return self.go_back();
        }

        match (self.step, event) {
            (CustomRequestStep::Collecting(field), WizardEvent::Text(text)) => {
                if let Err(reason) = self.store_field(field, &text) {
                    return Outcome::Invalid(reason);
                }
                self.step = match field.next() {
                    Some(next) => CustomRequestStep::Collecting(next),
                    None => CustomRequestStep::Preview,
                };
                Outcome::Continue
            }
            (
                CustomRequestStep::Collecting(CustomRequestField::Budget)
                | CustomRequestStep::EditingField(CustomRequestField::Budget),
                WizardEvent::BudgetUndefined,
            ) => {
                self.draft.budget = Some(BUDGET_UNDEFINED.to_string());
                self.step = CustomRequestStep::Preview;
                Outcome::Continue
            }
            (CustomRequestStep::Preview, WizardEvent::Confirm) => match self.finish() {
                Some(new) => Outcome::CompletedCustomRequest(new),
                None => Outcome::Invalid(
                    "The form is incomplete; please fill in every field.".to_string(),
                ),
            },
            (CustomRequestStep::Preview, WizardEvent::Edit) => {
                self.step = CustomRequestStep::EditMenu;
                Outcome::Continue
            }
            (CustomRequestStep::EditMenu, WizardEvent::EditField(key)) => {
                match CustomRequestField::from_str(&key) {
                    Ok(field) => {
                        self.step = CustomRequestStep::EditingField(field);
                        Outcome::Continue
                    }
                    Err(_) => Outcome::Invalid("Unknown field.".to_string()),
                }
            }
            (CustomRequestStep::EditingField(field), WizardEvent::Text(text)) => {
                if let Err(reason) = self.store_field(field, &text) {
                    return Outcome::Invalid(reason);
                }
                self.step = CustomRequestStep::Preview;
                Outcome::Continue
            }
            _ => Outcome::Invalid("That action is not available right now.".to_string()),
        }
    }

    fn go_back(&mut self) -> Outcome {
        self.step = match self.step {
            CustomRequestStep::Collecting(field) => match field.previous() {
                Some(prev) => CustomRequestStep::Collecting(prev),
                // Back at the very first step is a no-op.
                None => CustomRequestStep::Collecting(field),
            },
            CustomRequestStep::Preview => {
                CustomRequestStep::Collecting(FIELD_ORDER[FIELD_ORDER.len() - 1])
            }
            CustomRequestStep::EditMenu => CustomRequestStep::Preview,
            CustomRequestStep::EditingField(_) => CustomRequestStep::Preview,
        };
        Outcome::Continue
    }

    fn store_field(&mut self, field: CustomRequestField, text: &str) -> Result<(), String> {
        let text = text.trim();
        match field {
            CustomRequestField::BusinessDescription => {
                validate::check_min_len(
                    text,
                    validate::MIN_DESCRIPTION_LEN,
                    "The business description",
                )?;
                self.draft.business_description = Some(text.to_string());
            }
            CustomRequestField::AutomationTask => {
                validate::check_min_len(
                    text,
                    validate::MIN_DESCRIPTION_LEN,
                    "The task description",
                )?;
                self.draft.automation_task = Some(text.to_string());
            }
            CustomRequestField::Budget => {
                validate::check_min_len(text, validate::MIN_BUDGET_LEN, "The budget")?;
                self.draft.budget = Some(text.to_string());
            }
        }
        Ok(())
    }

    fn finish(&self) -> Option<NewCustomRequest> {
        Some(NewCustomRequest {
            user_id: self.user_id,
            chat_id: self.chat_id,
            business_description: self.draft.business_description.clone()?,
            automation_task: self.draft.automation_task.clone()?,
            budget: self.draft.budget.clone()?,
        })
    }

    /// Render the current step.
    pub fn screen(&self) -> Screen {
        match self.step {
            CustomRequestStep::Collecting(field) | CustomRequestStep::EditingField(field) => {
                let mut rows = Vec::new();
                if field == CustomRequestField::Budget {
                    rows.push(vec![Button::callback(
                        "I don't know yet",
                        callbacks::BUDGET_UNDEFINED,
                    )]);
                }
                rows.push(vec![
                    Button::callback("Back", callbacks::BACK),
                    Button::callback("Cancel", callbacks::CANCEL),
                ]);
                Screen {
                    text: field.prompt().to_string(),
                    keyboard: Some(Keyboard::new(rows)),
                }
            }
            CustomRequestStep::Preview => Screen {
                text: self.preview_text(),
                keyboard: Some(Keyboard::new(vec![
                    vec![Button::callback("Submit for moderation", callbacks::CONFIRM)],
                    vec![Button::callback("Edit", callbacks::EDIT)],
                    vec![
                        Button::callback("Back", callbacks::BACK),
                        Button::callback("Cancel", callbacks::CANCEL),
                    ],
                ])),
            },
            CustomRequestStep::EditMenu => {
                let mut rows: Vec<Vec<Button>> = FIELD_ORDER
                    .iter()
                    .map(|field| {
                        vec![Button::callback(
                            field.label(),
                            callbacks::edit_field(&field.to_string()),
                        )]
                    })
                    .collect();
                rows.push(vec![Button::callback("Back", callbacks::BACK)]);
                Screen {
                    text: "Which field do you want to change?".to_string(),
                    keyboard: Some(Keyboard::new(rows)),
                }
            }
        }
    }

    fn preview_text(&self) -> String {
        let missing = "—".to_string();
        let budget = match self.draft.budget.as_deref() {
            Some(BUDGET_UNDEFINED) => "not decided yet",
            Some(other) => other,
            None => &missing,
        };
        format!(
            "Please check your request:\n\n\
             Business: {}\n\
             Task: {}\n\
             Budget: {}",
            self.draft.business_description.as_ref().unwrap_or(&missing),
            self.draft.automation_task.as_ref().unwrap_or(&missing),
            budget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> CustomRequestWizard {
        CustomRequestWizard::new(UserId(200), ChatId(200))
    }

    fn drive_to_budget(w: &mut CustomRequestWizard) {
        assert_eq!(
            w.apply(WizardEvent::Text("chain of flower shops in two cities".to_string())),
            Outcome::Continue
        );
        assert_eq!(
            w.apply(WizardEvent::Text("order intake and courier scheduling".to_string())),
            Outcome::Continue
        );
        assert_eq!(
            w.step(),
            CustomRequestStep::Collecting(CustomRequestField::Budget)
        );
    }

    #[test]
    fn full_round_trip_completes() {
        let mut w = wizard();
        drive_to_budget(&mut w);
        assert_eq!(w.apply(WizardEvent::Text("500 USD".to_string())), Outcome::Continue);
        assert_eq!(w.step(), CustomRequestStep::Preview);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedCustomRequest(new) => {
                assert_eq!(new.budget, "500 USD");
                assert_eq!(new.user_id, UserId(200));
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn budget_undefined_fills_sentinel_and_previews() {
        let mut w = wizard();
        drive_to_budget(&mut w);
        assert_eq!(w.apply(WizardEvent::BudgetUndefined), Outcome::Continue);
        assert_eq!(w.step(), CustomRequestStep::Preview);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedCustomRequest(new) => assert_eq!(new.budget, BUDGET_UNDEFINED),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn budget_undefined_only_valid_on_budget_step() {
        let mut w = wizard();
        assert!(matches!(
            w.apply(WizardEvent::BudgetUndefined),
            Outcome::Invalid(_)
        ));
        assert_eq!(
            w.step(),
            CustomRequestStep::Collecting(CustomRequestField::BusinessDescription)
        );
    }

    #[test]
    fn short_answers_are_rejected_in_place() {
        let mut w = wizard();
        assert!(matches!(
            w.apply(WizardEvent::Text("shop".to_string())),
            Outcome::Invalid(_)
        ));
        assert_eq!(
            w.step(),
            CustomRequestStep::Collecting(CustomRequestField::BusinessDescription)
        );

        let mut w = wizard();
        drive_to_budget(&mut w);
        assert!(matches!(
            w.apply(WizardEvent::Text("5".to_string())),
            Outcome::Invalid(_)
        ));
        assert_eq!(w.apply(WizardEvent::Text("50".to_string())), Outcome::Continue);
    }

    #[test]
    fn back_at_first_step_is_a_no_op() {
        let mut w = wizard();
        assert_eq!(w.apply(WizardEvent::Back), Outcome::Continue);
        assert_eq!(
            w.step(),
            CustomRequestStep::Collecting(CustomRequestField::BusinessDescription)
        );
    }

    #[test]
    fn edited_value_wins() {
        let mut w = wizard();
        drive_to_budget(&mut w);
        w.apply(WizardEvent::Text("500 USD".to_string()));
        w.apply(WizardEvent::Edit);
        w.apply(WizardEvent::EditField("budget".to_string()));
        assert_eq!(
            w.step(),
            CustomRequestStep::EditingField(CustomRequestField::Budget)
        );
        w.apply(WizardEvent::Text("800 USD".to_string()));
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedCustomRequest(new) => assert_eq!(new.budget, "800 USD"),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn cancel_discards() {
        let mut w = wizard();
        drive_to_budget(&mut w);
        assert_eq!(w.apply(WizardEvent::Cancel), Outcome::Cancelled);
    }

    #[test]
    fn budget_screen_offers_undefined_button() {
        let mut w = wizard();
        drive_to_budget(&mut w);
        let screen = w.screen();
        let keyboard = screen.keyboard.unwrap();
        assert!(keyboard.rows.iter().flatten().any(|b| {
            matches!(
                &b.action,
                vitrina_core::types::ButtonAction::Callback(data)
                    if data == callbacks::BUDGET_UNDEFINED
            )
        }));
    }
}
