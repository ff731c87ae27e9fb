// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Announcement submission flow: explanation, template, eight collected
//! fields, attachments, preview with an edit loop, confirm.

use std::str::FromStr;

use strum::{Display, EnumString};
use vitrina_core::types::{
    Button, ChatId, Complexity, DocumentAttachment, Keyboard, NewAnnouncement, UserId,
    VideoAttachment,
};

use crate::event::{callbacks, Outcome, Screen, WizardEvent};
use crate::validate;

/// The collected announcement fields, in asking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AnnouncementField {
    BotName,
    BotFunction,
    SolutionDescription,
    IncludedFeatures,
    ClientRequirements,
    LaunchTime,
    Price,
    Complexity,
}

const FIELD_ORDER: [AnnouncementField; 8] = [
    AnnouncementField::BotName,
    AnnouncementField::BotFunction,
    AnnouncementField::SolutionDescription,
    AnnouncementField::IncludedFeatures,
    AnnouncementField::ClientRequirements,
    AnnouncementField::LaunchTime,
    AnnouncementField::Price,
    AnnouncementField::Complexity,
];

impl AnnouncementField {
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
            AnnouncementField::BotName => "Bot name",
            AnnouncementField::BotFunction => "Task it solves",
            AnnouncementField::SolutionDescription => "Solution description",
            AnnouncementField::IncludedFeatures => "What is included",
            AnnouncementField::ClientRequirements => "What the client provides",
            AnnouncementField::LaunchTime => "Launch time",
            AnnouncementField::Price => "Price",
            AnnouncementField::Complexity => "Complexity",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            AnnouncementField::BotName => "What is your bot called?",
            AnnouncementField::BotFunction => "What task or problem does the bot solve?",
            AnnouncementField::SolutionDescription => {
                "Describe your solution: how does the bot approach the task?"
            }
            AnnouncementField::IncludedFeatures => {
                "What is included in the offer (features, integrations, support)?"
            }
            AnnouncementField::ClientRequirements => {
                "What does the client need to provide for the launch?"
            }
            AnnouncementField::LaunchTime => "How long does it take to launch?",
            AnnouncementField::Price => {
                "What is the price? Describe it in plain text, without contact links."
            }
            AnnouncementField::Complexity => {
                "How complex is the solution? Choose or type: low, medium, high."
            }
        }
    }
}

/// Steps of the announcement flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementStep {
    Explanation,
    Template,
    Collecting(AnnouncementField),
    Attachments,
    Preview,
    EditMenu,
    EditingField(AnnouncementField),
}

/// Accumulated answers. Fields stay `None` until collected; `finish` only
/// succeeds when all are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementDraft {
    pub bot_name: Option<String>,
    pub bot_function: Option<String>,
    pub solution_description: Option<String>,
    pub included_features: Option<String>,
    pub client_requirements: Option<String>,
    pub launch_time: Option<String>,
    pub price: Option<String>,
    pub complexity: Option<Complexity>,
    pub demo_url: Option<String>,
    pub documents: Vec<DocumentAttachment>,
    pub videos: Vec<VideoAttachment>,
}

/// State machine for one announcement submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementWizard {
    user_id: UserId,
    chat_id: ChatId,
    step: AnnouncementStep,
    draft: AnnouncementDraft,
}

impl AnnouncementWizard {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self {
            user_id,
            chat_id,
            step: AnnouncementStep::Explanation,
            draft: AnnouncementDraft::default(),
        }
    }

    pub fn step(&self) -> AnnouncementStep {
        self.step
    }

    /// Feed one event. Total over all events; invalid combinations report
    /// [`Outcome::Invalid`] and leave the state untouched.
    pub fn apply(&mut self, event: WizardEvent) -> Outcome {
        if event == WizardEvent::Cancel {
            return Outcome::Cancelled;
        }
        if event == WizardEvent::Back {
            return self.go_back();
        }

        match (self.step, event) {
            (AnnouncementStep::Explanation, WizardEvent::Next) => {
                self.step = AnnouncementStep::Template;
                Outcome::Continue
            }
            (AnnouncementStep::Template, WizardEvent::Next) => {
                self.step = AnnouncementStep::Collecting(FIELD_ORDER[0]);
                Outcome::Continue
            }
            (AnnouncementStep::Collecting(field), WizardEvent::Text(text)) => {
                if let Err(reason) = self.store_field(field, &text) {
                    return Outcome::Invalid(reason);
                }
                self.step = match field.next() {
                    Some(next) => AnnouncementStep::Collecting(next),
                    None => AnnouncementStep::Attachments,
                };
                Outcome::Continue
            }
            (AnnouncementStep::Attachments, WizardEvent::Document(doc)) => {
                if let Err(reason) = validate::validate_document(&doc) {
                    return Outcome::Invalid(reason);
                }
                self.draft.documents.push(doc);
                Outcome::Continue
            }
            (AnnouncementStep::Attachments, WizardEvent::Video(video)) => {
                if let Err(reason) = validate::validate_video(&video) {
                    return Outcome::Invalid(reason);
                }
                self.draft.videos.push(video);
                Outcome::Continue
            }
            (AnnouncementStep::Attachments, WizardEvent::Text(text)) => {
                if validate::looks_like_url(&text) {
                    // Last link wins as the demo URL.
                    self.draft.demo_url = Some(text.trim().to_string());
                    Outcome::Continue
                } else {
                    Outcome::Invalid(
                        "Send a document, a video, a demo link, or press Done.".to_string(),
                    )
                }
            }
            (AnnouncementStep::Attachments, WizardEvent::AttachmentsDone) => {
                self.step = AnnouncementStep::Preview;
                Outcome::Continue
            }
            (AnnouncementStep::Preview, WizardEvent::Confirm) => match self.finish() {
                Some(new) => Outcome::CompletedAnnouncement(Box::new(new)),
                None => Outcome::Invalid(
                    "The form is incomplete; please fill in every field.".to_string(),
                ),
            },
            (AnnouncementStep::Preview, WizardEvent::Edit) => {
                self.step = AnnouncementStep::EditMenu;
                Outcome::Continue
            }
            (AnnouncementStep::EditMenu, WizardEvent::EditField(key)) => {
                match AnnouncementField::from_str(&key) {
                    Ok(field) => {
                        self.step = AnnouncementStep::EditingField(field);
                        Outcome::Continue
                    }
                    Err(_) => Outcome::Invalid("Unknown field.".to_string()),
                }
            }
            (AnnouncementStep::EditingField(field), WizardEvent::Text(text)) => {
                if let Err(reason) = self.store_field(field, &text) {
                    return Outcome::Invalid(reason);
                }
                self.step = AnnouncementStep::Preview;
                Outcome::Continue
            }
            _ => Outcome::Invalid("That action is not available right now.".to_string()),
        }
    }

    fn go_back(&mut self) -> Outcome {
        self.step = match self.step {
            // Back at the very first step is a no-op.
            AnnouncementStep::Explanation => AnnouncementStep::Explanation,
            AnnouncementStep::Template => AnnouncementStep::Explanation,
            AnnouncementStep::Collecting(field) => match field.previous() {
                Some(prev) => AnnouncementStep::Collecting(prev),
                None => AnnouncementStep::Template,
            },
            AnnouncementStep::Attachments => {
                AnnouncementStep::Collecting(FIELD_ORDER[FIELD_ORDER.len() - 1])
            }
            AnnouncementStep::Preview => AnnouncementStep::Attachments,
            AnnouncementStep::EditMenu => AnnouncementStep::Preview,
            AnnouncementStep::EditingField(_) => AnnouncementStep::Preview,
        };
        Outcome::Continue
    }

    fn store_field(&mut self, field: AnnouncementField, text: &str) -> Result<(), String> {
        let text = text.trim();
        match field {
            AnnouncementField::Complexity => {
                let complexity = Complexity::from_str(text).map_err(|_| {
                    "Please answer with one of: low, medium, high.".to_string()
                })?;
                self.draft.complexity = Some(complexity);
            }
            AnnouncementField::Price => {
                validate::check_min_len(text, validate::MIN_FIELD_LEN, "The price")?;
                if validate::contains_contact_link(text) {
                    return Err(
                        "The price must not contain links or contact handles; \
                         interested clients reach you through the marketplace."
                            .to_string(),
                    );
                }
                self.draft.price = Some(text.to_string());
            }
            other => {
                validate::check_min_len(text, validate::MIN_FIELD_LEN, "The answer")?;
                let value = Some(text.to_string());
                match other {
                    AnnouncementField::BotName => self.draft.bot_name = value,
                    AnnouncementField::BotFunction => self.draft.bot_function = value,
                    AnnouncementField::SolutionDescription => {
                        self.draft.solution_description = value
                    }
                    AnnouncementField::IncludedFeatures => self.draft.included_features = value,
                    AnnouncementField::ClientRequirements => {
                        self.draft.client_requirements = value
                    }
                    AnnouncementField::LaunchTime => self.draft.launch_time = value,
                    AnnouncementField::Price | AnnouncementField::Complexity => unreachable!(),
                }
            }
        }
        Ok(())
    }

    fn finish(&self) -> Option<NewAnnouncement> {
        Some(NewAnnouncement {
            user_id: self.user_id,
            chat_id: self.chat_id,
            bot_name: self.draft.bot_name.clone()?,
            bot_function: self.draft.bot_function.clone()?,
            solution_description: self.draft.solution_description.clone()?,
            included_features: self.draft.included_features.clone()?,
            client_requirements: self.draft.client_requirements.clone()?,
            launch_time: self.draft.launch_time.clone()?,
            price: self.draft.price.clone()?,
            complexity: self.draft.complexity?,
            demo_url: self.draft.demo_url.clone(),
            documents: self.draft.documents.clone(),
            videos: self.draft.videos.clone(),
        })
    }

    /// Render the current step.
    pub fn screen(&self) -> Screen {
        match self.step {
            AnnouncementStep::Explanation => Screen {
                text: "Let's publish your bot on the marketplace.\n\n\
                       I will ask a few questions about what it does, what is \
                       included and what it costs, then show you a preview before \
                       anything is sent to moderation."
                    .to_string(),
                keyboard: Some(Keyboard::new(vec![
                    vec![Button::callback("Continue", callbacks::NEXT)],
                    vec![Button::callback("Cancel", callbacks::CANCEL)],
                ])),
            },
            AnnouncementStep::Template => Screen {
                text: "Example listing:\n\n\
                       Name: SupportBot\n\
                       Task: answers customer questions in Telegram groups\n\
                       Included: FAQ import, human handoff, weekly analytics\n\
                       Client provides: group admin rights, knowledge base export\n\
                       Launch: 2 weeks\n\
                       Price: from 1500 USD\n\
                       Complexity: medium\n\n\
                       Ready? Press Continue to start."
                    .to_string(),
                keyboard: Some(Keyboard::new(vec![
                    vec![Button::callback("Continue", callbacks::NEXT)],
                    vec![
                        Button::callback("Back", callbacks::BACK),
                        Button::callback("Cancel", callbacks::CANCEL),
                    ],
                ])),
            },
            AnnouncementStep::Collecting(field) | AnnouncementStep::EditingField(field) => {
                let mut rows = Vec::new();
                if field == AnnouncementField::Complexity {
                    rows.push(vec![
                        Button::callback("Low", callbacks::complexity("low")),
                        Button::callback("Medium", callbacks::complexity("medium")),
                        Button::callback("High", callbacks::complexity("high")),
                    ]);
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
            AnnouncementStep::Attachments => Screen {
                text: format!(
                    "Attach documents, videos or a demo link (optional).\n\
                     Attached so far: {} document(s), {} video(s){}.\n\
                     Press Done when finished.",
                    self.draft.documents.len(),
                    self.draft.videos.len(),
                    match &self.draft.demo_url {
                        Some(url) => format!(", demo link {url}"),
                        None => String::new(),
                    }
                ),
                keyboard: Some(Keyboard::new(vec![
                    vec![Button::callback("Done", callbacks::ATTACHMENTS_DONE)],
                    vec![
                        Button::callback("Back", callbacks::BACK),
                        Button::callback("Cancel", callbacks::CANCEL),
                    ],
                ])),
            },
            AnnouncementStep::Preview => Screen {
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
            AnnouncementStep::EditMenu => {
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
        format!(
            "Please check your listing:\n\n\
             Name: {}\n\
             Task: {}\n\
             Solution: {}\n\
             Included: {}\n\
             Client provides: {}\n\
             Launch: {}\n\
             Price: {}\n\
             Complexity: {}\n\
             Demo: {}\n\
             Attachments: {} document(s), {} video(s)",
            self.draft.bot_name.as_ref().unwrap_or(&missing),
            self.draft.bot_function.as_ref().unwrap_or(&missing),
            self.draft.solution_description.as_ref().unwrap_or(&missing),
            self.draft.included_features.as_ref().unwrap_or(&missing),
            self.draft.client_requirements.as_ref().unwrap_or(&missing),
            self.draft.launch_time.as_ref().unwrap_or(&missing),
            self.draft.price.as_ref().unwrap_or(&missing),
            self.draft
                .complexity
                .map(|c| c.to_string())
                .unwrap_or_else(|| missing.clone()),
            self.draft.demo_url.as_ref().unwrap_or(&missing),
            self.draft.documents.len(),
            self.draft.videos.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> AnnouncementWizard {
        AnnouncementWizard::new(UserId(100), ChatId(100))
    }

    fn answers() -> [(AnnouncementField, &'static str); 8] {
        [
            (AnnouncementField::BotName, "SupportBot"),
            (AnnouncementField::BotFunction, "answers customer questions"),
            (
                AnnouncementField::SolutionDescription,
                "LLM agent over the client knowledge base",
            ),
            (AnnouncementField::IncludedFeatures, "FAQ, handoff, analytics"),
            (
                AnnouncementField::ClientRequirements,
                "group admin rights, knowledge base",
            ),
            (AnnouncementField::LaunchTime, "two weeks"),
            (AnnouncementField::Price, "from 1500 USD"),
            (AnnouncementField::Complexity, "medium"),
        ]
    }

    fn drive_to_preview(w: &mut AnnouncementWizard) {
        assert_eq!(w.apply(WizardEvent::Next), Outcome::Continue);
        assert_eq!(w.apply(WizardEvent::Next), Outcome::Continue);
        for (field, answer) in answers() {
            assert_eq!(w.step(), AnnouncementStep::Collecting(field));
            assert_eq!(w.apply(WizardEvent::Text(answer.to_string())), Outcome::Continue);
        }
        assert_eq!(w.step(), AnnouncementStep::Attachments);
        assert_eq!(w.apply(WizardEvent::AttachmentsDone), Outcome::Continue);
        assert_eq!(w.step(), AnnouncementStep::Preview);
    }

    #[test]
    fn full_round_trip_completes_with_entered_values() {
        let mut w = wizard();
        drive_to_preview(&mut w);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedAnnouncement(new) => {
                assert_eq!(new.bot_name, "SupportBot");
                assert_eq!(new.price, "from 1500 USD");
                assert_eq!(new.complexity, Complexity::Medium);
                assert_eq!(new.user_id, UserId(100));
                assert!(new.demo_url.is_none());
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn back_at_first_step_is_a_no_op() {
        let mut w = wizard();
        assert_eq!(w.step(), AnnouncementStep::Explanation);
        assert_eq!(w.apply(WizardEvent::Back), Outcome::Continue);
        assert_eq!(w.step(), AnnouncementStep::Explanation);
        // Repeating Back stays put.
        assert_eq!(w.apply(WizardEvent::Back), Outcome::Continue);
        assert_eq!(w.step(), AnnouncementStep::Explanation);
    }

    #[test]
    fn back_walks_the_predecessor_chain() {
        let mut w = wizard();
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Text("SupportBot".to_string()));
        assert_eq!(
            w.step(),
            AnnouncementStep::Collecting(AnnouncementField::BotFunction)
        );
        w.apply(WizardEvent::Back);
        assert_eq!(
            w.step(),
            AnnouncementStep::Collecting(AnnouncementField::BotName)
        );
        w.apply(WizardEvent::Back);
        assert_eq!(w.step(), AnnouncementStep::Template);
    }

    #[test]
    fn reentered_value_wins_after_back() {
        let mut w = wizard();
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Text("OldName".to_string()));
        w.apply(WizardEvent::Back);
        w.apply(WizardEvent::Text("NewName".to_string()));
        for (_, answer) in answers().iter().skip(1) {
            w.apply(WizardEvent::Text(answer.to_string()));
        }
        w.apply(WizardEvent::AttachmentsDone);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedAnnouncement(new) => assert_eq!(new.bot_name, "NewName"),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn edit_loop_returns_to_preview_with_new_value() {
        let mut w = wizard();
        drive_to_preview(&mut w);
        assert_eq!(w.apply(WizardEvent::Edit), Outcome::Continue);
        assert_eq!(w.step(), AnnouncementStep::EditMenu);
        assert_eq!(
            w.apply(WizardEvent::EditField("price".to_string())),
            Outcome::Continue
        );
        assert_eq!(
            w.step(),
            AnnouncementStep::EditingField(AnnouncementField::Price)
        );
        assert_eq!(
            w.apply(WizardEvent::Text("from 2000 USD".to_string())),
            Outcome::Continue
        );
        assert_eq!(w.step(), AnnouncementStep::Preview);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedAnnouncement(new) => assert_eq!(new.price, "from 2000 USD"),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn contact_link_in_price_is_rejected_in_place() {
        let mut w = wizard();
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Next);
        for (_, answer) in answers().iter().take(6) {
            w.apply(WizardEvent::Text(answer.to_string()));
        }
        assert_eq!(
            w.step(),
            AnnouncementStep::Collecting(AnnouncementField::Price)
        );
        let outcome = w.apply(WizardEvent::Text("DM me: t.me/seller".to_string()));
        assert!(matches!(outcome, Outcome::Invalid(_)));
        // State unchanged; a clean retry proceeds.
        assert_eq!(
            w.step(),
            AnnouncementStep::Collecting(AnnouncementField::Price)
        );
        assert_eq!(
            w.apply(WizardEvent::Text("1500 USD".to_string())),
            Outcome::Continue
        );
    }

    #[test]
    fn last_url_wins_as_demo_link() {
        let mut w = wizard();
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Next);
        for (_, answer) in answers() {
            w.apply(WizardEvent::Text(answer.to_string()));
        }
        assert_eq!(w.step(), AnnouncementStep::Attachments);
        w.apply(WizardEvent::Text("https://example.com/old".to_string()));
        w.apply(WizardEvent::Text("https://example.com/new".to_string()));
        w.apply(WizardEvent::AttachmentsDone);
        match w.apply(WizardEvent::Confirm) {
            Outcome::CompletedAnnouncement(new) => {
                assert_eq!(new.demo_url.as_deref(), Some("https://example.com/new"));
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn oversized_attachment_rejected_state_unchanged() {
        let mut w = wizard();
        w.apply(WizardEvent::Next);
        w.apply(WizardEvent::Next);
        for (_, answer) in answers() {
            w.apply(WizardEvent::Text(answer.to_string()));
        }
        let big = DocumentAttachment {
            file_id: "f".to_string(),
            file_name: "pitch.pdf".to_string(),
            file_size: crate::validate::MAX_ATTACHMENT_BYTES + 1,
            mime_type: "application/pdf".to_string(),
        };
        let outcome = w.apply(WizardEvent::Document(big));
        assert!(matches!(outcome, Outcome::Invalid(_)));
        assert_eq!(w.step(), AnnouncementStep::Attachments);
    }

    #[test]
    fn cancel_discards_from_any_step() {
        let mut w = wizard();
        assert_eq!(w.apply(WizardEvent::Cancel), Outcome::Cancelled);

        let mut w = wizard();
        drive_to_preview(&mut w);
        assert_eq!(w.apply(WizardEvent::Cancel), Outcome::Cancelled);
    }

    #[test]
    fn confirm_outside_preview_is_invalid() {
        let mut w = wizard();
        assert!(matches!(w.apply(WizardEvent::Confirm), Outcome::Invalid(_)));
        assert_eq!(w.step(), AnnouncementStep::Explanation);
    }

    #[test]
    fn every_step_renders_a_screen() {
        let mut w = wizard();
        loop {
            let screen = w.screen();
            assert!(!screen.text.is_empty());
            assert!(screen.keyboard.is_some());
            if w.step() == AnnouncementStep::Preview {
                break;
            }
            match w.step() {
                AnnouncementStep::Explanation | AnnouncementStep::Template => {
                    w.apply(WizardEvent::Next);
                }
                AnnouncementStep::Collecting(AnnouncementField::Complexity) => {
                    w.apply(WizardEvent::Text("low".to_string()));
                }
                AnnouncementStep::Collecting(_) => {
                    w.apply(WizardEvent::Text("long enough answer".to_string()));
                }
                AnnouncementStep::Attachments => {
                    w.apply(WizardEvent::AttachmentsDone);
                }
                _ => unreachable!(),
            }
        }
    }
}
