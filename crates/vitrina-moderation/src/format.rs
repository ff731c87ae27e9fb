// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text cards for moderation and publication messages.

use vitrina_core::types::{Announcement, CustomRequest, Listing, BUDGET_UNDEFINED};

fn announcement_body(a: &Announcement) -> String {
    let mut body = format!(
        "Name: {}\n\
         Task: {}\n\
         Solution: {}\n\
         Included: {}\n\
         Client provides: {}\n\
         Launch: {}\n\
         Price: {}\n\
         Complexity: {}",
        a.bot_name,
        a.bot_function,
        a.solution_description,
        a.included_features,
        a.client_requirements,
        a.launch_time,
        a.price,
        a.complexity,
    );
    if let Some(url) = &a.demo_url {
        body.push_str(&format!("\nDemo: {url}"));
    }
    if !a.documents.is_empty() || !a.videos.is_empty() {
        body.push_str(&format!(
            "\nAttachments: {} document(s), {} video(s)",
            a.documents.len(),
            a.videos.len()
        ));
    }
    body
}

fn custom_request_body(r: &CustomRequest) -> String {
    let budget = if r.budget == BUDGET_UNDEFINED {
        "not decided yet"
    } else {
        &r.budget
    };
    format!(
        "Business: {}\n\
         Task: {}\n\
         Budget: {}",
        r.business_description, r.automation_task, budget,
    )
}

/// The card shown to moderators together with the approve/reject keyboard.
pub fn moderation_card(listing: &Listing) -> String {
    match listing {
        Listing::Announcement(a) => format!(
            "New announcement #{} awaiting review\n\n{}",
            a.id,
            announcement_body(a)
        ),
        Listing::CustomRequest(r) => format!(
            "New custom request #{} awaiting review\n\n{}",
            r.id,
            custom_request_body(r)
        ),
    }
}

/// The card posted to the public channel after approval.
pub fn publication_card(listing: &Listing) -> String {
    match listing {
        Listing::Announcement(a) => announcement_body(a),
        Listing::CustomRequest(r) => format!("Looking for a solution\n\n{}", custom_request_body(r)),
    }
}

/// Outcome message for the submitting user on approval.
pub fn user_approved_text(listing: &Listing, chat_url: Option<&str>) -> String {
    let mut text = match listing {
        Listing::Announcement(a) => format!(
            "Your announcement \"{}\" was approved and published.",
            a.bot_name
        ),
        Listing::CustomRequest(_) => {
            "Your request was approved and shared with the developers.".to_string()
        }
    };
    if let Some(url) = chat_url {
        text.push_str(&format!("\nSee it here: {url}"));
    }
    text
}

/// Outcome message for the submitting user on rejection, quoting the
/// moderator's comment.
pub fn user_rejected_text(listing: &Listing, comment: &str) -> String {
    let what = match listing {
        Listing::Announcement(a) => format!("announcement \"{}\"", a.bot_name),
        Listing::CustomRequest(_) => "request".to_string(),
    };
    format!(
        "Unfortunately your {what} was not approved.\n\
         Moderator's comment: {comment}\n\n\
         You can adjust it and submit again."
    )
}

/// Heads-up sent to the moderators who did not take the decision.
pub fn moderator_resolution_text(listing: &Listing, approved: bool) -> String {
    let verdict = if approved { "approved" } else { "rejected" };
    format!(
        "Listing #{} ({}) was {} by another moderator.",
        listing.id(),
        listing.kind(),
        verdict
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::types::{ChatId, Complexity, ModerationStatus, UserId};

    fn announcement() -> Listing {
        Listing::Announcement(Announcement {
            id: 42,
            user_id: UserId(100),
            chat_id: ChatId(100),
            bot_name: "EchoBot".to_string(),
            bot_function: "repeats what you say".to_string(),
            solution_description: "a careful echo pipeline".to_string(),
            included_features: "echo, reverse echo".to_string(),
            client_requirements: "a Telegram group".to_string(),
            launch_time: "1 day".to_string(),
            price: "100 USD".to_string(),
            complexity: Complexity::Low,
            demo_url: Some("https://example.com".to_string()),
            documents: Vec::new(),
            videos: Vec::new(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            status: ModerationStatus::Pending,
            moderator_id: None,
            rejection_comment: None,
        })
    }

    #[test]
    fn moderation_card_names_the_listing() {
        let card = moderation_card(&announcement());
        assert!(card.contains("#42"));
        assert!(card.contains("EchoBot"));
        assert!(card.contains("Demo: https://example.com"));
    }

    #[test]
    fn budget_sentinel_reads_naturally() {
        let listing = Listing::CustomRequest(CustomRequest {
            id: 1,
            user_id: UserId(1),
            chat_id: ChatId(1),
            business_description: "bakery".to_string(),
            automation_task: "orders".to_string(),
            budget: BUDGET_UNDEFINED.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            status: ModerationStatus::Pending,
            moderator_id: None,
            rejection_comment: None,
        });
        let card = moderation_card(&listing);
        assert!(card.contains("Budget: not decided yet"));
        assert!(!card.contains(BUDGET_UNDEFINED));
    }

    #[test]
    fn rejection_text_quotes_comment() {
        let text = user_rejected_text(&announcement(), "no demo access");
        assert!(text.contains("no demo access"));
        assert!(text.contains("EchoBot"));
    }

    #[test]
    fn approval_text_includes_channel_link_when_present() {
        let with = user_approved_text(&announcement(), Some("https://t.me/vitrina"));
        assert!(with.contains("https://t.me/vitrina"));
        let without = user_approved_text(&announcement(), None);
        assert!(!without.contains("http"));
    }
}
