// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message templates and keyboard builders.
//!
//! Every string the bot says outside the wizard screens lives here, so the
//! routing code stays free of copy.

use vitrina_core::types::{Button, Keyboard, SearchOutcome};

/// Callback payloads owned by the main menu and search results.
pub mod callbacks {
    pub const ADD_ANNOUNCEMENT: &str = "menu:add_announcement";
    pub const CUSTOM_REQUEST: &str = "menu:custom_request";
    pub const SMART_SEARCH: &str = "menu:smart_search";

    const VIEW_PREFIX: &str = "view:announcement:";

    pub fn view_announcement(id: i64) -> String {
        format!("{VIEW_PREFIX}{id}")
    }

    /// Parse a view-solution payload. Returns `None` for payloads that
    /// belong to other subsystems.
    pub fn parse_view(data: &str) -> Option<i64> {
        data.strip_prefix(VIEW_PREFIX)?.parse().ok()
    }
}

pub fn start_menu_text() -> String {
    "Welcome to the Vitrina marketplace.\n\n\
     Offer a ready-made bot, describe a task you need automated, \
     or search the catalogue of published solutions."
        .to_string()
}

pub fn start_menu_keyboard(chat_url: Option<&str>) -> Keyboard {
    let mut rows = vec![
        vec![Button::callback(
            "Add an announcement",
            callbacks::ADD_ANNOUNCEMENT,
        )],
        vec![Button::callback(
            "Request a custom solution",
            callbacks::CUSTOM_REQUEST,
        )],
        vec![Button::callback("Smart search", callbacks::SMART_SEARCH)],
    ];
    if let Some(url) = chat_url {
        rows.push(vec![Button::url("Our channel", url)]);
    }
    Keyboard::new(rows)
}

pub fn main_menu_keyboard() -> Keyboard {
    Keyboard::single(Button::callback(
        "Main menu",
        vitrina_moderation::engine::callbacks::MAIN_MENU,
    ))
}

pub fn search_prompt() -> String {
    "Describe what you need in your own words, for example \
     \"a bot that takes bakery orders\"."
        .to_string()
}

/// Render the ranked results. The fallback path reports score 0 and those
/// are shown without a score line.
pub fn search_results_text(outcome: &SearchOutcome) -> String {
    if !outcome.found {
        let mut text = "No matching solutions found.".to_string();
        if !outcome.explanation.is_empty() {
            text.push('\n');
            text.push_str(&outcome.explanation);
        }
        return text;
    }

    let mut text = String::from("Here is what matches your request:\n");
    for hit in &outcome.results {
        text.push('\n');
        if hit.relevance_score > 0 {
            text.push_str(&format!(
                "{} ({}/10)\n{}\n",
                hit.summary.name, hit.relevance_score, hit.explanation
            ));
        } else {
            text.push_str(&format!("{}\n{}\n", hit.summary.name, hit.summary.description));
        }
    }
    if !outcome.explanation.is_empty() {
        text.push('\n');
        text.push_str(&outcome.explanation);
    }
    text
}

/// One view button per hit, plus the way back to the menu.
pub fn search_results_keyboard(outcome: &SearchOutcome) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = outcome
        .results
        .iter()
        .map(|hit| {
            vec![Button::callback(
                format!("View {}", hit.summary.name),
                callbacks::view_announcement(hit.summary.id),
            )]
        })
        .collect();
    rows.push(vec![Button::callback(
        "Main menu",
        vitrina_moderation::engine::callbacks::MAIN_MENU,
    )]);
    Keyboard::new(rows)
}

pub fn submitted_for_review() -> String {
    "Thank you. Your submission was sent to the moderators; \
     you will be notified as soon as it is reviewed."
        .to_string()
}

pub fn cancelled() -> String {
    "Cancelled. Nothing was saved.".to_string()
}

pub fn rejection_prompt(min_comment_len: usize) -> String {
    format!(
        "Please send the reason for rejection as a message \
         (at least {min_comment_len} characters). The author will see it."
    )
}

pub fn comment_too_short(min_len: usize) -> String {
    format!("The comment is too short. Please write at least {min_len} characters.")
}

pub fn already_handled() -> String {
    "This listing was already handled by another moderator.".to_string()
}

pub fn listing_gone() -> String {
    "This listing no longer exists.".to_string()
}

pub fn decision_recorded(approved: bool) -> String {
    if approved {
        "Approved. The author has been notified and the listing is published.".to_string()
    } else {
        "Rejected. The author has been notified with your comment.".to_string()
    }
}

pub fn not_allowed() -> String {
    "This action is available to moderators only.".to_string()
}

pub fn generic_error() -> String {
    "Something went wrong on our side. Please try again in a moment.".to_string()
}

pub fn unknown_input_hint() -> String {
    "Use the menu below to get started.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::types::{ListingSummary, SearchHit};

    fn outcome_with(hits: Vec<SearchHit>, found: bool) -> SearchOutcome {
        SearchOutcome {
            found,
            results: hits,
            explanation: "summary line".to_string(),
        }
    }

    fn hit(id: i64, score: u8) -> SearchHit {
        SearchHit {
            summary: ListingSummary {
                id,
                name: format!("Bot {id}"),
                description: format!("does thing {id}"),
            },
            relevance_score: score,
            explanation: "fits the request".to_string(),
        }
    }

    #[test]
    fn view_callback_round_trips() {
        assert_eq!(
            callbacks::parse_view(&callbacks::view_announcement(42)),
            Some(42)
        );
        assert_eq!(callbacks::parse_view("wizard:next"), None);
        assert_eq!(callbacks::parse_view("view:announcement:abc"), None);
    }

    #[test]
    fn start_menu_includes_channel_link_when_configured() {
        let with = start_menu_keyboard(Some("https://t.me/vitrina"));
        assert_eq!(with.rows.len(), 4);
        let without = start_menu_keyboard(None);
        assert_eq!(without.rows.len(), 3);
    }

    #[test]
    fn ranked_results_show_scores() {
        let text = search_results_text(&outcome_with(vec![hit(1, 9)], true));
        assert!(text.contains("Bot 1 (9/10)"));
        assert!(text.contains("fits the request"));
    }

    #[test]
    fn fallback_results_hide_zero_scores() {
        let text = search_results_text(&outcome_with(vec![hit(1, 0)], true));
        assert!(!text.contains("(0/10)"));
        assert!(text.contains("does thing 1"));
    }

    #[test]
    fn empty_outcome_reads_as_not_found() {
        let text = search_results_text(&outcome_with(Vec::new(), false));
        assert!(text.contains("No matching solutions"));
        assert!(text.contains("summary line"));
    }

    #[test]
    fn results_keyboard_has_view_button_per_hit() {
        let keyboard = search_results_keyboard(&outcome_with(vec![hit(1, 9), hit(2, 7)], true));
        // Two view rows plus the menu row.
        assert_eq!(keyboard.rows.len(), 3);
        assert_eq!(keyboard.rows[0][0].label, "View Bot 1");
    }
}
