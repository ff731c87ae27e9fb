// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 escaping for Telegram Bot API.
//!
//! Listing bodies and prompts are plain prose typed by users, never intended
//! markdown, so every special character is escaped, backticks included. A
//! stray `*` in a price or a `.` in a URL must not break the parse.

/// Characters Telegram requires escaped in MarkdownV2 text.
const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes text for Telegram MarkdownV2 parse mode.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string() {
        assert_eq!(escape_markdown_v2(""), "");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_markdown_v2("Hello world"), "Hello world");
    }

    #[test]
    fn escapes_all_special_characters() {
        let input = "_*[]()~`>#+-=|{}.!";
        let expected = "\\_\\*\\[\\]\\(\\)\\~\\`\\>\\#\\+\\-\\=\\|\\{\\}\\.\\!";
        assert_eq!(escape_markdown_v2(input), expected);
    }

    #[test]
    fn escapes_urls_in_prose() {
        let input = "Demo: https://example.com/demo";
        assert_eq!(
            escape_markdown_v2(input),
            "Demo: https://example\\.com/demo"
        );
    }

    #[test]
    fn escapes_prices_and_punctuation() {
        assert_eq!(escape_markdown_v2("100-200 USD!"), "100\\-200 USD\\!");
    }

    #[test]
    fn keeps_unicode_intact() {
        assert_eq!(escape_markdown_v2("кофейня №1."), "кофейня №1\\.");
    }
}
