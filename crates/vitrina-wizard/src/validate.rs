// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field and attachment validation shared by both wizard flows.

use vitrina_core::types::{DocumentAttachment, VideoAttachment};

/// Maximum attachment size. Exactly this many bytes is accepted; one byte
/// more is rejected.
pub const MAX_ATTACHMENT_BYTES: u64 = 50 * 1024 * 1024;

/// Extensions accepted as document attachments. Images ride along as
/// documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "xls", "xlsx", "ppt", "pptx", "zip", "jpg", "jpeg",
    "png", "gif", "webp",
];

/// Extensions accepted as video attachments.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

/// Minimum length for short answer fields.
pub const MIN_FIELD_LEN: usize = 3;

/// Minimum length for the descriptive custom-request fields.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Minimum length for the budget answer.
pub const MIN_BUDGET_LEN: usize = 2;

/// Check a free-text answer against a minimum length floor.
pub fn check_min_len(value: &str, min: usize, what: &str) -> Result<(), String> {
    if value.trim().chars().count() < min {
        Err(format!(
            "{what} is too short: please enter at least {min} characters."
        ))
    } else {
        Ok(())
    }
}

/// Prices must be readable by moderators, not a side channel to dodge the
/// platform. Any embedded contact link disqualifies the answer.
pub fn contains_contact_link(value: &str) -> bool {
    let lower = value.to_lowercase();
    ["http://", "https://", "t.me/", "@"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Loose URL check for the demo-link slot in the attachments step.
pub fn looks_like_url(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("t.me/")
}

fn extension_of(file_name: &str) -> Option<String> {
    file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

fn check_extension(file_name: &str, allowed: &[&str]) -> Result<(), String> {
    match extension_of(file_name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(format!(
            "File type is not supported. Accepted extensions: {}.",
            allowed.join(", ")
        )),
    }
}

fn check_size(file_size: u64) -> Result<(), String> {
    if file_size > MAX_ATTACHMENT_BYTES {
        Err("File is too large: the limit is 50 MB.".to_string())
    } else {
        Ok(())
    }
}

/// Validate a document attachment against the size cap and allow-list.
pub fn validate_document(doc: &DocumentAttachment) -> Result<(), String> {
    check_size(doc.file_size)?;
    check_extension(&doc.file_name, DOCUMENT_EXTENSIONS)
}

/// Validate a video attachment against the size cap and allow-list.
pub fn validate_video(video: &VideoAttachment) -> Result<(), String> {
    check_size(video.file_size)?;
    check_extension(&video.file_name, VIDEO_EXTENSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, size: u64) -> DocumentAttachment {
        DocumentAttachment {
            file_id: "f".to_string(),
            file_name: name.to_string(),
            file_size: size,
            mime_type: "application/octet-stream".to_string(),
        }
    }

    fn video(name: &str, size: u64) -> VideoAttachment {
        VideoAttachment {
            file_id: "f".to_string(),
            file_name: name.to_string(),
            file_size: size,
            mime_type: "video/mp4".to_string(),
            duration_secs: 30,
        }
    }

    #[test]
    fn size_boundary_is_exact() {
        assert!(validate_document(&doc("a.pdf", MAX_ATTACHMENT_BYTES)).is_ok());
        assert!(validate_document(&doc("a.pdf", MAX_ATTACHMENT_BYTES + 1)).is_err());
        assert!(validate_video(&video("a.mp4", MAX_ATTACHMENT_BYTES)).is_ok());
        assert!(validate_video(&video("a.mp4", MAX_ATTACHMENT_BYTES + 1)).is_err());
    }

    #[test]
    fn rejection_echoes_allow_list() {
        let err = validate_document(&doc("malware.exe", 10)).unwrap_err();
        for ext in DOCUMENT_EXTENSIONS {
            assert!(err.contains(ext), "allow-list missing {ext}: {err}");
        }
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(validate_document(&doc("Pitch.PDF", 10)).is_ok());
        assert!(validate_video(&video("demo.MP4", 10)).is_ok());
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(validate_document(&doc("README", 10)).is_err());
    }

    #[test]
    fn video_extension_not_valid_as_document() {
        assert!(validate_document(&doc("demo.mp4", 10)).is_err());
        assert!(validate_video(&video("pitch.pdf", 10)).is_err());
    }

    #[test]
    fn contact_links_in_price_are_caught() {
        assert!(contains_contact_link("write me at t.me/seller"));
        assert!(contains_contact_link("https://my.site/prices"));
        assert!(contains_contact_link("DM @seller for price"));
        assert!(!contains_contact_link("1500 USD negotiable"));
    }

    #[test]
    fn url_detection_for_demo_links() {
        assert!(looks_like_url("https://example.com/demo"));
        assert!(looks_like_url("t.me/my_demo_bot"));
        assert!(!looks_like_url("just a sentence"));
    }

    #[test]
    fn min_len_counts_chars_not_bytes() {
        assert!(check_min_len("ab", 3, "Answer").is_err());
        assert!(check_min_len("abc", 3, "Answer").is_ok());
        assert!(check_min_len("  abc  ", 3, "Answer").is_ok());
    }
}
