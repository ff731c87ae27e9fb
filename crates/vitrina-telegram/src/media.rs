// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping Telegram media metadata into wizard attachment types.
//!
//! Only metadata crosses the boundary; the files themselves stay on
//! Telegram's servers. The wizard validates size and extension against
//! these records, and the stored `file_id`s ride along in the listing row.

use teloxide::types::{Document, Video};
use vitrina_core::types::{DocumentAttachment, VideoAttachment};

pub fn document_attachment(doc: &Document) -> DocumentAttachment {
    DocumentAttachment {
        file_id: doc.file.id.to_string(),
        file_name: doc
            .file_name
            .clone()
            .unwrap_or_else(|| "document".to_string()),
        file_size: u64::from(doc.file.size),
        mime_type: doc
            .mime_type
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

pub fn video_attachment(video: &Video) -> VideoAttachment {
    VideoAttachment {
        file_id: video.file.id.to_string(),
        file_name: video
            .file_name
            .clone()
            .unwrap_or_else(|| "video.mp4".to_string()),
        file_size: u64::from(video.file.size),
        mime_type: video
            .mime_type
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "video/mp4".to_string()),
        duration_secs: video.duration.seconds(),
    }
}
