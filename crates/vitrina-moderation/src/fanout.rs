// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort notification fan-out.
//!
//! Each recipient is attempted independently: a failing send is logged,
//! recorded in the report, and never aborts the loop. There are no retries;
//! partial failure is a first-class return value.

use tracing::warn;
use vitrina_core::types::{ChatId, DeliveryReport, Keyboard};
use vitrina_core::Transport;

/// Send `text` (with an optional keyboard) to every recipient.
pub async fn broadcast(
    transport: &dyn Transport,
    recipients: &[ChatId],
    text: &str,
    keyboard: Option<&Keyboard>,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for &chat in recipients {
        match transport.send_message(chat, text, keyboard.cloned()).await {
            Ok(_) => report.succeeded.push(chat),
            Err(e) => {
                warn!(chat_id = chat.0, error = %e, "fan-out delivery failed");
                report.failed.push(chat);
            }
        }
    }
    report
}
