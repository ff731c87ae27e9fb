// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for the chat platform boundary.

use async_trait::async_trait;

use crate::error::VitrinaError;
use crate::types::{ChatId, Keyboard, MessageRef};

/// Outbound side of the chat transport (Telegram in production, a mock in
/// tests). Every method is a suspension point; callers must not hold
/// unvalidated shared state across a call.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a new message and returns its handle.
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError>;

    /// Edits a previously sent message in place.
    ///
    /// Fails with [`VitrinaError::StaleHandle`] when the message can no
    /// longer be edited; callers fall back to [`Transport::send_message`].
    async fn edit_message(
        &self,
        handle: &MessageRef,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError>;

    /// Deletes a message. Best-effort; failures are reported but callers
    /// are expected to ignore them.
    async fn delete_message(&self, handle: &MessageRef) -> Result<(), VitrinaError>;

    /// Posts into a forum topic of a public channel. `topic == None` posts
    /// to the channel's main thread.
    async fn send_topic_message(
        &self,
        chat: ChatId,
        topic: Option<i64>,
        text: &str,
    ) -> Result<MessageRef, VitrinaError>;
}
