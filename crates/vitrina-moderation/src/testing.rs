// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements [`Transport`] with captured outbound messages
//! and per-chat failure injection, so fan-out isolation and notification
//! ordering can be asserted without a live chat platform.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use vitrina_core::types::{ChatId, Keyboard, MessageRef};
use vitrina_core::{Transport, VitrinaError};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub topic: Option<i64>,
    /// Set when the message was produced by `edit_message`.
    pub edited: Option<MessageRef>,
}

/// A mock transport capturing everything it is asked to send.
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<i64>>,
    stale: Mutex<HashSet<i64>>,
    next_id: AtomicI64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sends fail for this chat from now on.
    pub async fn fail_chat(&self, chat: ChatId) {
        self.failing.lock().await.insert(chat.0);
    }

    /// Edits of this message id fail with `StaleHandle`.
    pub async fn mark_stale(&self, message_id: i64) {
        self.stale.lock().await.insert(message_id);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Messages delivered to one chat, in order.
    pub async fn sent_to(&self, chat: ChatId) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat == chat)
            .cloned()
            .collect()
    }

    async fn check_failing(&self, chat: ChatId) -> Result<(), VitrinaError> {
        if self.failing.lock().await.contains(&chat.0) {
            Err(VitrinaError::Transport {
                message: format!("mock failure for chat {}", chat.0),
                source: None,
            })
        } else {
            Ok(())
        }
    }

    fn next_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef {
            chat,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError> {
        self.check_failing(chat).await?;
        self.sent.lock().await.push(SentMessage {
            chat,
            text: text.to_string(),
            keyboard,
            topic: None,
            edited: None,
        });
        Ok(self.next_ref(chat))
    }

    async fn edit_message(
        &self,
        handle: &MessageRef,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError> {
        if self.stale.lock().await.contains(&handle.message_id) {
            return Err(VitrinaError::StaleHandle);
        }
        self.check_failing(handle.chat).await?;
        self.sent.lock().await.push(SentMessage {
            chat: handle.chat,
            text: text.to_string(),
            keyboard,
            topic: None,
            edited: Some(*handle),
        });
        Ok(*handle)
    }

    async fn delete_message(&self, _handle: &MessageRef) -> Result<(), VitrinaError> {
        Ok(())
    }

    async fn send_topic_message(
        &self,
        chat: ChatId,
        topic: Option<i64>,
        text: &str,
    ) -> Result<MessageRef, VitrinaError> {
        self.check_failing(chat).await?;
        self.sent.lock().await.push(SentMessage {
            chat,
            text: text.to_string(),
            keyboard: None,
            topic,
            edited: None,
        });
        Ok(self.next_ref(chat))
    }
}
