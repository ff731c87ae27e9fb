// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Transport`] implementation over the Telegram Bot API via teloxide.
//!
//! Sends try MarkdownV2 first and fall back to plain text when the escaped
//! body still fails to parse. Edit errors are classified by message text:
//! "message is not modified" is success, a gone or locked target message is
//! [`VitrinaError::StaleHandle`] so callers can re-send and re-bind.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode, Recipient, ThreadId,
};
use tracing::{debug, warn};
use vitrina_core::types::{Button, ButtonAction, ChatId, Keyboard, MessageRef};
use vitrina_core::{Transport, VitrinaError};

use crate::markdown;

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(token: &str) -> Result<Self, VitrinaError> {
        if token.is_empty() {
            return Err(VitrinaError::Config("bot.token cannot be empty".into()));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn recipient(chat: ChatId) -> Recipient {
    Recipient::Id(teloxide::types::ChatId(chat.0))
}

fn message_ref(chat: ChatId, id: MessageId) -> MessageRef {
    MessageRef {
        chat,
        message_id: i64::from(id.0),
    }
}

fn to_button(button: &Button) -> InlineKeyboardButton {
    match &button.action {
        ButtonAction::Callback(data) => {
            InlineKeyboardButton::callback(button.label.clone(), data.clone())
        }
        ButtonAction::Url(url) => match reqwest::Url::parse(url) {
            Ok(parsed) => InlineKeyboardButton::url(button.label.clone(), parsed),
            Err(e) => {
                warn!(url = %url, error = %e, "unparseable button URL, degrading to callback");
                InlineKeyboardButton::callback(button.label.clone(), "noop".to_string())
            }
        },
    }
}

fn to_inline_keyboard(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        keyboard
            .rows
            .iter()
            .map(|row| row.iter().map(to_button).collect::<Vec<_>>()),
    )
}

fn transport_error(
    context: &str,
    e: teloxide::RequestError,
) -> VitrinaError {
    VitrinaError::Transport {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Edit failures that mean the target message is gone for good.
fn is_stale_edit_error(message: &str) -> bool {
    message.contains("message to edit not found") || message.contains("message can't be edited")
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError> {
        let escaped = markdown::escape_markdown_v2(text);
        let markup = keyboard.as_ref().map(to_inline_keyboard);

        let mut request = self
            .bot
            .send_message(recipient(chat), &escaped)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }

        match request.await {
            Ok(sent) => Ok(message_ref(chat, sent.id)),
            Err(e) => {
                warn!(chat_id = chat.0, error = %e, "MarkdownV2 send failed, retrying as plain text");
                let mut retry = self.bot.send_message(recipient(chat), text);
                if let Some(markup) = markup {
                    retry = retry.reply_markup(markup);
                }
                let sent = retry
                    .await
                    .map_err(|e| transport_error("failed to send message", e))?;
                Ok(message_ref(chat, sent.id))
            }
        }
    }

    async fn edit_message(
        &self,
        handle: &MessageRef,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, VitrinaError> {
        let chat_id = teloxide::types::ChatId(handle.chat.0);
        let msg_id = MessageId(handle.message_id as i32);
        let escaped = markdown::escape_markdown_v2(text);
        let markup = keyboard.as_ref().map(to_inline_keyboard);

        let mut request = self
            .bot
            .edit_message_text(chat_id, msg_id, &escaped)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }

        match request.await {
            Ok(_) => Ok(*handle),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("message is not modified") {
                    return Ok(*handle);
                }
                if is_stale_edit_error(&err_str) {
                    debug!(
                        chat_id = handle.chat.0,
                        message_id = handle.message_id,
                        "edit target gone, reporting stale handle"
                    );
                    return Err(VitrinaError::StaleHandle);
                }
                if err_str.contains("can't parse entities") {
                    warn!(error = %e, "MarkdownV2 edit failed, retrying as plain text");
                    let mut retry = self.bot.edit_message_text(chat_id, msg_id, text);
                    if let Some(markup) = markup {
                        retry = retry.reply_markup(markup);
                    }
                    retry
                        .await
                        .map_err(|e| transport_error("failed to edit message", e))?;
                    return Ok(*handle);
                }
                Err(transport_error("failed to edit message", e))
            }
        }
    }

    async fn delete_message(&self, handle: &MessageRef) -> Result<(), VitrinaError> {
        self.bot
            .delete_message(
                teloxide::types::ChatId(handle.chat.0),
                MessageId(handle.message_id as i32),
            )
            .await
            .map_err(|e| transport_error("failed to delete message", e))?;
        Ok(())
    }

    async fn send_topic_message(
        &self,
        chat: ChatId,
        topic: Option<i64>,
        text: &str,
    ) -> Result<MessageRef, VitrinaError> {
        let escaped = markdown::escape_markdown_v2(text);
        let mut request = self
            .bot
            .send_message(recipient(chat), &escaped)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(topic) = topic {
            request = request.message_thread_id(ThreadId(MessageId(topic as i32)));
        }
        let sent = request
            .await
            .map_err(|e| transport_error("failed to send topic message", e))?;
        Ok(message_ref(chat, sent.id))
    }
}
