// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for the Vitrina marketplace bot.
//!
//! [`TelegramTransport`] implements the outbound [`vitrina_core::Transport`]
//! over teloxide; [`Router`] turns inbound updates into wizard, moderation
//! and search actions; [`run_polling`] wires both into a long-polling loop.

pub mod dispatcher;
pub mod markdown;
pub mod media;
pub mod texts;
pub mod transport;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatKind;
use tracing::{debug, info};
use vitrina_core::types::{ChatId as CoreChatId, MessageRef, UserId};

pub use dispatcher::Router;
pub use transport::TelegramTransport;

async fn dispatch_message(router: &Router, msg: &Message) {
    // The bot only converses in DMs; group noise is dropped here.
    if !matches!(msg.chat.kind, ChatKind::Private(_)) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return;
    }
    let Some(user) = msg.from.as_ref() else {
        return;
    };
    let user_id = UserId(user.id.0 as i64);
    let chat_id = CoreChatId(msg.chat.id.0);

    if let Some(text) = msg.text() {
        if text.trim_start().starts_with("/start") {
            router.handle_start(user_id, chat_id).await;
        } else {
            router.handle_text(user_id, chat_id, text).await;
        }
        return;
    }
    if let Some(doc) = msg.document() {
        router
            .handle_document(user_id, chat_id, media::document_attachment(doc))
            .await;
        return;
    }
    if let Some(video) = msg.video() {
        router
            .handle_video(user_id, chat_id, media::video_attachment(video))
            .await;
        return;
    }
    debug!(msg_id = msg.id.0, "ignoring unsupported message type");
}

async fn dispatch_callback(router: &Router, q: &CallbackQuery) {
    let Some(data) = q.data.as_deref() else {
        return;
    };
    let user_id = UserId(q.from.id.0 as i64);
    let anchor = q.message.as_ref().map(|m| MessageRef {
        chat: CoreChatId(m.chat().id.0),
        message_id: i64::from(m.id().0),
    });
    // Callbacks always originate from a DM with the bot, so the user id
    // doubles as the chat id when the source message is inaccessible.
    let chat_id = anchor.map(|a| a.chat).unwrap_or(CoreChatId(user_id.0));
    router.handle_callback(user_id, chat_id, anchor, data).await;
}

/// Long-poll Telegram and feed every update through the router. Runs until
/// the process is interrupted.
pub async fn run_polling(bot: Bot, router: Arc<Router>) {
    info!("starting Telegram long polling");

    let message_router = router.clone();
    let callback_router = router;

    let handler = teloxide::dptree::entry()
        .branch(Update::filter_message().endpoint(move |msg: Message| {
            let router = message_router.clone();
            async move {
                dispatch_message(&router, &msg).await;
                respond(())
            }
        }))
        .branch(
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let router = callback_router.clone();
                async move {
                    // Stop the client-side spinner before doing any work.
                    let _ = bot.answer_callback_query(q.id.clone()).await;
                    dispatch_callback(&router, &q).await;
                    respond(())
                }
            }),
        );

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {}) // Silently ignore other update kinds
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
