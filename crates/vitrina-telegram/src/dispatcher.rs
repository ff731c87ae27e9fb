// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing: turns messages and callback queries into wizard events,
//! moderation actions, and search queries.
//!
//! The router is transport-agnostic so the whole conversation flow is
//! testable against a mock. Delivery failures are logged and swallowed;
//! the user-visible contract is "best effort, never crash the loop".

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};
use vitrina_core::types::{
    ChatId, DocumentAttachment, Keyboard, Listing, MessageRef, ResolveOutcome, UserId,
    VideoAttachment,
};
use vitrina_core::{ListingStore, Transport, VitrinaError};
use vitrina_moderation::engine::callbacks as mod_callbacks;
use vitrina_moderation::{BeginRejection, ModerationEngine, ModerationNotifier, RejectionOutcome};
use vitrina_search::SearchService;
use vitrina_wizard::event::{callbacks as wizard_callbacks, Outcome, Screen, WizardEvent};
use vitrina_wizard::SessionStore;

use crate::texts;

type ConversationKey = (UserId, ChatId);

/// Routes one conversation turn to the right subsystem.
pub struct Router {
    transport: Arc<dyn Transport>,
    sessions: Arc<SessionStore>,
    engine: Arc<ModerationEngine>,
    notifier: Arc<ModerationNotifier>,
    search: Arc<SearchService>,
    store: Arc<dyn ListingStore>,
    chat_url: Option<String>,
    /// Conversations whose next text message is a search query.
    awaiting_search: Mutex<HashSet<ConversationKey>>,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: Arc<dyn Transport>,
        sessions: Arc<SessionStore>,
        engine: Arc<ModerationEngine>,
        notifier: Arc<ModerationNotifier>,
        search: Arc<SearchService>,
        store: Arc<dyn ListingStore>,
        chat_url: Option<String>,
    ) -> Self {
        Self {
            transport,
            sessions,
            engine,
            notifier,
            search,
            store,
            chat_url,
            awaiting_search: Mutex::new(HashSet::new()),
        }
    }

    /// `/start`: drop any in-flight state and show the menu. This includes
    /// a moderator's half-typed rejection, so the next message can never
    /// land as an unintended comment.
    pub async fn handle_start(&self, user: UserId, chat: ChatId) {
        self.sessions.remove(user, chat).await;
        self.awaiting_search.lock().await.remove(&(user, chat));
        self.engine.cancel_rejection(user).await;
        self.send(
            chat,
            &texts::start_menu_text(),
            Some(texts::start_menu_keyboard(self.chat_url.as_deref())),
        )
        .await;
    }

    /// A plain text message. Routing order matters: a moderator typing a
    /// rejection comment wins over everything else, then a pending search
    /// query, then an active wizard.
    pub async fn handle_text(&self, user: UserId, chat: ChatId, text: &str) {
        if self.engine.is_moderator(user) && self.engine.pending_rejection(user).await.is_some() {
            self.handle_rejection_comment(user, chat, text).await;
            return;
        }

        if self.awaiting_search.lock().await.remove(&(user, chat)) {
            self.run_search(chat, text).await;
            return;
        }

        if self.sessions.has_session(user, chat).await {
            self.wizard_event(user, chat, WizardEvent::Text(text.to_string()), None)
                .await;
            return;
        }

        self.send(
            chat,
            &texts::unknown_input_hint(),
            Some(texts::start_menu_keyboard(self.chat_url.as_deref())),
        )
        .await;
    }

    pub async fn handle_document(&self, user: UserId, chat: ChatId, doc: DocumentAttachment) {
        if self.sessions.has_session(user, chat).await {
            self.wizard_event(user, chat, WizardEvent::Document(doc), None)
                .await;
        }
    }

    pub async fn handle_video(&self, user: UserId, chat: ChatId, video: VideoAttachment) {
        if self.sessions.has_session(user, chat).await {
            self.wizard_event(user, chat, WizardEvent::Video(video), None)
                .await;
        }
    }

    /// A callback button press. `anchor` is the message carrying the
    /// keyboard, used for in-place edits where it makes sense.
    pub async fn handle_callback(
        &self,
        user: UserId,
        chat: ChatId,
        anchor: Option<MessageRef>,
        data: &str,
    ) {
        match data {
            mod_callbacks::MAIN_MENU => {
                self.sessions.remove(user, chat).await;
                self.awaiting_search.lock().await.remove(&(user, chat));
                self.engine.cancel_rejection(user).await;
                self.say(
                    chat,
                    anchor,
                    &texts::start_menu_text(),
                    Some(texts::start_menu_keyboard(self.chat_url.as_deref())),
                )
                .await;
                return;
            }
            texts::callbacks::ADD_ANNOUNCEMENT => {
                let screen = self.sessions.start_announcement(user, chat).await;
                self.render_screen(user, chat, screen, anchor).await;
                return;
            }
            texts::callbacks::CUSTOM_REQUEST => {
                let screen = self.sessions.start_custom_request(user, chat).await;
                self.render_screen(user, chat, screen, anchor).await;
                return;
            }
            texts::callbacks::SMART_SEARCH => {
                self.awaiting_search.lock().await.insert((user, chat));
                self.say(
                    chat,
                    anchor,
                    &texts::search_prompt(),
                    Some(texts::main_menu_keyboard()),
                )
                .await;
                return;
            }
            _ => {}
        }

        if let Some(event) = wizard_callbacks::parse(data) {
            self.wizard_event(user, chat, event, anchor).await;
            return;
        }

        if let Some(action) = mod_callbacks::parse(data) {
            self.handle_moderation_action(user, chat, anchor, action)
                .await;
            return;
        }

        if let Some(id) = texts::callbacks::parse_view(data) {
            self.show_announcement(chat, id).await;
            return;
        }

        debug!(data, "ignoring unknown callback payload");
    }

    // --- wizard ---

    async fn wizard_event(
        &self,
        user: UserId,
        chat: ChatId,
        event: WizardEvent,
        anchor: Option<MessageRef>,
    ) {
        let Some((outcome, screen)) = self.sessions.apply(user, chat, event).await else {
            debug!(user_id = user.0, "wizard event without an active session");
            return;
        };

        match outcome {
            Outcome::Continue => {
                if let Some(screen) = screen {
                    self.render_screen(user, chat, screen, anchor).await;
                }
            }
            // The form stays on screen; the reason goes out as its own
            // message so the user can fix and resend.
            Outcome::Invalid(reason) => {
                self.send(chat, &reason, None).await;
            }
            Outcome::CompletedAnnouncement(draft) => {
                match self.store.create_announcement(*draft).await {
                    Ok(created) => {
                        self.finish_submission(chat, anchor, Listing::Announcement(created))
                            .await;
                    }
                    Err(e) => self.submission_failed(chat, anchor, e).await,
                }
            }
            Outcome::CompletedCustomRequest(draft) => {
                match self.store.create_custom_request(draft).await {
                    Ok(created) => {
                        self.finish_submission(chat, anchor, Listing::CustomRequest(created))
                            .await;
                    }
                    Err(e) => self.submission_failed(chat, anchor, e).await,
                }
            }
            Outcome::Cancelled => {
                self.say(
                    chat,
                    anchor,
                    &texts::cancelled(),
                    Some(texts::start_menu_keyboard(self.chat_url.as_deref())),
                )
                .await;
            }
        }
    }

    async fn finish_submission(&self, chat: ChatId, anchor: Option<MessageRef>, listing: Listing) {
        self.say(
            chat,
            anchor,
            &texts::submitted_for_review(),
            Some(texts::main_menu_keyboard()),
        )
        .await;
        self.notifier.announce_submission(&listing).await;
    }

    async fn submission_failed(&self, chat: ChatId, anchor: Option<MessageRef>, e: VitrinaError) {
        // The session is already gone; the user starts the form over.
        warn!(error = %e, "failed to persist a completed submission");
        self.say(
            chat,
            anchor,
            &texts::generic_error(),
            Some(texts::main_menu_keyboard()),
        )
        .await;
    }

    /// Edit the bound wizard message in place, falling back to a fresh send
    /// (and re-bind) when the handle went stale.
    async fn render_screen(
        &self,
        user: UserId,
        chat: ChatId,
        screen: Screen,
        anchor: Option<MessageRef>,
    ) {
        let target = match self.sessions.bound(user, chat).await {
            Some(handle) => Some(handle),
            None => anchor,
        };

        if let Some(handle) = target {
            match self
                .transport
                .edit_message(&handle, &screen.text, screen.keyboard.clone())
                .await
            {
                Ok(handle) => {
                    self.sessions.bind(user, chat, handle).await;
                    return;
                }
                Err(VitrinaError::StaleHandle) => {
                    debug!(chat_id = chat.0, "wizard message went stale, re-sending");
                }
                Err(e) => {
                    warn!(chat_id = chat.0, error = %e, "failed to render wizard screen");
                    return;
                }
            }
        }

        match self
            .transport
            .send_message(chat, &screen.text, screen.keyboard)
            .await
        {
            Ok(handle) => self.sessions.bind(user, chat, handle).await,
            Err(e) => warn!(chat_id = chat.0, error = %e, "failed to send wizard screen"),
        }
    }

    // --- moderation ---

    async fn handle_moderation_action(
        &self,
        user: UserId,
        chat: ChatId,
        anchor: Option<MessageRef>,
        action: mod_callbacks::ModerationAction,
    ) {
        match action {
            mod_callbacks::ModerationAction::Approve(listing) => {
                match self.engine.approve(listing, user).await {
                    Ok(ResolveOutcome::Resolved(resolved)) => {
                        self.notifier.notify_resolution(&resolved, user).await;
                        self.say(chat, anchor, &texts::decision_recorded(true), None)
                            .await;
                    }
                    Ok(ResolveOutcome::AlreadyProcessed) => {
                        self.say(chat, anchor, &texts::already_handled(), None).await;
                    }
                    Ok(ResolveOutcome::NotFound) => {
                        self.say(chat, anchor, &texts::listing_gone(), None).await;
                    }
                    Err(VitrinaError::Unauthorized) => {
                        self.send(chat, &texts::not_allowed(), None).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "approve failed");
                        self.send(chat, &texts::generic_error(), None).await;
                    }
                }
            }
            mod_callbacks::ModerationAction::Reject(listing) => {
                match self.engine.begin_rejection(listing, user).await {
                    Ok(BeginRejection::Prompt) => {
                        self.send(
                            chat,
                            &texts::rejection_prompt(self.engine.min_comment_len()),
                            None,
                        )
                        .await;
                    }
                    Ok(BeginRejection::AlreadyProcessed) => {
                        self.say(chat, anchor, &texts::already_handled(), None).await;
                    }
                    Ok(BeginRejection::NotFound) => {
                        self.say(chat, anchor, &texts::listing_gone(), None).await;
                    }
                    Err(VitrinaError::Unauthorized) => {
                        self.send(chat, &texts::not_allowed(), None).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "begin rejection failed");
                        self.send(chat, &texts::generic_error(), None).await;
                    }
                }
            }
        }
    }

    async fn handle_rejection_comment(&self, user: UserId, chat: ChatId, comment: &str) {
        match self.engine.submit_rejection_comment(user, comment).await {
            Ok(RejectionOutcome::Rejected(listing)) => {
                self.notifier.notify_resolution(&listing, user).await;
                self.send(chat, &texts::decision_recorded(false), None).await;
            }
            Ok(RejectionOutcome::CommentTooShort { min_len }) => {
                self.send(chat, &texts::comment_too_short(min_len), None).await;
            }
            Ok(RejectionOutcome::AlreadyProcessed) => {
                self.send(chat, &texts::already_handled(), None).await;
            }
            Ok(RejectionOutcome::NotFound) => {
                self.send(chat, &texts::listing_gone(), None).await;
            }
            Ok(RejectionOutcome::NoPendingPrompt) => {
                // Raced with ourselves; nothing sensible to say.
            }
            Err(e) => {
                warn!(error = %e, "rejection comment failed");
                self.send(chat, &texts::generic_error(), None).await;
            }
        }
    }

    // --- search ---

    async fn run_search(&self, chat: ChatId, query: &str) {
        let candidates = match self.store.list_approved_announcements().await {
            Ok(listings) => listings
                .iter()
                .map(|a| a.summary())
                .collect::<Vec<_>>(),
            Err(e) => {
                warn!(error = %e, "failed to load search candidates");
                self.send(chat, &texts::generic_error(), None).await;
                return;
            }
        };

        let outcome = self.search.search(query, &candidates).await;
        self.send(
            chat,
            &texts::search_results_text(&outcome),
            Some(texts::search_results_keyboard(&outcome)),
        )
        .await;
    }

    async fn show_announcement(&self, chat: ChatId, id: i64) {
        let listing_ref = vitrina_core::types::ListingRef {
            kind: vitrina_core::types::ListingKind::Announcement,
            id,
        };
        match self.store.get(listing_ref).await {
            Ok(Some(listing)) => {
                let body = vitrina_moderation::format::publication_card(&listing);
                self.send(chat, &body, Some(texts::main_menu_keyboard())).await;
            }
            Ok(None) => {
                self.send(chat, &texts::listing_gone(), None).await;
            }
            Err(e) => {
                warn!(error = %e, listing_id = id, "failed to load announcement");
                self.send(chat, &texts::generic_error(), None).await;
            }
        }
    }

    // --- delivery helpers ---

    async fn send(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) {
        if let Err(e) = self.transport.send_message(chat, text, keyboard).await {
            warn!(chat_id = chat.0, error = %e, "failed to send message");
        }
    }

    /// Edit `anchor` when present, otherwise send fresh. A stale anchor
    /// degrades to a fresh send.
    async fn say(
        &self,
        chat: ChatId,
        anchor: Option<MessageRef>,
        text: &str,
        keyboard: Option<Keyboard>,
    ) {
        if let Some(handle) = anchor {
            match self
                .transport
                .edit_message(&handle, text, keyboard.clone())
                .await
            {
                Ok(_) => return,
                Err(VitrinaError::StaleHandle) => {}
                Err(e) => {
                    warn!(chat_id = chat.0, error = %e, "failed to edit message");
                    return;
                }
            }
        }
        self.send(chat, text, keyboard).await;
    }
}
