// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory form sessions, one per `(user, chat)` pair.
//!
//! Sessions live behind a single tokio mutex, which serializes all wizard
//! transitions for a conversation. They are deliberately not persisted: a
//! restart drops half-finished forms and the user starts over.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;
use vitrina_core::types::{ChatId, MessageRef, UserId};

use crate::announcement::AnnouncementWizard;
use crate::custom_request::CustomRequestWizard;
use crate::event::{Outcome, Screen, WizardEvent};

/// One active wizard of either flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSession {
    Announcement(AnnouncementWizard),
    CustomRequest(CustomRequestWizard),
}

impl FormSession {
    pub fn apply(&mut self, event: WizardEvent) -> Outcome {
        match self {
            FormSession::Announcement(w) => w.apply(event),
            FormSession::CustomRequest(w) => w.apply(event),
        }
    }

    pub fn screen(&self) -> Screen {
        match self {
            FormSession::Announcement(w) => w.screen(),
            FormSession::CustomRequest(w) => w.screen(),
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    session: FormSession,
    /// The message the wizard renders into, once known.
    bound: Option<MessageRef>,
}

type SessionKey = (UserId, ChatId);

/// Shared registry of active form sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<SessionKey, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the announcement wizard for this conversation and
    /// return its first screen. An existing session of either flow is
    /// replaced.
    pub async fn start_announcement(&self, user: UserId, chat: ChatId) -> Screen {
        let session = FormSession::Announcement(AnnouncementWizard::new(user, chat));
        self.start(user, chat, session).await
    }

    /// Start (or restart) the custom-request wizard.
    pub async fn start_custom_request(&self, user: UserId, chat: ChatId) -> Screen {
        let session = FormSession::CustomRequest(CustomRequestWizard::new(user, chat));
        self.start(user, chat, session).await
    }

    async fn start(&self, user: UserId, chat: ChatId, session: FormSession) -> Screen {
        let screen = session.screen();
        let mut sessions = self.inner.lock().await;
        if sessions
            .insert((user, chat), SessionEntry { session, bound: None })
            .is_some()
        {
            debug!(user_id = user.0, chat_id = chat.0, "replaced existing form session");
        }
        screen
    }

    /// Feed one event into the conversation's session, if any.
    ///
    /// Terminal outcomes (`Completed*`, `Cancelled`) remove the session;
    /// the caller is responsible for persisting a completed draft. Returns
    /// `None` when no session exists, together with nothing to render.
    pub async fn apply(
        &self,
        user: UserId,
        chat: ChatId,
        event: WizardEvent,
    ) -> Option<(Outcome, Option<Screen>)> {
        let mut sessions = self.inner.lock().await;
        let entry = sessions.get_mut(&(user, chat))?;
        let outcome = entry.session.apply(event);
        match &outcome {
            Outcome::CompletedAnnouncement(_)
            | Outcome::CompletedCustomRequest(_)
            | Outcome::Cancelled => {
                sessions.remove(&(user, chat));
                Some((outcome, None))
            }
            Outcome::Continue => {
                let screen = entry.session.screen();
                Some((outcome, Some(screen)))
            }
            // Invalid leaves the state (and thus the screen) unchanged.
            Outcome::Invalid(_) => Some((outcome, None)),
        }
    }

    /// True when this conversation has an active wizard.
    pub async fn has_session(&self, user: UserId, chat: ChatId) -> bool {
        self.inner.lock().await.contains_key(&(user, chat))
    }

    /// Bind the rendered message so later steps can edit it in place.
    pub async fn bind(&self, user: UserId, chat: ChatId, handle: MessageRef) {
        if let Some(entry) = self.inner.lock().await.get_mut(&(user, chat)) {
            entry.bound = Some(handle);
        }
    }

    /// The bound message handle, if rendering has happened.
    pub async fn bound(&self, user: UserId, chat: ChatId) -> Option<MessageRef> {
        self.inner.lock().await.get(&(user, chat)).and_then(|e| e.bound)
    }

    /// Discard the session without feeding a Cancel event.
    pub async fn remove(&self, user: UserId, chat: ChatId) {
        self.inner.lock().await.remove(&(user, chat));
    }
}
