// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-decision side effects: submitter notification, moderator fan-out,
//! and channel publication.
//!
//! Everything here is best-effort. The decision is already durable by the
//! time this module runs; a failed send or a failed publication is logged
//! and reported, never rolled back.

use std::sync::Arc;

use tracing::{info, warn};
use vitrina_core::types::{
    Button, ChatId, DeliveryReport, Keyboard, Listing, ModerationStatus, UserId,
};
use vitrina_core::Transport;

use crate::engine::callbacks;
use crate::fanout::broadcast;
use crate::format;

/// Where approved listings are published, if anywhere.
#[derive(Debug, Clone, Default)]
pub struct PublicationTarget {
    pub chat_id: Option<ChatId>,
    pub topic_id: Option<i64>,
    pub chat_url: Option<String>,
}

/// Orchestrates the messaging around submissions and decisions.
pub struct ModerationNotifier {
    transport: Arc<dyn Transport>,
    moderators: Vec<UserId>,
    publication: PublicationTarget,
}

impl ModerationNotifier {
    pub fn new(
        transport: Arc<dyn Transport>,
        moderators: Vec<UserId>,
        publication: PublicationTarget,
    ) -> Self {
        Self {
            transport,
            moderators,
            publication,
        }
    }

    fn moderator_chats(&self, except: Option<UserId>) -> Vec<ChatId> {
        self.moderators
            .iter()
            .filter(|m| Some(**m) != except)
            .map(|m| ChatId(m.0))
            .collect()
    }

    /// Review keyboard: approve, reject, and a deep link to the author.
    fn review_keyboard(&self, listing: &Listing) -> Keyboard {
        let listing_ref = listing.listing_ref();
        Keyboard::new(vec![
            vec![
                Button::callback("Approve", callbacks::approve(listing_ref)),
                Button::callback("Reject", callbacks::reject(listing_ref)),
            ],
            vec![Button::url(
                "Contact the author",
                format!("tg://user?id={}", listing.user_id().0),
            )],
        ])
    }

    /// Fan a freshly created listing out to every moderator for review.
    pub async fn announce_submission(&self, listing: &Listing) -> DeliveryReport {
        let card = format::moderation_card(listing);
        let keyboard = self.review_keyboard(listing);
        let report = broadcast(
            self.transport.as_ref(),
            &self.moderator_chats(None),
            &card,
            Some(&keyboard),
        )
        .await;
        info!(
            listing_id = listing.id(),
            kind = %listing.kind(),
            delivered = report.succeeded.len(),
            failed = report.failed.len(),
            "submission announced to moderators"
        );
        report
    }

    /// Tell the submitter, publish on approval, and let the other
    /// moderators know the queue entry is gone.
    ///
    /// Returns the fan-out report for the moderator heads-up.
    pub async fn notify_resolution(
        &self,
        listing: &Listing,
        deciding_moderator: UserId,
    ) -> DeliveryReport {
        let approved = listing.status() == ModerationStatus::Approved;

        // Submitter first; they are the one waiting.
        let user_text = if approved {
            format::user_approved_text(listing, self.publication.chat_url.as_deref())
        } else {
            let comment = listing.rejection_comment().unwrap_or("no comment given");
            format::user_rejected_text(listing, comment)
        };
        let menu = Keyboard::single(Button::callback("Main menu", callbacks::MAIN_MENU));
        if let Err(e) = self
            .transport
            .send_message(listing.chat_id(), &user_text, Some(menu))
            .await
        {
            warn!(
                listing_id = listing.id(),
                chat_id = listing.chat_id().0,
                error = %e,
                "failed to notify submitter of the decision"
            );
        }

        if approved {
            self.publish(listing).await;
        }

        let heads_up = format::moderator_resolution_text(listing, approved);
        broadcast(
            self.transport.as_ref(),
            &self.moderator_chats(Some(deciding_moderator)),
            &heads_up,
            None,
        )
        .await
    }

    /// Post the approved listing to the configured channel/topic. A missing
    /// target silently skips; a failed post is logged and forgotten.
    async fn publish(&self, listing: &Listing) {
        let Some(chat_id) = self.publication.chat_id else {
            return;
        };
        let card = format::publication_card(listing);
        match self
            .transport
            .send_topic_message(chat_id, self.publication.topic_id, &card)
            .await
        {
            Ok(_) => info!(
                listing_id = listing.id(),
                kind = %listing.kind(),
                chat_id = chat_id.0,
                "listing published"
            ),
            Err(e) => warn!(
                listing_id = listing.id(),
                chat_id = chat_id.0,
                error = %e,
                "publication failed; decision stands"
            ),
        }
    }
}
