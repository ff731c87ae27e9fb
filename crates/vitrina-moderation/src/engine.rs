// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The moderation engine: authorization, the at-most-once decision, and the
//! per-moderator rejection sub-state.
//!
//! The pending check before a decision is advisory only. The authoritative
//! check runs inside the store's `resolve` transaction, so the engine never
//! caches "still pending" across an await point.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use vitrina_core::types::{Decision, Listing, ListingKind, ListingRef, ResolveOutcome, UserId};
use vitrina_core::{ListingStore, VitrinaError};

/// Result of starting a rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum BeginRejection {
    /// Ask the moderator for a comment; the sub-state is recorded.
    Prompt,
    AlreadyProcessed,
    NotFound,
}

/// Result of submitting a rejection comment.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionOutcome {
    Rejected(Listing),
    AlreadyProcessed,
    NotFound,
    /// The comment missed the floor; the sub-state is retained and the
    /// moderator is re-prompted.
    CommentTooShort { min_len: usize },
    /// The moderator had no rejection in progress.
    NoPendingPrompt,
}

/// Callback payloads for the moderator keyboards, and the main-menu payload
/// shared with the dispatcher.
pub mod callbacks {
    use super::{FromStr, ListingKind, ListingRef};

    pub const MAIN_MENU: &str = "menu:main";

    const APPROVE_PREFIX: &str = "mod:approve:";
    const REJECT_PREFIX: &str = "mod:reject:";

    /// A parsed moderator button press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ModerationAction {
        Approve(ListingRef),
        Reject(ListingRef),
    }

    pub fn approve(listing: ListingRef) -> String {
        format!("{APPROVE_PREFIX}{}:{}", listing.kind, listing.id)
    }

    pub fn reject(listing: ListingRef) -> String {
        format!("{REJECT_PREFIX}{}:{}", listing.kind, listing.id)
    }

    fn parse_ref(payload: &str) -> Option<ListingRef> {
        let (kind, id) = payload.split_once(':')?;
        Some(ListingRef {
            kind: ListingKind::from_str(kind).ok()?,
            id: id.parse().ok()?,
        })
    }

    /// Parse callback data into a moderation action. Returns `None` for
    /// payloads that belong to other subsystems.
    pub fn parse(data: &str) -> Option<ModerationAction> {
        if let Some(rest) = data.strip_prefix(APPROVE_PREFIX) {
            parse_ref(rest).map(ModerationAction::Approve)
        } else if let Some(rest) = data.strip_prefix(REJECT_PREFIX) {
            parse_ref(rest).map(ModerationAction::Reject)
        } else {
            None
        }
    }
}

/// Moderation decisions over the listing store.
pub struct ModerationEngine {
    store: Arc<dyn ListingStore>,
    moderators: Vec<UserId>,
    min_comment_len: usize,
    pending_rejections: Mutex<HashMap<UserId, ListingRef>>,
}

impl ModerationEngine {
    pub fn new(store: Arc<dyn ListingStore>, moderators: Vec<UserId>, min_comment_len: usize) -> Self {
        Self {
            store,
            moderators,
            min_comment_len,
            pending_rejections: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_moderator(&self, user: UserId) -> bool {
        self.moderators.contains(&user)
    }

    pub fn moderators(&self) -> &[UserId] {
        &self.moderators
    }

    pub fn min_comment_len(&self) -> usize {
        self.min_comment_len
    }

    fn ensure_moderator(&self, user: UserId) -> Result<(), VitrinaError> {
        if self.is_moderator(user) {
            Ok(())
        } else {
            Err(VitrinaError::Unauthorized)
        }
    }

    /// Approve a pending listing. The store's transaction decides the race.
    pub async fn approve(
        &self,
        listing: ListingRef,
        moderator: UserId,
    ) -> Result<ResolveOutcome, VitrinaError> {
        self.ensure_moderator(moderator)?;
        let outcome = self
            .store
            .resolve(listing, Decision::Approve, moderator)
            .await?;
        if let ResolveOutcome::Resolved(_) = &outcome {
            info!(
                listing_id = listing.id,
                kind = %listing.kind,
                moderator_id = moderator.0,
                "listing approved"
            );
        }
        Ok(outcome)
    }

    /// Start a rejection: check the listing is still worth commenting on and
    /// record the sub-state. The final pending check happens at commit.
    pub async fn begin_rejection(
        &self,
        listing: ListingRef,
        moderator: UserId,
    ) -> Result<BeginRejection, VitrinaError> {
        self.ensure_moderator(moderator)?;
        match self.store.get(listing).await? {
            None => Ok(BeginRejection::NotFound),
            Some(found) if !found.status().is_pending() => Ok(BeginRejection::AlreadyProcessed),
            Some(_) => {
                self.pending_rejections
                    .lock()
                    .await
                    .insert(moderator, listing);
                Ok(BeginRejection::Prompt)
            }
        }
    }

    /// The listing this moderator is currently rejecting, if any.
    pub async fn pending_rejection(&self, moderator: UserId) -> Option<ListingRef> {
        self.pending_rejections.lock().await.get(&moderator).copied()
    }

    /// Drop the moderator's rejection prompt without touching the listing.
    /// The listing stays pending for any moderator to decide later.
    pub async fn cancel_rejection(&self, moderator: UserId) {
        if let Some(listing) = self.pending_rejections.lock().await.remove(&moderator) {
            info!(
                listing_id = listing.id,
                kind = %listing.kind,
                moderator_id = moderator.0,
                "rejection prompt cancelled"
            );
        }
    }

    /// Commit the rejection with the moderator's comment.
    ///
    /// A too-short comment retains the sub-state so the next message retries;
    /// every other outcome clears it.
    pub async fn submit_rejection_comment(
        &self,
        moderator: UserId,
        comment: &str,
    ) -> Result<RejectionOutcome, VitrinaError> {
        self.ensure_moderator(moderator)?;

        let listing = {
            let pending = self.pending_rejections.lock().await;
            match pending.get(&moderator) {
                Some(listing) => *listing,
                None => return Ok(RejectionOutcome::NoPendingPrompt),
            }
        };

        let comment = comment.trim();
        if comment.chars().count() < self.min_comment_len {
            return Ok(RejectionOutcome::CommentTooShort {
                min_len: self.min_comment_len,
            });
        }

        self.pending_rejections.lock().await.remove(&moderator);

        let outcome = self
            .store
            .resolve(
                listing,
                Decision::Reject {
                    comment: comment.to_string(),
                },
                moderator,
            )
            .await?;

        Ok(match outcome {
            ResolveOutcome::Resolved(resolved) => {
                info!(
                    listing_id = listing.id,
                    kind = %listing.kind,
                    moderator_id = moderator.0,
                    "listing rejected"
                );
                RejectionOutcome::Rejected(resolved)
            }
            ResolveOutcome::AlreadyProcessed => RejectionOutcome::AlreadyProcessed,
            ResolveOutcome::NotFound => RejectionOutcome::NotFound,
        })
    }
}
