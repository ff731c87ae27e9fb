// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing store trait: transactional creation and at-most-once resolution.

use async_trait::async_trait;

use crate::error::VitrinaError;
use crate::types::{
    Announcement, CustomRequest, Decision, Listing, ListingRef, NewAnnouncement,
    NewCustomRequest, ResolveOutcome, UserId,
};

/// Persistence boundary for listings.
///
/// The "exactly one resolution" invariant lives behind [`ListingStore::resolve`],
/// not in callers: implementations must make the pending-check-then-write
/// atomic with respect to concurrent resolutions of the same listing.
#[async_trait]
pub trait ListingStore: Send + Sync + 'static {
    /// Creates a pending announcement and returns the full record with its
    /// assigned id.
    async fn create_announcement(
        &self,
        new: NewAnnouncement,
    ) -> Result<Announcement, VitrinaError>;

    /// Creates a pending custom request and returns the full record with its
    /// assigned id.
    async fn create_custom_request(
        &self,
        new: NewCustomRequest,
    ) -> Result<CustomRequest, VitrinaError>;

    /// Loads a listing by reference.
    async fn get(&self, listing: ListingRef) -> Result<Option<Listing>, VitrinaError>;

    /// The single mutation point. Applies the decision iff the listing is
    /// still pending; records the moderator atomically with the status
    /// transition. Safe under concurrent invocation for the same id.
    async fn resolve(
        &self,
        listing: ListingRef,
        decision: Decision,
        moderator: UserId,
    ) -> Result<ResolveOutcome, VitrinaError>;

    /// Approved announcements, newest first -- the search candidate set.
    async fn list_approved_announcements(&self) -> Result<Vec<Announcement>, VitrinaError>;

    /// Total announcement rows regardless of status.
    async fn count_announcements(&self) -> Result<i64, VitrinaError>;

    /// Total custom request rows regardless of status.
    async fn count_custom_requests(&self) -> Result<i64, VitrinaError>;
}
