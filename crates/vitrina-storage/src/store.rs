// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The SQLite-backed [`ListingStore`] implementation.

use async_trait::async_trait;
use vitrina_core::types::{
    Announcement, CustomRequest, Decision, Listing, ListingKind, ListingRef, NewAnnouncement,
    NewCustomRequest, ResolveOutcome, UserId,
};
use vitrina_core::{ListingStore, VitrinaError};

use crate::database::Database;
use crate::queries;

/// Listing store backed by the shared single-writer SQLite connection.
#[derive(Clone)]
pub struct SqliteListingStore {
    db: Database,
}

impl SqliteListingStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn create_announcement(
        &self,
        new: NewAnnouncement,
    ) -> Result<Announcement, VitrinaError> {
        queries::announcements::create(&self.db, new).await
    }

    async fn create_custom_request(
        &self,
        new: NewCustomRequest,
    ) -> Result<CustomRequest, VitrinaError> {
        queries::custom_requests::create(&self.db, new).await
    }

    async fn get(&self, listing: ListingRef) -> Result<Option<Listing>, VitrinaError> {
        match listing.kind {
            ListingKind::Announcement => Ok(queries::announcements::get(&self.db, listing.id)
                .await?
                .map(Listing::Announcement)),
            ListingKind::CustomRequest => Ok(queries::custom_requests::get(&self.db, listing.id)
                .await?
                .map(Listing::CustomRequest)),
        }
    }

    async fn resolve(
        &self,
        listing: ListingRef,
        decision: Decision,
        moderator: UserId,
    ) -> Result<ResolveOutcome, VitrinaError> {
        match listing.kind {
            ListingKind::Announcement => {
                queries::announcements::resolve(&self.db, listing.id, decision, moderator).await
            }
            ListingKind::CustomRequest => {
                queries::custom_requests::resolve(&self.db, listing.id, decision, moderator).await
            }
        }
    }

    async fn list_approved_announcements(&self) -> Result<Vec<Announcement>, VitrinaError> {
        queries::announcements::list_approved(&self.db).await
    }

    async fn count_announcements(&self) -> Result<i64, VitrinaError> {
        queries::announcements::count(&self.db).await
    }

    async fn count_custom_requests(&self) -> Result<i64, VitrinaError> {
        queries::custom_requests::count(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vitrina_core::types::{ChatId, Complexity, DocumentAttachment, ModerationStatus};

    async fn setup_store() -> (SqliteListingStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (SqliteListingStore::new(db), dir)
    }

    fn sample_announcement(user: i64) -> NewAnnouncement {
        NewAnnouncement {
            user_id: UserId(user),
            chat_id: ChatId(user),
            bot_name: "SupportBot".to_string(),
            bot_function: "answers customer questions".to_string(),
            solution_description: "LLM-backed first-line support agent".to_string(),
            included_features: "FAQ, handoff, analytics".to_string(),
            client_requirements: "Telegram group, knowledge base export".to_string(),
            launch_time: "2 weeks".to_string(),
            price: "1500 USD".to_string(),
            complexity: Complexity::Medium,
            demo_url: Some("https://example.com/demo".to_string()),
            documents: vec![DocumentAttachment {
                file_id: "BAAC123".to_string(),
                file_name: "pitch.pdf".to_string(),
                file_size: 2048,
                mime_type: "application/pdf".to_string(),
            }],
            videos: Vec::new(),
        }
    }

    fn sample_request(user: i64) -> NewCustomRequest {
        NewCustomRequest {
            user_id: UserId(user),
            chat_id: ChatId(user),
            business_description: "chain of flower shops".to_string(),
            automation_task: "automate order intake and delivery scheduling".to_string(),
            budget: "500 USD".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_announcement_round_trips() {
        let (store, _dir) = setup_store().await;

        let created = store.create_announcement(sample_announcement(100)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.status, ModerationStatus::Pending);
        assert!(created.moderator_id.is_none());
        assert!(!created.created_at.is_empty());

        let fetched = store
            .get(ListingRef {
                kind: ListingKind::Announcement,
                id: created.id,
            })
            .await
            .unwrap()
            .unwrap();
        match fetched {
            Listing::Announcement(a) => {
                assert_eq!(a, created);
                assert_eq!(a.documents.len(), 1);
                assert_eq!(a.documents[0].file_name, "pitch.pdf");
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (store, _dir) = setup_store().await;
        let result = store
            .get(ListingRef {
                kind: ListingKind::CustomRequest,
                id: 999,
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn approve_records_moderator() {
        let (store, _dir) = setup_store().await;
        let created = store.create_announcement(sample_announcement(100)).await.unwrap();
        let listing_ref = ListingRef {
            kind: ListingKind::Announcement,
            id: created.id,
        };

        let outcome = store
            .resolve(listing_ref, Decision::Approve, UserId(555))
            .await
            .unwrap();
        match outcome {
            ResolveOutcome::Resolved(listing) => {
                assert_eq!(listing.status(), ModerationStatus::Approved);
                assert_eq!(listing.moderator_id(), Some(UserId(555)));
            }
            other => panic!("expected Resolved, got {other:?}"),
        }

        // Persisted, not just returned.
        let fetched = store.get(listing_ref).await.unwrap().unwrap();
        assert_eq!(fetched.status(), ModerationStatus::Approved);
        assert_eq!(fetched.moderator_id(), Some(UserId(555)));
    }

    #[tokio::test]
    async fn reject_records_comment() {
        let (store, _dir) = setup_store().await;
        let created = store.create_custom_request(sample_request(100)).await.unwrap();
        let listing_ref = ListingRef {
            kind: ListingKind::CustomRequest,
            id: created.id,
        };

        let outcome = store
            .resolve(
                listing_ref,
                Decision::Reject {
                    comment: "budget unrealistic for scope".to_string(),
                },
                UserId(555),
            )
            .await
            .unwrap();
        match outcome {
            ResolveOutcome::Resolved(Listing::CustomRequest(r)) => {
                assert_eq!(r.status, ModerationStatus::Rejected);
                assert_eq!(
                    r.rejection_comment.as_deref(),
                    Some("budget unrealistic for scope")
                );
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_resolution_reports_already_processed() {
        let (store, _dir) = setup_store().await;
        let created = store.create_announcement(sample_announcement(100)).await.unwrap();
        let listing_ref = ListingRef {
            kind: ListingKind::Announcement,
            id: created.id,
        };

        let first = store
            .resolve(listing_ref, Decision::Approve, UserId(555))
            .await
            .unwrap();
        assert!(matches!(first, ResolveOutcome::Resolved(_)));

        // A competing reject must not flip the status.
        let second = store
            .resolve(
                listing_ref,
                Decision::Reject {
                    comment: "changed my mind".to_string(),
                },
                UserId(777),
            )
            .await
            .unwrap();
        assert_eq!(second, ResolveOutcome::AlreadyProcessed);

        let fetched = store.get(listing_ref).await.unwrap().unwrap();
        assert_eq!(fetched.status(), ModerationStatus::Approved);
        assert_eq!(fetched.moderator_id(), Some(UserId(555)));
    }

    #[tokio::test]
    async fn resolve_missing_reports_not_found() {
        let (store, _dir) = setup_store().await;
        let outcome = store
            .resolve(
                ListingRef {
                    kind: ListingKind::Announcement,
                    id: 999,
                },
                Decision::Approve,
                UserId(555),
            )
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::NotFound);
    }

    #[tokio::test]
    async fn concurrent_resolutions_yield_exactly_one_winner() {
        let (store, _dir) = setup_store().await;
        let created = store.create_announcement(sample_announcement(100)).await.unwrap();
        let listing_ref = ListingRef {
            kind: ListingKind::Announcement,
            id: created.id,
        };

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            let decision = if i % 2 == 0 {
                Decision::Approve
            } else {
                Decision::Reject {
                    comment: "rejected in race".to_string(),
                }
            };
            handles.push(tokio::spawn(async move {
                store.resolve(listing_ref, decision, UserId(1000 + i)).await
            }));
        }

        let mut resolved = 0;
        let mut already = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                ResolveOutcome::Resolved(_) => resolved += 1,
                ResolveOutcome::AlreadyProcessed => already += 1,
                ResolveOutcome::NotFound => panic!("listing vanished during race"),
            }
        }
        assert_eq!(resolved, 1);
        assert_eq!(already, 9);
    }

    #[tokio::test]
    async fn list_approved_filters_and_orders_newest_first() {
        let (store, _dir) = setup_store().await;

        let a1 = store.create_announcement(sample_announcement(1)).await.unwrap();
        let a2 = store.create_announcement(sample_announcement(2)).await.unwrap();
        let _a3 = store.create_announcement(sample_announcement(3)).await.unwrap();

        let approve = |id| ListingRef {
            kind: ListingKind::Announcement,
            id,
        };
        store.resolve(approve(a1.id), Decision::Approve, UserId(5)).await.unwrap();
        store.resolve(approve(a2.id), Decision::Approve, UserId(5)).await.unwrap();

        let approved = store.list_approved_announcements().await.unwrap();
        assert_eq!(approved.len(), 2);
        assert_eq!(approved[0].id, a2.id);
        assert_eq!(approved[1].id, a1.id);
    }

    #[tokio::test]
    async fn counts_cover_all_statuses() {
        let (store, _dir) = setup_store().await;

        let a = store.create_announcement(sample_announcement(1)).await.unwrap();
        store.create_custom_request(sample_request(2)).await.unwrap();
        store.create_custom_request(sample_request(3)).await.unwrap();
        store
            .resolve(
                ListingRef {
                    kind: ListingKind::Announcement,
                    id: a.id,
                },
                Decision::Reject {
                    comment: "incomplete description".to_string(),
                },
                UserId(5),
            )
            .await
            .unwrap();

        assert_eq!(store.count_announcements().await.unwrap(), 1);
        assert_eq!(store.count_custom_requests().await.unwrap(), 2);
    }
}
