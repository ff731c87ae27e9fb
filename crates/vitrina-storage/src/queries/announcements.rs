// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Announcement table operations.

use std::str::FromStr;

use rusqlite::params;
use vitrina_core::types::{
    Announcement, ChatId, Complexity, Decision, Listing, ModerationStatus, NewAnnouncement,
    ResolveOutcome, UserId,
};
use vitrina_core::VitrinaError;

use crate::database::Database;

const COLUMNS: &str = "id, user_id, chat_id, bot_name, bot_function, solution_description, \
                       included_features, client_requirements, launch_time, price, complexity, \
                       demo_url, documents, videos, created_at, status, moderator_id, \
                       rejection_comment";

fn conv_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn row_to_announcement(row: &rusqlite::Row<'_>) -> rusqlite::Result<Announcement> {
    let complexity: String = row.get(10)?;
    let documents: String = row.get(12)?;
    let videos: String = row.get(13)?;
    let status: String = row.get(15)?;
    let moderator_id: Option<i64> = row.get(16)?;

    Ok(Announcement {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        chat_id: ChatId(row.get(2)?),
        bot_name: row.get(3)?,
        bot_function: row.get(4)?,
        solution_description: row.get(5)?,
        included_features: row.get(6)?,
        client_requirements: row.get(7)?,
        launch_time: row.get(8)?,
        price: row.get(9)?,
        complexity: Complexity::from_str(&complexity).map_err(|e| conv_err(10, e))?,
        demo_url: row.get(11)?,
        documents: serde_json::from_str(&documents).map_err(|e| conv_err(12, e))?,
        videos: serde_json::from_str(&videos).map_err(|e| conv_err(13, e))?,
        created_at: row.get(14)?,
        status: ModerationStatus::from_str(&status).map_err(|e| conv_err(15, e))?,
        moderator_id: moderator_id.map(UserId),
        rejection_comment: row.get(17)?,
    })
}

/// Insert a new pending announcement and return the stored record.
pub async fn create(db: &Database, new: NewAnnouncement) -> Result<Announcement, VitrinaError> {
    let documents = serde_json::to_string(&new.documents).map_err(|e| VitrinaError::Storage {
        source: Box::new(e),
    })?;
    let videos = serde_json::to_string(&new.videos).map_err(|e| VitrinaError::Storage {
        source: Box::new(e),
    })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO announcements (user_id, chat_id, bot_name, bot_function,
                     solution_description, included_features, client_requirements,
                     launch_time, price, complexity, demo_url, documents, videos)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    new.user_id.0,
                    new.chat_id.0,
                    new.bot_name,
                    new.bot_function,
                    new.solution_description,
                    new.included_features,
                    new.client_requirements,
                    new.launch_time,
                    new.price,
                    new.complexity.to_string(),
                    new.demo_url,
                    documents,
                    videos,
                ],
            )?;
            let id = conn.last_insert_rowid();

            // Re-read for the database-assigned created_at and status defaults.
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM announcements WHERE id = ?1"
            ))?;
            let announcement = stmt.query_row(params![id], row_to_announcement)?;
            Ok(announcement)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an announcement by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<Announcement>, VitrinaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM announcements WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_announcement);
            match result {
                Ok(announcement) => Ok(Some(announcement)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a moderation decision iff the announcement is still pending.
///
/// The read-check-write runs inside one transaction, so two moderators
/// racing on the same row see exactly one `Resolved` and one
/// `AlreadyProcessed`.
pub async fn resolve(
    db: &Database,
    id: i64,
    decision: Decision,
    moderator: UserId,
) -> Result<ResolveOutcome, VitrinaError> {
    let (new_status, comment) = match decision {
        Decision::Approve => (ModerationStatus::Approved, None),
        Decision::Reject { comment } => (ModerationStatus::Rejected, Some(comment)),
    };

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let current = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {COLUMNS} FROM announcements WHERE id = ?1"
                ))?;
                stmt.query_row(params![id], row_to_announcement)
            };

            match current {
                Ok(announcement) => {
                    if !announcement.status.is_pending() {
                        tx.commit()?;
                        return Ok(ResolveOutcome::AlreadyProcessed);
                    }
                    tx.execute(
                        "UPDATE announcements
                         SET status = ?1, moderator_id = ?2, rejection_comment = ?3
                         WHERE id = ?4",
                        params![new_status.to_string(), moderator.0, comment, id],
                    )?;
                    tx.commit()?;

                    Ok(ResolveOutcome::Resolved(Listing::Announcement(
                        Announcement {
                            status: new_status,
                            moderator_id: Some(moderator),
                            rejection_comment: comment,
                            ..announcement
                        },
                    )))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    tx.commit()?;
                    Ok(ResolveOutcome::NotFound)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Approved announcements, newest first.
pub async fn list_approved(db: &Database) -> Result<Vec<Announcement>, VitrinaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM announcements
                 WHERE status = 'approved' ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_announcement)?;
            let mut announcements = Vec::new();
            for row in rows {
                announcements.push(row?);
            }
            Ok(announcements)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Total announcement rows regardless of status.
pub async fn count(db: &Database) -> Result<i64, VitrinaError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM announcements", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
