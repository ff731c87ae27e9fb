// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom request table operations.

use std::str::FromStr;

use rusqlite::params;
use vitrina_core::types::{
    ChatId, CustomRequest, Decision, Listing, ModerationStatus, NewCustomRequest, ResolveOutcome,
    UserId,
};
use vitrina_core::VitrinaError;

use crate::database::Database;

const COLUMNS: &str = "id, user_id, chat_id, business_description, automation_task, budget, \
                       created_at, status, moderator_id, rejection_comment";

fn row_to_custom_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomRequest> {
    let status: String = row.get(7)?;
    let moderator_id: Option<i64> = row.get(8)?;

    Ok(CustomRequest {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        chat_id: ChatId(row.get(2)?),
        business_description: row.get(3)?,
        automation_task: row.get(4)?,
        budget: row.get(5)?,
        created_at: row.get(6)?,
        status: ModerationStatus::from_str(&status).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?,
        moderator_id: moderator_id.map(UserId),
        rejection_comment: row.get(9)?,
    })
}

/// Insert a new pending custom request and return the stored record.
pub async fn create(db: &Database, new: NewCustomRequest) -> Result<CustomRequest, VitrinaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO custom_requests (user_id, chat_id, business_description,
                     automation_task, budget)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new.user_id.0,
                    new.chat_id.0,
                    new.business_description,
                    new.automation_task,
                    new.budget,
                ],
            )?;
            let id = conn.last_insert_rowid();

            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM custom_requests WHERE id = ?1"
            ))?;
            let request = stmt.query_row(params![id], row_to_custom_request)?;
            Ok(request)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a custom request by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<CustomRequest>, VitrinaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM custom_requests WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_custom_request);
            match result {
                Ok(request) => Ok(Some(request)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a moderation decision iff the request is still pending.
///
/// Same transactional read-check-write as the announcement path.
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
                    "SELECT {COLUMNS} FROM custom_requests WHERE id = ?1"
                ))?;
                stmt.query_row(params![id], row_to_custom_request)
            };

            match current {
                Ok(request) => {
                    if !request.status.is_pending() {
                        tx.commit()?;
                        return Ok(ResolveOutcome::AlreadyProcessed);
                    }
                    tx.execute(
                        "UPDATE custom_requests
                         SET status = ?1, moderator_id = ?2, rejection_comment = ?3
                         WHERE id = ?4",
                        params![new_status.to_string(), moderator.0, comment, id],
                    )?;
                    tx.commit()?;

                    Ok(ResolveOutcome::Resolved(Listing::CustomRequest(
                        CustomRequest {
                            status: new_status,
                            moderator_id: Some(moderator),
                            rejection_comment: comment,
                            ..request
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

/// Total custom request rows regardless of status.
pub async fn count(db: &Database) -> Result<i64, VitrinaError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM custom_requests", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
