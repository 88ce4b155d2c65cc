// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messages recorded while the office was closed.

use leadbot_core::{AfterHoursContact, LeadbotError};
use rusqlite::params;

use crate::database::Database;

/// Appends an after-hours contact and returns its row id.
pub async fn insert_contact(
    db: &Database,
    contact: &AfterHoursContact,
) -> Result<i64, LeadbotError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO after_hours_contacts (conversation_id, username, display_name, message)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    contact.conversation_id,
                    contact.username,
                    contact.display_name,
                    contact.message,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of recorded contacts for a conversation.
pub async fn count_contacts(db: &Database, conversation_id: &str) -> Result<i64, LeadbotError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM after_hours_contacts WHERE conversation_id = ?1",
                params![conversation_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
