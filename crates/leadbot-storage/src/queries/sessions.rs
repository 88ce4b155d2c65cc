// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue session load and conditional save.

use std::str::FromStr;

use leadbot_core::{ConversationId, DialogueSession, DialogueState, LeadbotError, Service};
use rusqlite::{params, OptionalExtension};
use tracing::warn;

use crate::database::Database;

/// Raw `dialogue_sessions` row.
struct SessionRow {
    state: String,
    name: Option<String>,
    phone: Option<String>,
    service_id: Option<i64>,
    service_name: Option<String>,
    version: i64,
}

impl SessionRow {
    fn into_session(self, conversation_id: &ConversationId) -> DialogueSession {
        let state = DialogueState::from_str(&self.state).unwrap_or_else(|_| {
            warn!(
                conversation_id = %conversation_id,
                state = %self.state,
                "unknown stored dialogue state, treating as NONE"
            );
            DialogueState::None
        });
        let service = match (self.service_id, self.service_name) {
            (Some(id), Some(name)) => Some(Service { id, name }),
            _ => None,
        };
        DialogueSession {
            state,
            name: self.name,
            phone: self.phone,
            service,
            version: self.version,
        }
    }
}

/// Loads a session; a missing row is a fresh `NONE` session at version 0.
pub async fn load_session(
    db: &Database,
    conversation_id: &ConversationId,
) -> Result<DialogueSession, LeadbotError> {
    let key = conversation_id.as_str().to_string();
    let row = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT state, name, phone, service_id, service_name, version
                 FROM dialogue_sessions WHERE conversation_id = ?1",
                params![key],
                |row| {
                    Ok(SessionRow {
                        state: row.get(0)?,
                        name: row.get(1)?,
                        phone: row.get(2)?,
                        service_id: row.get(3)?,
                        service_name: row.get(4)?,
                        version: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(row
        .map(|r| r.into_session(conversation_id))
        .unwrap_or_default())
}

/// Writes the session only if the stored version still equals
/// `session.version`, returning the new version.
///
/// Version 0 means "never stored": the row is inserted unless one appeared
/// in the meantime.
pub async fn save_session(
    db: &Database,
    conversation_id: &ConversationId,
    session: &DialogueSession,
) -> Result<i64, LeadbotError> {
    let key = conversation_id.as_str().to_string();
    let state = session.state.to_string();
    let name = session.name.clone();
    let phone = session.phone.clone();
    let service_id = session.service.as_ref().map(|s| s.id);
    let service_name = session.service.as_ref().map(|s| s.name.clone());
    let expected = session.version;

    let changed = db
        .connection()
        .call(move |conn| {
            if expected == 0 {
                conn.execute(
                    "INSERT INTO dialogue_sessions
                        (conversation_id, state, name, phone, service_id, service_name, version)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
                     ON CONFLICT(conversation_id) DO NOTHING",
                    params![key, state, name, phone, service_id, service_name],
                )
            } else {
                conn.execute(
                    "UPDATE dialogue_sessions
                     SET state = ?2, name = ?3, phone = ?4, service_id = ?5, service_name = ?6,
                         version = version + 1,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE conversation_id = ?1 AND version = ?7",
                    params![key, state, name, phone, service_id, service_name, expected],
                )
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if changed == 0 {
        return Err(LeadbotError::SessionConflict {
            conversation_id: conversation_id.to_string(),
        });
    }
    Ok(expected + 1)
}
