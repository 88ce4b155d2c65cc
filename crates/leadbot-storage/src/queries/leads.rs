// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead lookups and the atomic insert-if-absent.

use chrono::NaiveDate;
use leadbot_core::{InsertOutcome, Lead, LeadbotError, NewLead};
use rusqlite::{params, OptionalExtension, Row};

use crate::database::Database;

const LEAD_COLUMNS: &str =
    "id, conversation_id, name, phone, service_id, service_name, appointment_date, created_at";

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        service_id: row.get(4)?,
        service_name: row.get(5)?,
        appointment_date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Most recently created lead registered with `phone`.
pub async fn find_lead_by_phone(db: &Database, phone: &str) -> Result<Option<Lead>, LeadbotError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE phone = ?1
                     ORDER BY created_at DESC, id DESC LIMIT 1"
                ),
                params![phone],
                lead_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether the exact (name, phone, service, date) tuple is already booked.
pub async fn booking_exists(
    db: &Database,
    name: &str,
    phone: &str,
    service_id: i64,
    date: NaiveDate,
) -> Result<bool, LeadbotError> {
    let name = name.to_string();
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM leads
                    WHERE name = ?1 AND phone = ?2 AND service_id = ?3 AND appointment_date = ?4
                 )",
                params![name, phone, service_id, date],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Inserts the lead unless its tuple is taken. The unique index makes the
/// check and the write one statement, so concurrent duplicates cannot both win.
pub async fn insert_lead_if_absent(
    db: &Database,
    lead: &NewLead,
) -> Result<InsertOutcome, LeadbotError> {
    let lead = lead.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO leads
                        (conversation_id, name, phone, service_id, service_name, appointment_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(name, phone, service_id, appointment_date) DO NOTHING
                     RETURNING {LEAD_COLUMNS}"
                ),
                params![
                    lead.conversation_id,
                    lead.name,
                    lead.phone,
                    lead.service_id,
                    lead.service_name,
                    lead.appointment_date,
                ],
                lead_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(match inserted {
        Some(lead) => InsertOutcome::Inserted(lead),
        None => InsertOutcome::Duplicate,
    })
}

/// All leads, newest first.
pub async fn list_leads(db: &Database) -> Result<Vec<Lead>, LeadbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], lead_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Deletes a lead; returns whether a row was removed.
pub async fn delete_lead(db: &Database, id: i64) -> Result<bool, LeadbotError> {
    db.connection()
        .call(move |conn| conn.execute("DELETE FROM leads WHERE id = ?1", params![id]))
        .await
        .map(|n| n > 0)
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("leads.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn new_lead(name: &str, phone: &str, date: &str) -> NewLead {
        NewLead {
            conversation_id: "chat-1".into(),
            name: name.into(),
            phone: phone.into(),
            service_id: 1,
            service_name: "Grooming".into(),
            appointment_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_returns_stored_lead() {
        let (db, _dir) = setup_db().await;
        let outcome = insert_lead_if_absent(&db, &new_lead("Juan Perez", "+5212345678", "2025-06-02"))
            .await
            .unwrap();
        let InsertOutcome::Inserted(lead) = outcome else {
            panic!("expected insert");
        };
        assert!(lead.id > 0);
        assert_eq!(lead.service_name, "Grooming");
        assert_eq!(lead.appointment_date.to_string(), "2025-06-02");
        assert!(!lead.created_at.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn identical_tuple_is_reported_as_duplicate() {
        let (db, _dir) = setup_db().await;
        let lead = new_lead("Juan Perez", "+5212345678", "2025-06-02");
        insert_lead_if_absent(&db, &lead).await.unwrap();

        let second = insert_lead_if_absent(&db, &lead).await.unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);
        assert_eq!(list_leads(&db).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn different_date_is_a_new_booking() {
        let (db, _dir) = setup_db().await;
        insert_lead_if_absent(&db, &new_lead("Juan Perez", "+5212345678", "2025-06-02"))
            .await
            .unwrap();
        let outcome = insert_lead_if_absent(&db, &new_lead("Juan Perez", "+5212345678", "2025-06-03"))
            .await
            .unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn booking_exists_matches_exact_tuple() {
        let (db, _dir) = setup_db().await;
        let lead = new_lead("Juan Perez", "+5212345678", "2025-06-02");
        insert_lead_if_absent(&db, &lead).await.unwrap();

        assert!(booking_exists(&db, "Juan Perez", "+5212345678", 1, lead.appointment_date)
            .await
            .unwrap());
        assert!(!booking_exists(&db, "Juan Perez", "+5212345678", 2, lead.appointment_date)
            .await
            .unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_by_phone_returns_latest() {
        let (db, _dir) = setup_db().await;
        insert_lead_if_absent(&db, &new_lead("Juan Perez", "5550001", "2025-06-02"))
            .await
            .unwrap();
        insert_lead_if_absent(&db, &new_lead("Juan P", "5550001", "2025-06-05"))
            .await
            .unwrap();

        let found = find_lead_by_phone(&db, "5550001").await.unwrap().unwrap();
        assert_eq!(found.name, "Juan P");
        assert!(find_lead_by_phone(&db, "999").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let (db, _dir) = setup_db().await;
        let InsertOutcome::Inserted(lead) =
            insert_lead_if_absent(&db, &new_lead("Ana Lopez", "5550002", "2025-07-01"))
                .await
                .unwrap()
        else {
            panic!("expected insert");
        };
        assert!(delete_lead(&db, lead.id).await.unwrap());
        assert!(!delete_lead(&db, lead.id).await.unwrap());
        db.close().await.unwrap();
    }
}
