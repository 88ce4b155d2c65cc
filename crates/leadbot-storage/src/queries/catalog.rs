// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona singleton and service catalog.

use leadbot_core::{BotPersona, LeadbotError, Service, Tone};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;

/// The stored persona, or `None` before first boot.
pub async fn get_persona(db: &Database) -> Result<Option<BotPersona>, LeadbotError> {
    db.connection()
        .call(|conn| {
            conn.query_row(
                "SELECT name, tone, topic, greeting, use_emojis FROM bot_persona WHERE id = 1",
                [],
                |row| {
                    let tone: String = row.get(1)?;
                    Ok(BotPersona {
                        name: row.get(0)?,
                        tone: Tone::parse_or_default(&tone),
                        topic: row.get(2)?,
                        greeting: row.get(3)?,
                        use_emojis: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Inserts `persona` only when no persona row exists yet.
pub async fn insert_persona_if_absent(
    db: &Database,
    persona: &BotPersona,
) -> Result<bool, LeadbotError> {
    let persona = persona.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_persona (id, name, tone, topic, greeting, use_emojis)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![
                    persona.name,
                    persona.tone.to_string(),
                    persona.topic,
                    persona.greeting,
                    persona.use_emojis,
                ],
            )
        })
        .await
        .map(|n| n == 1)
        .map_err(crate::database::map_tr_err)
}

/// Creates or replaces the persona row.
pub async fn upsert_persona(db: &Database, persona: &BotPersona) -> Result<(), LeadbotError> {
    let persona = persona.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_persona (id, name, tone, topic, greeting, use_emojis)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    tone = excluded.tone,
                    topic = excluded.topic,
                    greeting = excluded.greeting,
                    use_emojis = excluded.use_emojis,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![
                    persona.name,
                    persona.tone.to_string(),
                    persona.topic,
                    persona.greeting,
                    persona.use_emojis,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Catalog ordered by name.
pub async fn list_services(db: &Database) -> Result<Vec<Service>, LeadbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM services ORDER BY name")?;
            let rows = stmt.query_map([], |row| {
                Ok(Service {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Adds a service. Fails on a duplicate name.
pub async fn insert_service(db: &Database, name: &str) -> Result<Service, LeadbotError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO services (name) VALUES (?1) RETURNING id, name",
                params![name],
                |row| {
                    Ok(Service {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Removes a service by exact name.
pub async fn delete_service(db: &Database, name: &str) -> Result<bool, LeadbotError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| conn.execute("DELETE FROM services WHERE name = ?1", params![name]))
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
        let db_path = dir.path().join("catalog.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn persona_is_absent_until_inserted() {
        let (db, _dir) = setup_db().await;
        assert!(get_persona(&db).await.unwrap().is_none());

        assert!(insert_persona_if_absent(&db, &BotPersona::default()).await.unwrap());
        assert!(!insert_persona_if_absent(&db, &BotPersona::default()).await.unwrap());

        let persona = get_persona(&db).await.unwrap().unwrap();
        assert_eq!(persona, BotPersona::default());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_persona_in_place() {
        let (db, _dir) = setup_db().await;
        insert_persona_if_absent(&db, &BotPersona::default()).await.unwrap();

        let updated = BotPersona {
            name: "Spa Bot".into(),
            tone: Tone::Elegante,
            use_emojis: false,
            ..BotPersona::default()
        };
        upsert_persona(&db, &updated).await.unwrap();

        assert_eq!(get_persona(&db).await.unwrap().unwrap(), updated);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn services_are_listed_by_name_and_unique() {
        let (db, _dir) = setup_db().await;
        insert_service(&db, "Corte de uñas").await.unwrap();
        insert_service(&db, "Baño completo").await.unwrap();
        assert!(insert_service(&db, "Baño completo").await.is_err());

        let names: Vec<String> = list_services(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Baño completo", "Corte de uñas"]);

        assert!(delete_service(&db, "Baño completo").await.unwrap());
        assert!(!delete_service(&db, "Baño completo").await.unwrap());
        db.close().await.unwrap();
    }
}
