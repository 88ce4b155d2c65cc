// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use leadbot_config::model::StorageConfig;
use leadbot_core::{
    AdapterType, AfterHoursContact, BotPersona, CatalogAdmin, CatalogReader, ConversationId,
    DialogueSession, HealthStatus, InsertOutcome, Lead, LeadStore, LeadbotError, NewLead,
    PluginAdapter, Service, SessionStore, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for sessions, leads, persona and catalog.
///
/// The database is opened on [`StorageAdapter::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, LeadbotError> {
        self.db.get().ok_or_else(|| LeadbotError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), LeadbotError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadbotError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadbotError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), LeadbotError> {
        let db = Database::open_with_options(&self.config.database_path, self.config.wal_mode)
            .await?;
        self.db.set(db).map_err(|_| LeadbotError::Storage {
            source: "storage already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), LeadbotError> {
        let db = self.db()?;
        self.checkpoint(db).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteStorage {
    async fn load(&self, conversation_id: &ConversationId) -> Result<DialogueSession, LeadbotError> {
        queries::sessions::load_session(self.db()?, conversation_id).await
    }

    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &DialogueSession,
    ) -> Result<i64, LeadbotError> {
        queries::sessions::save_session(self.db()?, conversation_id, session).await
    }
}

#[async_trait]
impl LeadStore for SqliteStorage {
    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, LeadbotError> {
        queries::leads::find_lead_by_phone(self.db()?, phone).await
    }

    async fn booking_exists(
        &self,
        name: &str,
        phone: &str,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<bool, LeadbotError> {
        queries::leads::booking_exists(self.db()?, name, phone, service_id, date).await
    }

    async fn insert_lead_if_absent(&self, lead: &NewLead) -> Result<InsertOutcome, LeadbotError> {
        queries::leads::insert_lead_if_absent(self.db()?, lead).await
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, LeadbotError> {
        queries::leads::list_leads(self.db()?).await
    }

    async fn delete_lead(&self, id: i64) -> Result<bool, LeadbotError> {
        queries::leads::delete_lead(self.db()?, id).await
    }

    async fn record_after_hours_contact(
        &self,
        contact: &AfterHoursContact,
    ) -> Result<(), LeadbotError> {
        queries::contacts::insert_contact(self.db()?, contact).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogReader for SqliteStorage {
    async fn persona(&self) -> Result<BotPersona, LeadbotError> {
        Ok(queries::catalog::get_persona(self.db()?)
            .await?
            .unwrap_or_default())
    }

    async fn services(&self) -> Result<Vec<Service>, LeadbotError> {
        queries::catalog::list_services(self.db()?).await
    }
}

#[async_trait]
impl CatalogAdmin for SqliteStorage {
    async fn ensure_persona(&self) -> Result<bool, LeadbotError> {
        let inserted =
            queries::catalog::insert_persona_if_absent(self.db()?, &BotPersona::default()).await?;
        if inserted {
            info!("created default bot persona");
        }
        Ok(inserted)
    }

    async fn save_persona(&self, persona: &BotPersona) -> Result<(), LeadbotError> {
        queries::catalog::upsert_persona(self.db()?, persona).await
    }

    async fn add_service(&self, name: &str) -> Result<Service, LeadbotError> {
        queries::catalog::insert_service(self.db()?, name).await
    }

    async fn remove_service(&self, name: &str) -> Result<bool, LeadbotError> {
        queries::catalog::delete_service(self.db()?, name).await
    }
}
