// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the storage traits.
//!
//! Mirrors the SQLite semantics the orchestrator relies on: versioned
//! compare-and-swap session writes, insert-if-absent on the lead tuple, and
//! name-ordered catalog reads. Failures can be injected for error paths.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use leadbot_core::{
    AfterHoursContact, BotPersona, CatalogAdmin, CatalogReader, ConversationId, DialogueSession,
    InsertOutcome, Lead, LeadStore, LeadbotError, NewLead, Service, SessionStore,
};

#[derive(Default)]
struct Inner {
    sessions: HashMap<ConversationId, DialogueSession>,
    leads: Vec<Lead>,
    next_lead_id: i64,
    persona: Option<BotPersona>,
    services: Vec<Service>,
    next_service_id: i64,
    contacts: Vec<AfterHoursContact>,
    fail_next_load: bool,
    conflict_next_save: bool,
}

/// Sessions, leads, catalog and after-hours contacts held in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds catalog entries by name.
    pub fn seed_services(&self, names: &[&str]) {
        let mut inner = self.lock();
        for name in names {
            inner.next_service_id += 1;
            let id = inner.next_service_id;
            inner.services.push(Service {
                id,
                name: (*name).to_string(),
            });
        }
    }

    pub fn clear_services(&self) {
        self.lock().services.clear();
    }

    pub fn after_hours_contacts(&self) -> Vec<AfterHoursContact> {
        self.lock().contacts.clone()
    }

    /// The next `load` fails with a storage error.
    pub fn fail_next_load(&self) {
        self.lock().fail_next_load = true;
    }

    /// The next `save` loses the compare-and-swap.
    pub fn conflict_next_save(&self) {
        self.lock().conflict_next_save = true;
    }
}

fn injected(what: &str) -> LeadbotError {
    LeadbotError::Storage {
        source: format!("injected {what} failure").into(),
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, conversation_id: &ConversationId) -> Result<DialogueSession, LeadbotError> {
        let mut inner = self.lock();
        if std::mem::take(&mut inner.fail_next_load) {
            return Err(injected("load"));
        }
        Ok(inner
            .sessions
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &DialogueSession,
    ) -> Result<i64, LeadbotError> {
        let mut inner = self.lock();
        let stored = inner
            .sessions
            .get(conversation_id)
            .map(|s| s.version)
            .unwrap_or(0);
        if std::mem::take(&mut inner.conflict_next_save) || stored != session.version {
            return Err(LeadbotError::SessionConflict {
                conversation_id: conversation_id.to_string(),
            });
        }

        let version = session.version + 1;
        inner.sessions.insert(
            conversation_id.clone(),
            DialogueSession {
                version,
                ..session.clone()
            },
        );
        Ok(version)
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, LeadbotError> {
        Ok(self
            .lock()
            .leads
            .iter()
            .rev()
            .find(|l| l.phone == phone)
            .cloned())
    }

    async fn booking_exists(
        &self,
        name: &str,
        phone: &str,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<bool, LeadbotError> {
        Ok(self.lock().leads.iter().any(|l| {
            l.name == name
                && l.phone == phone
                && l.service_id == service_id
                && l.appointment_date == date
        }))
    }

    async fn insert_lead_if_absent(&self, lead: &NewLead) -> Result<InsertOutcome, LeadbotError> {
        let mut inner = self.lock();
        let taken = inner.leads.iter().any(|l| {
            l.name == lead.name
                && l.phone == lead.phone
                && l.service_id == lead.service_id
                && l.appointment_date == lead.appointment_date
        });
        if taken {
            return Ok(InsertOutcome::Duplicate);
        }

        inner.next_lead_id += 1;
        let stored = Lead {
            id: inner.next_lead_id,
            conversation_id: lead.conversation_id.clone(),
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            service_id: lead.service_id,
            service_name: lead.service_name.clone(),
            appointment_date: lead.appointment_date,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        inner.leads.push(stored.clone());
        Ok(InsertOutcome::Inserted(stored))
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, LeadbotError> {
        Ok(self.lock().leads.iter().rev().cloned().collect())
    }

    async fn delete_lead(&self, id: i64) -> Result<bool, LeadbotError> {
        let mut inner = self.lock();
        let before = inner.leads.len();
        inner.leads.retain(|l| l.id != id);
        Ok(inner.leads.len() != before)
    }

    async fn record_after_hours_contact(
        &self,
        contact: &AfterHoursContact,
    ) -> Result<(), LeadbotError> {
        self.lock().contacts.push(contact.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogReader for MemoryStore {
    async fn persona(&self) -> Result<BotPersona, LeadbotError> {
        Ok(self.lock().persona.clone().unwrap_or_default())
    }

    async fn services(&self) -> Result<Vec<Service>, LeadbotError> {
        let mut services = self.lock().services.clone();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }
}

#[async_trait]
impl CatalogAdmin for MemoryStore {
    async fn ensure_persona(&self) -> Result<bool, LeadbotError> {
        let mut inner = self.lock();
        if inner.persona.is_some() {
            return Ok(false);
        }
        inner.persona = Some(BotPersona::default());
        Ok(true)
    }

    async fn save_persona(&self, persona: &BotPersona) -> Result<(), LeadbotError> {
        self.lock().persona = Some(persona.clone());
        Ok(())
    }

    async fn add_service(&self, name: &str) -> Result<Service, LeadbotError> {
        let mut inner = self.lock();
        if inner.services.iter().any(|s| s.name == name) {
            return Err(LeadbotError::Storage {
                source: format!("service {name} already exists").into(),
            });
        }
        inner.next_service_id += 1;
        let service = Service {
            id: inner.next_service_id,
            name: name.to_string(),
        };
        inner.services.push(service.clone());
        Ok(service)
    }

    async fn remove_service(&self, name: &str) -> Result<bool, LeadbotError> {
        let mut inner = self.lock();
        let before = inner.services.len();
        inner.services.retain(|s| s.name != name);
        Ok(inner.services.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(name: &str, date: &str) -> NewLead {
        NewLead {
            conversation_id: "c".into(),
            name: name.into(),
            phone: "+5212345678".into(),
            service_id: 1,
            service_name: "Grooming".into(),
            appointment_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[tokio::test]
    async fn save_is_compare_and_swap() {
        let store = MemoryStore::new();
        let id = ConversationId::from("c");

        let fresh = store.load(&id).await.unwrap();
        assert_eq!(fresh.version, 0);
        assert_eq!(store.save(&id, &fresh).await.unwrap(), 1);

        // A second writer still holding version 0 loses.
        assert!(matches!(
            store.save(&id, &fresh).await,
            Err(LeadbotError::SessionConflict { .. })
        ));

        let current = store.load(&id).await.unwrap();
        assert_eq!(store.save(&id, &current).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn lead_tuple_is_unique() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_lead_if_absent(&lead("Juan", "2025-06-02")).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert_eq!(
            store.insert_lead_if_absent(&lead("Juan", "2025-06-02")).await.unwrap(),
            InsertOutcome::Duplicate
        );
        store.insert_lead_if_absent(&lead("Juan", "2025-06-03")).await.unwrap();
        assert_eq!(store.list_leads().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let store = MemoryStore::new();
        let id = ConversationId::from("c");
        store.fail_next_load();
        assert!(store.load(&id).await.is_err());
        assert!(store.load(&id).await.is_ok());
    }

    #[tokio::test]
    async fn services_are_ordered_by_name() {
        let store = MemoryStore::new();
        store.seed_services(&["Grooming", "Baño"]);
        let names: Vec<_> = store
            .services()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Baño", "Grooming"]);
    }
}
