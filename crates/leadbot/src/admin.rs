// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin subcommands: persona, service catalog and leads.
//!
//! These write to the same store the running bot reads, so catalog and
//! persona edits take effect on the bot's next turn without a restart.

use clap::{Args, Subcommand};
use leadbot_config::LeadbotConfig;
use leadbot_core::{
    BotPersona, CatalogAdmin, Lead, LeadStore, LeadbotError, Service, StorageAdapter, Tone,
};
use leadbot_storage::SqliteStorage;

#[derive(Subcommand, Debug)]
pub enum PersonaCommand {
    /// Print the current persona.
    Show,
    /// Update persona fields; omitted fields keep their value.
    Set(PersonaUpdate),
}

#[derive(Args, Debug, Default)]
pub struct PersonaUpdate {
    /// Display name of the bot.
    #[arg(long)]
    pub name: Option<String>,
    /// One of amigable, formal, divertido, profesional, elegante.
    #[arg(long)]
    pub tone: Option<Tone>,
    /// Domain the bot answers about.
    #[arg(long)]
    pub topic: Option<String>,
    /// Greeting sent on "hola" and commands.
    #[arg(long)]
    pub greeting: Option<String>,
    /// Whether replies may use emojis.
    #[arg(long, action = clap::ArgAction::Set)]
    pub emojis: Option<bool>,
}

impl PersonaUpdate {
    fn apply(self, persona: &mut BotPersona) {
        if let Some(name) = self.name {
            persona.name = name;
        }
        if let Some(tone) = self.tone {
            persona.tone = tone;
        }
        if let Some(topic) = self.topic {
            persona.topic = topic;
        }
        if let Some(greeting) = self.greeting {
            persona.greeting = greeting;
        }
        if let Some(emojis) = self.emojis {
            persona.use_emojis = emojis;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommand {
    /// List catalog entries.
    List,
    /// Add a service.
    Add { name: String },
    /// Remove a service by exact name.
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum LeadsCommand {
    /// List captured leads, newest first.
    List,
    /// Delete a lead by id.
    Delete { id: i64 },
}

#[derive(Debug)]
pub enum AdminCommand {
    Persona(PersonaCommand),
    Services(ServicesCommand),
    Leads(LeadsCommand),
}

/// Opens the configured database, runs `command` and prints its output.
pub async fn run(command: AdminCommand, config: &LeadbotConfig) -> Result<(), LeadbotError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    storage.ensure_persona().await?;

    let result = execute(command, &storage).await;
    storage.close().await?;

    println!("{}", result?);
    Ok(())
}

/// Runs one admin command against `store` and returns the text to print.
pub async fn execute<S>(command: AdminCommand, store: &S) -> Result<String, LeadbotError>
where
    S: CatalogAdmin + LeadStore + ?Sized,
{
    match command {
        AdminCommand::Persona(PersonaCommand::Show) => Ok(format_persona(&store.persona().await?)),
        AdminCommand::Persona(PersonaCommand::Set(update)) => {
            let mut persona = store.persona().await?;
            update.apply(&mut persona);
            store.save_persona(&persona).await?;
            Ok(format_persona(&persona))
        }
        AdminCommand::Services(ServicesCommand::List) => {
            Ok(format_services(&store.services().await?))
        }
        AdminCommand::Services(ServicesCommand::Add { name }) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(LeadbotError::Config("service name cannot be empty".into()));
            }
            let service = store.add_service(name).await?;
            Ok(format!("added service #{}: {}", service.id, service.name))
        }
        AdminCommand::Services(ServicesCommand::Remove { name }) => {
            if store.remove_service(name.trim()).await? {
                Ok(format!("removed service: {name}"))
            } else {
                Ok(format!("no service named {name}"))
            }
        }
        AdminCommand::Leads(LeadsCommand::List) => Ok(format_leads(&store.list_leads().await?)),
        AdminCommand::Leads(LeadsCommand::Delete { id }) => {
            if store.delete_lead(id).await? {
                Ok(format!("deleted lead #{id}"))
            } else {
                Ok(format!("no lead with id {id}"))
            }
        }
    }
}

fn format_persona(persona: &BotPersona) -> String {
    format!(
        "name:     {}\ntone:     {}\ntopic:    {}\ngreeting: {}\nemojis:   {}",
        persona.name,
        persona.tone,
        persona.topic,
        persona.greeting,
        if persona.use_emojis { "yes" } else { "no" },
    )
}

fn format_services(services: &[Service]) -> String {
    if services.is_empty() {
        return "no services".to_string();
    }
    services
        .iter()
        .map(|s| format!("{:>4}  {}", s.id, s.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_leads(leads: &[Lead]) -> String {
    if leads.is_empty() {
        return "no leads".to_string();
    }
    leads
        .iter()
        .map(|l| {
            format!(
                "{:>4}  {}  {}  {}  {}  {}",
                l.id,
                l.appointment_date.format("%d/%m/%Y"),
                l.name,
                l.phone,
                l.service_name,
                l.created_at,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leadbot_core::{CatalogReader, InsertOutcome, NewLead};
    use leadbot_test_utils::MemoryStore;

    #[tokio::test]
    async fn persona_set_keeps_omitted_fields() {
        let store = MemoryStore::new();
        let update = PersonaUpdate {
            tone: Some(Tone::Elegante),
            greeting: Some("Bienvenido".into()),
            ..PersonaUpdate::default()
        };
        let out = execute(AdminCommand::Persona(PersonaCommand::Set(update)), &store)
            .await
            .unwrap();
        assert!(out.contains("tone:     elegante"));

        let persona = store.persona().await.unwrap();
        assert_eq!(persona.tone, Tone::Elegante);
        assert_eq!(persona.greeting, "Bienvenido");
        assert_eq!(persona.name, BotPersona::default().name);
    }

    #[tokio::test]
    async fn services_add_list_remove() {
        let store = MemoryStore::new();
        execute(
            AdminCommand::Services(ServicesCommand::Add {
                name: "  Grooming ".into(),
            }),
            &store,
        )
        .await
        .unwrap();

        let listed = execute(AdminCommand::Services(ServicesCommand::List), &store)
            .await
            .unwrap();
        assert!(listed.ends_with("  Grooming"), "got: {listed}");

        let removed = execute(
            AdminCommand::Services(ServicesCommand::Remove {
                name: "Grooming".into(),
            }),
            &store,
        )
        .await
        .unwrap();
        assert_eq!(removed, "removed service: Grooming");
        assert!(store.services().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_service_name_is_rejected() {
        let store = MemoryStore::new();
        let err = execute(
            AdminCommand::Services(ServicesCommand::Add { name: "   ".into() }),
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LeadbotError::Config(_)));
    }

    #[tokio::test]
    async fn leads_list_and_delete() {
        let store = MemoryStore::new();
        let service = store.add_service("Grooming").await.unwrap();
        let outcome = store
            .insert_lead_if_absent(&NewLead {
                conversation_id: "42".into(),
                name: "Juan Perez".into(),
                phone: "+5212345678".into(),
                service_id: service.id,
                service_name: service.name.clone(),
                appointment_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            })
            .await
            .unwrap();
        let InsertOutcome::Inserted(lead) = outcome else {
            panic!("expected insert");
        };

        let listed = execute(AdminCommand::Leads(LeadsCommand::List), &store)
            .await
            .unwrap();
        assert!(listed.contains("02/06/2025  Juan Perez  +5212345678  Grooming"));

        let deleted = execute(AdminCommand::Leads(LeadsCommand::Delete { id: lead.id }), &store)
            .await
            .unwrap();
        assert_eq!(deleted, format!("deleted lead #{}", lead.id));
        assert_eq!(
            execute(AdminCommand::Leads(LeadsCommand::List), &store)
                .await
                .unwrap(),
            "no leads"
        );
    }
}
