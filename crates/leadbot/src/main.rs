// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadbot - a lead-capture chat assistant.
//!
//! This is the binary entry point: `serve` runs the Telegram bot, the other
//! subcommands administer the persona, the service catalog and the leads.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;

use clap::{Parser, Subcommand};

use crate::admin::{LeadsCommand, PersonaCommand, ServicesCommand};

/// Leadbot - a lead-capture chat assistant.
#[derive(Parser, Debug)]
#[command(name = "leadbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Telegram bot.
    Serve,
    /// Show or edit the bot persona.
    Persona {
        #[command(subcommand)]
        action: PersonaCommand,
    },
    /// Manage the service catalog.
    Services {
        #[command(subcommand)]
        action: ServicesCommand,
    },
    /// Inspect or delete captured leads.
    Leads {
        #[command(subcommand)]
        action: LeadsCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match leadbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            leadbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Persona { action }) => admin::run(admin::AdminCommand::Persona(action), &config).await,
        Some(Commands::Services { action }) => {
            admin::run(admin::AdminCommand::Services(action), &config).await
        }
        Some(Commands::Leads { action }) => admin::run(admin::AdminCommand::Leads(action), &config).await,
        None => {
            println!("leadbot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
