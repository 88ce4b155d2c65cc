// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadbot serve` command implementation.
//!
//! Opens SQLite storage, builds the OpenAI provider, the image search and
//! the Telegram channel, and runs the agent loop until a shutdown signal.

use std::sync::Arc;

use leadbot_agent::shutdown;
use leadbot_agent::{AgentLoop, Collaborators, Orchestrator, SystemClock};
use leadbot_config::LeadbotConfig;
use leadbot_core::{
    CatalogAdmin, CatalogReader, ChannelAdapter, ImageSearch, LeadbotError, PluginAdapter,
    StorageAdapter,
};
use leadbot_images::BingImageSearch;
use leadbot_openai::OpenAiProvider;
use leadbot_storage::SqliteStorage;
use leadbot_telegram::TelegramChannel;
use tracing::{error, info, warn};

/// Runs the `leadbot serve` command.
pub async fn run_serve(config: LeadbotConfig) -> Result<(), LeadbotError> {
    init_tracing(&config.agent.log_level);

    info!("starting leadbot serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    storage.ensure_persona().await?;
    let storage = Arc::new(storage);

    let services = storage.services().await?;
    if services.is_empty() {
        warn!("service catalog is empty; add services with `leadbot services add <name>`");
    } else {
        info!(count = services.len(), "service catalog loaded");
    }

    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
    let images = build_image_search(&config);

    let mut telegram = TelegramChannel::new(&config.telegram)?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let deps = Collaborators {
        sessions: storage.clone(),
        leads: storage.clone(),
        catalog: storage.clone(),
        provider,
        images,
        clock: Arc::new(SystemClock),
    };
    let orchestrator = Arc::new(Orchestrator::new(deps, &config));
    let agent_loop = AgentLoop::new(channel.clone(), orchestrator, &config.agent);

    let cancel = shutdown::install_signal_handler();
    let result = agent_loop.run(cancel).await;

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    if let Err(e) = storage.close().await {
        error!(error = %e, "failed to close storage");
    }

    info!("leadbot stopped");
    result
}

/// Image search is optional: a missing key disables photo replies instead of
/// refusing to start.
fn build_image_search(config: &LeadbotConfig) -> Option<Arc<dyn ImageSearch>> {
    if !config.images.enabled {
        info!("image search disabled by configuration");
        return None;
    }
    match BingImageSearch::new(&config.images) {
        Ok(search) => Some(Arc::new(search)),
        Err(e) => {
            warn!(error = %e, "image search unavailable, photo requests will get a text apology");
            None
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
