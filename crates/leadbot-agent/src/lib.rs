// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue engine and agent loop for the Leadbot assistant.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives messages from a channel adapter
//! - Runs each message as its own task, bounded by a semaphore
//! - Hands the message to the [`Orchestrator`] and sends its replies back
//! - Drains in-flight turns on shutdown

pub mod clock;
pub mod dates;
pub mod locks;
pub mod orchestrator;
pub mod replies;
pub mod shutdown;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use leadbot_config::model::AgentConfig;
use leadbot_core::{ChannelAdapter, InboundMessage, LeadbotError, OutboundMessage};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

pub use clock::{Clock, FixedClock, OfficeHours, SystemClock};
pub use dates::{DateResolution, DateResolver, DateSource};
pub use locks::SessionLocks;
pub use orchestrator::{Collaborators, Orchestrator};
pub use validation::{CheckError, PersistenceConflict, ValidationError};

/// Moves messages between the channel and the orchestrator.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    orchestrator: Arc<Orchestrator>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    shutdown_timeout: Duration,
}

impl AgentLoop {
    /// `channel` must already be connected.
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        orchestrator: Arc<Orchestrator>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            channel,
            orchestrator,
            permits: Arc::new(Semaphore::new(config.max_concurrent_turns.max(1))),
            tracker: TaskTracker::new(),
            shutdown_timeout: Duration::from_secs(config.shutdown_timeout_secs),
        }
    }

    /// Runs until `cancel` fires or the channel closes, then drains.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), LeadbotError> {
        info!(
            max_concurrent_turns = self.permits.available_permits(),
            "agent loop running"
        );

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            if !self.spawn_turn(inbound, &cancel).await? {
                                break;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            // If the channel is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        shutdown::drain_turns(&self.tracker, self.shutdown_timeout).await;
        info!("agent loop stopped");
        Ok(())
    }

    /// Waits for a free permit and spawns the turn. Returns false if
    /// shutdown started while waiting.
    async fn spawn_turn(
        &self,
        inbound: InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<bool, LeadbotError> {
        let permit = tokio::select! {
            permit = self.permits.clone().acquire_owned() => {
                permit.map_err(|e| LeadbotError::Internal(format!("turn semaphore closed: {e}")))?
            }
            _ = cancel.cancelled() => {
                info!(conversation_id = %inbound.conversation_id, "shutdown while waiting for a turn slot, dropping message");
                return Ok(false);
            }
        };

        let channel = self.channel.clone();
        let orchestrator = self.orchestrator.clone();
        self.tracker.spawn(async move {
            let _permit = permit;
            let conversation_id = inbound.conversation_id.clone();
            debug!(%conversation_id, message_id = %inbound.id, "handling inbound message");

            let replies = orchestrator.handle(&inbound).await;
            for reply in replies {
                let out = OutboundMessage {
                    conversation_id: conversation_id.clone(),
                    reply,
                };
                if let Err(e) = channel.send(out).await {
                    error!(%conversation_id, error = %e, "failed to send reply");
                }
            }
        });
        Ok(true)
    }
}
