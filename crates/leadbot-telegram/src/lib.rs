// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Leadbot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide long
//! polling. Text messages and inline button presses are queued on an mpsc
//! channel for the agent loop; replies are sent as plain text, with an inline
//! keyboard when the reply carries an affordance, or as photos.

pub mod handler;

use async_trait::async_trait;
use leadbot_config::model::TelegramConfig;
use leadbot_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundMessage, LeadbotError, MessageId,
    OutboundMessage, PluginAdapter, Reply,
};
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sent when a photo reply cannot be delivered.
pub const PHOTO_FAILED: &str = "No pude enviar la imagen en este momento.";

const INBOUND_BUFFER: usize = 100;

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, LeadbotError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            LeadbotError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(LeadbotError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

        Ok(Self {
            bot: Bot::new(token),
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    async fn send_text(&self, chat_id: ChatId, reply: &Reply) -> Result<Message, LeadbotError> {
        let text = reply.as_text().unwrap_or_default();
        let request = self.bot.send_message(chat_id, text);
        let result = match reply.affordance() {
            Some(affordance) => request.reply_markup(handler::keyboard_for(affordance)).await,
            None => request.await,
        };
        result.map_err(|e| LeadbotError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<Message, LeadbotError> {
        let parsed = url.parse().map_err(|e| LeadbotError::Channel {
            message: format!("invalid photo URL {url}: {e}"),
            source: None,
        })?;
        let request = self.bot.send_photo(chat_id, InputFile::url(parsed));
        let result = match caption {
            Some(caption) => request.caption(caption).await,
            None => request.await,
        };
        result.map_err(|e| LeadbotError::Channel {
            message: format!("failed to send photo: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadbotError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), LeadbotError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), LeadbotError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let messages = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                async move {
                    match handler::text_to_inbound(&msg) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => debug!(msg_id = msg.id.0, "ignoring non-text message"),
                    }
                    respond(())
                }
            });

            let callbacks =
                Update::filter_callback_query().endpoint(move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    async move {
                        // Clears the button's loading state on the client.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                        if let Some(inbound) = handler::callback_to_inbound(&query)
                            && tx.send(inbound).await.is_err()
                        {
                            warn!("inbound channel closed, dropping callback");
                        }
                        respond(())
                    }
                });

            let tree = dptree::entry().branch(messages).branch(callbacks);
            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadbotError> {
        let chat_id = handler::chat_id_of(&msg.conversation_id)?;

        let sent = match &msg.reply {
            Reply::Text { .. } => self.send_text(chat_id, &msg.reply).await?,
            Reply::Image { url, caption } => {
                match self.send_photo(chat_id, url, caption.as_deref()).await {
                    Ok(sent) => sent,
                    Err(e) => {
                        warn!(conversation_id = %msg.conversation_id, error = %e, "photo send failed, sending notice");
                        self.send_text(chat_id, &Reply::text(PHOTO_FAILED)).await?
                    }
                }
            }
        };

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, LeadbotError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| LeadbotError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&config(None)).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new(&config(Some(""))).is_err());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel =
            TelegramChannel::new(&config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11")))
                .unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[tokio::test]
    async fn queued_inbound_is_received() {
        let channel = TelegramChannel::new(&config(Some("test:token"))).unwrap();
        channel
            .inbound_tx
            .send(InboundMessage::text("4242", "hola"))
            .await
            .unwrap();
        let received = channel.receive().await.unwrap();
        assert_eq!(received.conversation_id.as_str(), "4242");
    }

    #[tokio::test]
    async fn send_rejects_non_numeric_conversation() {
        let channel = TelegramChannel::new(&config(Some("test:token"))).unwrap();
        let err = channel
            .send(OutboundMessage {
                conversation_id: "not-a-chat".into(),
                reply: Reply::text("hola"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeadbotError::Channel { .. }));
    }
}
