// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between Telegram updates and channel-agnostic messages.
//!
//! Text messages become [`InboundContent::Text`], inline button presses
//! become [`InboundContent::Action`]. The conversation id is the chat id.

use leadbot_core::{
    Affordance, ConversationId, InboundContent, InboundMessage, LeadbotError, SenderInfo,
};
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, User,
};

/// Builds an inbound message from a text message. Non-text messages yield `None`.
pub fn text_to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    Some(InboundMessage {
        id: msg.id.0.to_string(),
        conversation_id: ConversationId(msg.chat.id.0.to_string()),
        sender: msg.from.as_ref().map(sender_info).unwrap_or_default(),
        content: InboundContent::Text(text.to_string()),
        received_at: msg.date,
    })
}

/// Builds an inbound action from a callback query.
///
/// Queries without data or without an originating chat yield `None`.
pub fn callback_to_inbound(query: &CallbackQuery) -> Option<InboundMessage> {
    let data = query.data.as_deref()?;
    let chat_id = query.message.as_ref()?.chat().id;
    Some(InboundMessage {
        id: query.id.to_string(),
        conversation_id: ConversationId(chat_id.0.to_string()),
        sender: sender_info(&query.from),
        content: InboundContent::Action(data.to_string()),
        received_at: chrono::Utc::now(),
    })
}

fn sender_info(user: &User) -> SenderInfo {
    SenderInfo {
        display_name: Some(user.full_name()),
        username: user.username.clone(),
    }
}

/// One-button inline keyboard for an affordance.
pub fn keyboard_for(affordance: Affordance) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        affordance.label(),
        affordance.action_id(),
    )]])
}

/// Parses a conversation id back into a Telegram chat id.
pub fn chat_id_of(conversation_id: &ConversationId) -> Result<ChatId, LeadbotError> {
    conversation_id
        .as_str()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| LeadbotError::Channel {
            message: format!("invalid chat id {conversation_id}: {e}"),
            source: None,
        })
}
