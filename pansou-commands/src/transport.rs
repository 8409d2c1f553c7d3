//! Telegram-backed deleter for the deferred deletion queue.

use async_trait::async_trait;
use pansou_nav::{DeleteOutcome, MessageDeleter};
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};

/// Deletes rendered messages through the Bot API.
///
/// A message the user already removed counts as success, so the sweep
/// never retries it.
pub struct BotDeleter {
    bot: Bot,
}

impl BotDeleter {
    pub fn new(bot: Bot) -> BotDeleter {
        BotDeleter { bot }
    }
}

#[async_trait]
impl MessageDeleter for BotDeleter {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> anyhow::Result<DeleteOutcome> {
        match self
            .bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
        {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(RequestError::Api(
                ApiError::MessageToDeleteNotFound | ApiError::MessageIdInvalid,
            )) => Ok(DeleteOutcome::NotFound),
            Err(source) => Err(source.into()),
        }
    }
}
