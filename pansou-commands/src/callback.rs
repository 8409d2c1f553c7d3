//! Callback query handling: decode the token, resolve the intent, edit.

use anyhow::Result;
use pansou_core::Context;
use pansou_nav::navigate::resolve;
use pansou_nav::pagination::token::{DecodedToken, decode};
use pansou_nav::render;
use pansou_nav::{NavOutcome, SessionKey};
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::debug;

use crate::{reply, search};

/// Handle one inline button press.
///
/// Every press is answered exactly once so the client spinner always
/// stops; malformed payloads are answered silently.
pub async fn handle_callback(bot: Bot, ctx: Context, query: CallbackQuery) -> Result<()> {
    let (Some(data), Some(message)) = (query.data.as_deref(), query.message.as_ref()) else {
        bot.answer_callback_query(query.id).await?;
        return Ok(());
    };

    let chat_id = message.chat().id;
    let message_id = message.id();
    let caller = SessionKey::new(chat_id.0, query.from.id.0);

    let DecodedToken::Nav { key, intent } = decode(data, caller) else {
        debug!(data, "ignoring malformed callback payload");
        bot.answer_callback_query(query.id).await?;
        return Ok(());
    };

    match resolve(&ctx.cache, key, intent, ctx.config.page_size) {
        NavOutcome::Ack => {
            bot.answer_callback_query(query.id).await?;
        }
        NavOutcome::EmptyCategory => {
            bot.answer_callback_query(query.id)
                .text("❌ 该类型暂无资源")
                .await?;
        }
        NavOutcome::Render(view) | NavOutcome::Expired(view) => {
            bot.answer_callback_query(query.id).await?;
            reply::edit_view(&bot, &ctx, chat_id, message_id, &view).await?;
        }
        NavOutcome::Refresh { keyword } => {
            bot.answer_callback_query(query.id).await?;
            reply::edit_placeholder(&bot, chat_id, message_id, &render::refreshing(&keyword))
                .await?;
            search::run_and_render(&bot, &ctx, key, message_id, &keyword).await?;
        }
    }
    Ok(())
}
