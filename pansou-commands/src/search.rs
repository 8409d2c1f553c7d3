//! Search execution: placeholder, provider call, first rendered view.

use anyhow::Result;
use pansou_core::{Config, Context};
use pansou_nav::navigate::overview_view;
use pansou_nav::render;
use pansou_nav::{SearchSession, SessionKey};
use pansou_search::SearchOptions;
use pansou_settings::UserSettings;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::info;

use crate::reply;

const MIN_KEYWORD_CHARS: usize = 2;

/// Run a search triggered by a command or plain text message.
pub async fn run_from_message(
    bot: &Bot,
    ctx: &Context,
    msg: &Message,
    keyword: &str,
) -> Result<()> {
    let keyword = keyword.trim();
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    if keyword.chars().count() < MIN_KEYWORD_CHARS {
        reply::reply_auto_delete(
            bot,
            ctx,
            msg.chat.id,
            "⚠️ 请输入至少 2 个字符的搜索关键词\n\n用法: /search 关键词",
        )
        .await?;
        return Ok(());
    }

    let placeholder =
        reply::reply_auto_delete(bot, ctx, msg.chat.id, &render::searching(keyword)).await?;
    let key = SessionKey::new(msg.chat.id.0, user.id.0);
    run_and_render(bot, ctx, key, placeholder.id, keyword).await
}

/// Call the provider and replace `message_id` with the overview (or an
/// error / empty notice). Also the second half of a refresh.
pub async fn run_and_render(
    bot: &Bot,
    ctx: &Context,
    key: SessionKey,
    message_id: MessageId,
    keyword: &str,
) -> Result<()> {
    let settings = ctx.settings.get(key.user_id);
    let options = effective_options(&settings, &ctx.config);
    let chat_id = ChatId(key.chat_id);

    let results = match ctx.client.search(keyword, &options).await {
        Ok(results) => results,
        Err(source) => {
            let view = pansou_nav::ViewUpdate {
                text: render::search_failed(&source.to_string()),
                keyboard: None,
            };
            reply::edit_view(bot, ctx, chat_id, message_id, &view).await?;
            return Ok(());
        }
    };

    if results.is_empty() {
        let view = pansou_nav::ViewUpdate {
            text: render::no_results(keyword),
            keyboard: None,
        };
        reply::edit_view(bot, ctx, chat_id, message_id, &view).await?;
        return Ok(());
    }

    info!(
        chat_id = key.chat_id,
        user_id = key.user_id,
        keyword,
        total = results.total,
        "search completed"
    );

    let session = SearchSession::new(keyword, results);
    let view = overview_view(key, &session);
    ctx.cache.put(key, session);
    reply::edit_view(bot, ctx, chat_id, message_id, &view).await?;
    Ok(())
}

/// Provider options for a user: their own channel/plugin lists when
/// set, the configured defaults otherwise.
fn effective_options(settings: &UserSettings, config: &Config) -> SearchOptions {
    let mut options = settings.search_options();
    if options.channels.is_empty() {
        options.channels = config.default_channels.clone();
    }
    if options.plugins.is_empty() {
        options.plugins = config.default_plugins.clone();
    }
    options
}
