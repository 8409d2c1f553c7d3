//! Telegram command and callback handlers.

/// Inline button press handling.
pub mod callback;
/// Static help and welcome texts.
pub mod help;
/// Outgoing message plumbing.
pub mod reply;
/// Search execution and rendering.
pub mod search;
/// `/settings`, `/filter`, and `/types`.
pub mod settings;
/// `/status` health reporting.
pub mod status;
/// Bot API adapters for the navigation runtime.
pub mod transport;

use anyhow::Result;
use pansou_core::Context;
use teloxide::prelude::*;
use teloxide::types::User;
use teloxide::utils::command::BotCommands;

pub use callback::handle_callback;
pub use transport::BotDeleter;

/// Commands understood by the bot.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "开始使用")]
    Start,
    #[command(description = "使用帮助")]
    Help,
    #[command(description = "搜索网盘资源")]
    Search(String),
    #[command(description = "搜索（简写）")]
    S(String),
    #[command(description = "支持的网盘类型")]
    Types,
    #[command(description = "个人搜索设置")]
    Settings(String),
    #[command(description = "管理过滤词")]
    Filter(String),
    #[command(description = "服务状态")]
    Status,
}

/// Dispatch one parsed command.
pub async fn handle_command(bot: Bot, ctx: Context, msg: Message, cmd: Command) -> Result<()> {
    match cmd {
        Command::Start => help::handle_start(&bot, &ctx, &msg).await,
        Command::Help => help::handle_help(&bot, &ctx, &msg).await,
        Command::Search(keyword) | Command::S(keyword) => {
            search::run_from_message(&bot, &ctx, &msg, &keyword).await
        }
        Command::Types => settings::handle_types(&bot, &ctx, &msg).await,
        Command::Settings(args) => settings::handle_settings(&bot, &ctx, &msg, &args).await,
        Command::Filter(args) => settings::handle_filter(&bot, &ctx, &msg, &args).await,
        Command::Status => status::handle_status(&bot, &ctx, &msg).await,
    }
}

/// Handle non-command messages: welcome new members, and in private
/// chats treat plain text as a search keyword.
pub async fn handle_text(bot: Bot, ctx: Context, msg: Message) -> Result<()> {
    if let Some(members) = msg.new_chat_members() {
        for member in members.iter().filter(|member| !member.is_bot) {
            let text = help::welcome_text(&member.first_name);
            reply::reply_auto_delete(&bot, &ctx, msg.chat.id, &text).await?;
        }
        return Ok(());
    }

    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if text.starts_with('/') {
        return Ok(());
    }
    search::run_from_message(&bot, &ctx, &msg, text).await
}

/// Resolve the sender and gate on the admin list; a denial is reported
/// to the chat and returns `None`.
pub(crate) async fn require_admin<'a>(
    bot: &Bot,
    ctx: &Context,
    msg: &'a Message,
) -> Result<Option<&'a User>> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(None);
    };
    if ctx.config.is_admin(user.id.0) {
        return Ok(Some(user));
    }
    reply::reply_auto_delete(bot, ctx, msg.chat.id, "⛔️ 该命令仅限管理员使用").await?;
    Ok(None)
}
