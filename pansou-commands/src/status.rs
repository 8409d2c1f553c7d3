//! `/status`: provider health probe plus runtime counters.

use anyhow::Result;
use pansou_core::Context;
use pansou_nav::ViewUpdate;
use pansou_settings::UserSettings;
use teloxide::prelude::*;

use crate::reply;

/// Report service health to anyone; admins also get runtime counters
/// and their own settings summary.
pub async fn handle_status(bot: &Bot, ctx: &Context, msg: &Message) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let placeholder =
        reply::reply_auto_delete(bot, ctx, msg.chat.id, "🔍 正在检测服务状态...").await?;
    let healthy = ctx.client.health_check().await;
    let settings = ctx
        .config
        .is_admin(user.id.0)
        .then(|| ctx.settings.get(user.id.0));
    let view = ViewUpdate {
        text: status_text(
            healthy,
            &ctx.config.pansou_api_url,
            ctx.cache.len(),
            ctx.deletions.pending_len(),
            settings.as_ref(),
        ),
        keyboard: None,
    };
    reply::edit_view(bot, ctx, msg.chat.id, placeholder.id, &view).await?;
    Ok(())
}

fn status_text(
    healthy: bool,
    api_url: &str,
    active_sessions: usize,
    pending_deletions: usize,
    settings: Option<&UserSettings>,
) -> String {
    let health = if healthy {
        "✅ 正常"
    } else {
        "❌ 不可用"
    };

    let Some(settings) = settings else {
        return format!("📡 <b>服务状态</b>\n\n搜索服务: {health}");
    };

    format!(
        "📡 <b>服务状态</b>\n\n\
         搜索服务: {health}\n\
         服务地址: <code>{}</code>\n\
         活跃搜索会话: {active_sessions}\n\
         待删除消息: {pending_deletions}\n\n{}",
        pansou_nav::render::escape_html(api_url),
        settings.format_display()
    )
}
