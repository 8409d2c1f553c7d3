//! Static help and welcome texts.

use anyhow::Result;
use pansou_core::Context;
use teloxide::prelude::*;

use crate::reply;

pub async fn handle_start(bot: &Bot, ctx: &Context, msg: &Message) -> Result<()> {
    let is_admin = msg
        .from
        .as_ref()
        .is_some_and(|user| ctx.config.is_admin(user.id.0));
    reply::reply_auto_delete(bot, ctx, msg.chat.id, &start_text(is_admin)).await?;
    Ok(())
}

pub async fn handle_help(bot: &Bot, ctx: &Context, msg: &Message) -> Result<()> {
    let is_admin = msg
        .from
        .as_ref()
        .is_some_and(|user| ctx.config.is_admin(user.id.0));
    reply::reply_auto_delete(bot, ctx, msg.chat.id, &help_text(is_admin)).await?;
    Ok(())
}

pub fn start_text(is_admin: bool) -> String {
    let mut text = String::from(
        "👋 欢迎使用网盘资源搜索机器人！\n\n\
         🔍 直接发送关键词即可搜索（私聊），\n\
         或使用 /search 关键词（群组）。\n\n\
         常用命令:\n\
         /search 关键词 - 搜索网盘资源\n\
         /s 关键词 - 搜索（简写）\n\
         /status - 服务状态\n\
         /help - 查看完整帮助",
    );
    if is_admin {
        text.push_str(
            "\n\n管理命令:\n\
             /types - 支持的网盘类型\n\
             /settings - 个人搜索设置\n\
             /filter - 管理过滤词",
        );
    }
    text
}

pub fn help_text(is_admin: bool) -> String {
    let mut text = String::from(
        "📖 <b>使用帮助</b>\n\n\
         🔍 <b>搜索</b>\n\
         /search 关键词 - 搜索网盘资源\n\
         /s 关键词 - 搜索（简写）\n\
         私聊时直接发送关键词即可\n\n\
         📁 <b>浏览结果</b>\n\
         搜索完成后点击网盘类型按钮查看资源，\n\
         使用 ⬅️/➡️ 翻页，🔙 返回分类，🔄 重新搜索\n\n\
         ℹ️ <b>其他</b>\n\
         /status - 服务状态\n\
         /start - 开始使用",
    );
    if is_admin {
        text.push_str(
            "\n\n⚙️ <b>管理命令</b>\n\
             /types - 支持的网盘类型\n\
             /settings - 查看当前设置\n\
             /settings reset - 恢复默认设置\n\
             /settings types 类型 - 设置网盘类型\n\
             /settings limit 数量 - 设置结果数量\n\
             /settings source all|tg|plugin - 设置搜索来源\n\
             /filter include 词 - 添加包含过滤\n\
             /filter exclude 词 - 添加排除过滤\n\
             /filter remove 词 - 移除过滤词\n\
             /filter clear - 清空过滤词",
        );
    }
    text.push_str("\n\n⏰ 所有消息都会在一段时间后自动删除");
    text
}

pub fn welcome_text(name: &str) -> String {
    format!(
        "👋 欢迎 {name}！\n\n\
         发送 /search 关键词 即可搜索网盘资源，\n\
         /help 查看完整用法。",
        name = pansou_nav::render::escape_html(name)
    )
}
