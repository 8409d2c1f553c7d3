//! Outgoing message plumbing: HTML parse mode, link previews off, and
//! the auto-delete timer armed on everything the bot renders.

use anyhow::Result;
use pansou_core::Context;
use pansou_nav::ViewUpdate;
use pansou_nav::keyboard::Keyboard;
use pansou_nav::render;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, MessageId, ParseMode,
};

/// Convert a keyboard descriptor into transport markup.
pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows = keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(&button.label, &button.token))
    });
    InlineKeyboardMarkup::new(rows)
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

/// Send a self-destructing HTML reply and arm its deletion timer.
pub async fn reply_auto_delete(
    bot: &Bot,
    ctx: &Context,
    chat_id: ChatId,
    text: &str,
) -> Result<Message> {
    let body = render::with_auto_delete_notice(text, ctx.config.auto_delete_delay);
    let message = bot
        .send_message(chat_id, body)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .await?;
    ctx.deletions
        .arm(chat_id.0, message.id.0, ctx.config.auto_delete_delay);
    Ok(message)
}

/// Edit a rendered message in place and re-arm its deletion timer.
pub async fn edit_view(
    bot: &Bot,
    ctx: &Context,
    chat_id: ChatId,
    message_id: MessageId,
    view: &ViewUpdate,
) -> Result<()> {
    let body = render::with_auto_delete_notice(&view.text, ctx.config.auto_delete_delay);
    let mut request = bot
        .edit_message_text(chat_id, message_id, body)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview());
    if let Some(keyboard) = &view.keyboard {
        request = request.reply_markup(to_markup(keyboard));
    }
    request.await?;
    ctx.deletions
        .arm(chat_id.0, message_id.0, ctx.config.auto_delete_delay);
    Ok(())
}

/// Edit to a transient placeholder (no keyboard, no notice).
pub async fn edit_placeholder(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
) -> Result<()> {
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pansou_nav::SessionKey;
    use pansou_nav::keyboard::back_refresh_keyboard;

    #[test]
    fn markup_preserves_row_shape_and_tokens() {
        let keyboard = back_refresh_keyboard(SessionKey::new(1, 2));
        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "🔙 返回分类");
    }
}
