//! `/settings`, `/filter`, and `/types` command handling.

use anyhow::Result;
use pansou_core::Context;
use pansou_search::CloudType;
use pansou_settings::settings::SOURCE_TYPES;
use teloxide::prelude::*;

use crate::{reply, require_admin};

/// Parsed form of the `/settings` argument string.
#[derive(Debug, PartialEq, Eq)]
enum SettingsAction {
    Show,
    Reset,
    Limit(usize),
    Source(String),
    CloudTypes(Vec<String>),
}

/// Parsed form of the `/filter` argument string.
#[derive(Debug, PartialEq, Eq)]
enum FilterAction {
    Show,
    Include(Vec<String>),
    Exclude(Vec<String>),
    Remove(String),
    Clear,
}

pub async fn handle_types(bot: &Bot, ctx: &Context, msg: &Message) -> Result<()> {
    if require_admin(bot, ctx, msg).await?.is_none() {
        return Ok(());
    }
    reply::reply_auto_delete(bot, ctx, msg.chat.id, &types_text()).await?;
    Ok(())
}

pub async fn handle_settings(bot: &Bot, ctx: &Context, msg: &Message, args: &str) -> Result<()> {
    let Some(user) = require_admin(bot, ctx, msg).await? else {
        return Ok(());
    };

    let text = match parse_settings_args(args) {
        Err(message) => message,
        Ok(SettingsAction::Show) => ctx.settings.get(user.id.0).format_display(),
        Ok(SettingsAction::Reset) => {
            ctx.settings.reset(user.id.0);
            "✅ 设置已恢复默认".to_owned()
        }
        Ok(SettingsAction::Limit(limit)) => {
            if (1..=ctx.config.max_result_limit).contains(&limit) {
                ctx.settings
                    .update(user.id.0, |settings| settings.result_limit = limit);
                format!("✅ 结果数量已设置为 {limit}")
            } else {
                format!("⚠️ 结果数量必须在 1-{} 之间", ctx.config.max_result_limit)
            }
        }
        Ok(SettingsAction::Source(source)) => {
            ctx.settings
                .update(user.id.0, |settings| settings.source_type = source.clone());
            format!("✅ 搜索来源已设置为 {source}")
        }
        Ok(SettingsAction::CloudTypes(tags)) => {
            let (valid, invalid) = partition_tags(&tags);
            if valid.is_empty() {
                format!(
                    "⚠️ 没有有效的网盘类型: {}\n\n使用 /types 查看支持的类型",
                    invalid.join(", ")
                )
            } else {
                ctx.settings
                    .update(user.id.0, |settings| settings.cloud_types = valid.clone());
                let mut text = format!("✅ 网盘类型已设置为: {}", valid.join(", "));
                if !invalid.is_empty() {
                    text.push_str(&format!("\n⚠️ 已忽略无效类型: {}", invalid.join(", ")));
                }
                text
            }
        }
    };

    reply::reply_auto_delete(bot, ctx, msg.chat.id, &text).await?;
    Ok(())
}

pub async fn handle_filter(bot: &Bot, ctx: &Context, msg: &Message, args: &str) -> Result<()> {
    let Some(user) = require_admin(bot, ctx, msg).await? else {
        return Ok(());
    };

    let text = match parse_filter_args(args) {
        Err(message) => message,
        Ok(FilterAction::Show) => {
            let settings = ctx.settings.get(user.id.0);
            if settings.filter_include.is_empty() && settings.filter_exclude.is_empty() {
                "📝 当前没有设置过滤词\n\n\
                 /filter include 词 - 添加包含过滤\n\
                 /filter exclude 词 - 添加排除过滤"
                    .to_owned()
            } else {
                format!(
                    "📝 <b>当前过滤词</b>\n\n✅ 包含: {}\n❌ 排除: {}",
                    join_or_none(&settings.filter_include),
                    join_or_none(&settings.filter_exclude)
                )
            }
        }
        Ok(FilterAction::Include(words)) => {
            let updated = ctx.settings.update(user.id.0, |settings| {
                merge_words(&mut settings.filter_include, &words);
            });
            format!("✅ 包含过滤: {}", join_or_none(&updated.filter_include))
        }
        Ok(FilterAction::Exclude(words)) => {
            let updated = ctx.settings.update(user.id.0, |settings| {
                merge_words(&mut settings.filter_exclude, &words);
            });
            format!("❌ 排除过滤: {}", join_or_none(&updated.filter_exclude))
        }
        Ok(FilterAction::Remove(word)) => {
            let mut removed = false;
            ctx.settings.update(user.id.0, |settings| {
                let before =
                    settings.filter_include.len() + settings.filter_exclude.len();
                settings.filter_include.retain(|w| *w != word);
                settings.filter_exclude.retain(|w| *w != word);
                removed =
                    settings.filter_include.len() + settings.filter_exclude.len() < before;
            });
            if removed {
                format!("✅ 已移除过滤词: {word}")
            } else {
                format!("⚠️ 未找到过滤词: {word}")
            }
        }
        Ok(FilterAction::Clear) => {
            ctx.settings.update(user.id.0, |settings| {
                settings.filter_include.clear();
                settings.filter_exclude.clear();
            });
            "✅ 过滤词已清空".to_owned()
        }
    };

    reply::reply_auto_delete(bot, ctx, msg.chat.id, &text).await?;
    Ok(())
}

fn types_text() -> String {
    let mut lines = vec!["📁 <b>支持的网盘类型</b>\n".to_owned()];
    for ty in CloudType::ALL {
        lines.push(format!(
            "{} {} (<code>{}</code>)",
            ty.icon(),
            ty.display_name(),
            ty.tag()
        ));
    }
    lines.join("\n")
}

fn parse_settings_args(args: &str) -> Result<SettingsAction, String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [] | ["show"] => Ok(SettingsAction::Show),
        ["reset"] => Ok(SettingsAction::Reset),
        ["limit", raw] => raw
            .parse::<usize>()
            .map(SettingsAction::Limit)
            .map_err(|_| format!("⚠️ 无效的数量: {raw}")),
        ["source", raw] => {
            if SOURCE_TYPES.contains(raw) {
                Ok(SettingsAction::Source((*raw).to_owned()))
            } else {
                Err(format!(
                    "⚠️ 无效的来源: {raw}，可选: {}",
                    SOURCE_TYPES.join("/")
                ))
            }
        }
        ["types", rest @ ..] if !rest.is_empty() => {
            // Tags may be comma-separated, space-separated, or both.
            let tags: Vec<String> = rest
                .iter()
                .flat_map(|part| part.split(','))
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect();
            if tags.is_empty() {
                Err("⚠️ 用法: /settings types baidu,quark".to_owned())
            } else {
                Ok(SettingsAction::CloudTypes(tags))
            }
        }
        _ => Err(
            "⚠️ 用法: /settings [show|reset|types 类型|limit 数量|source 来源]".to_owned(),
        ),
    }
}

/// Split requested tags into known cloud types and rejects, dropping
/// duplicates from the kept list.
fn partition_tags(tags: &[String]) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for tag in tags {
        if CloudType::from_tag(tag).is_none() {
            invalid.push(tag.clone());
        } else if !valid.contains(tag) {
            valid.push(tag.clone());
        }
    }
    (valid, invalid)
}

fn parse_filter_args(args: &str) -> Result<FilterAction, String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [] | ["show"] => Ok(FilterAction::Show),
        ["clear"] => Ok(FilterAction::Clear),
        ["include", words @ ..] if !words.is_empty() => Ok(FilterAction::Include(
            words.iter().map(|w| (*w).to_owned()).collect(),
        )),
        ["exclude", words @ ..] if !words.is_empty() => Ok(FilterAction::Exclude(
            words.iter().map(|w| (*w).to_owned()).collect(),
        )),
        ["remove", word] => Ok(FilterAction::Remove((*word).to_owned())),
        _ => Err(
            "⚠️ 用法: /filter [include 词|exclude 词|remove 词|clear]".to_owned(),
        ),
    }
}

fn merge_words(existing: &mut Vec<String>, added: &[String]) {
    for word in added {
        if !existing.contains(word) {
            existing.push(word.clone());
        }
    }
}

fn join_or_none(words: &[String]) -> String {
    if words.is_empty() {
        "无".to_owned()
    } else {
        words.join(", ")
    }
}
