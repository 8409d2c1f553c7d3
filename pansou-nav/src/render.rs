//! HTML text rendering for search views (Telegram HTML parse mode).

use std::time::Duration;

use pansou_search::{CloudType, ResourceLink, SearchData};

use crate::pagination::Page;

/// Telegram message budget, minus headroom for the truncation notice.
const MAX_MESSAGE_LEN: usize = 4000;
const TRUNCATED_BODY_LEN: usize = 3950;
const TRUNCATION_NOTICE: &str = "\n\n...（内容过长已截断）";

const FOOTER_RULE: &str = "─────────────";
const ALL_RESULTS_PREVIEW: usize = 5;

/// Append the self-destruct notice shown on every rendered message.
pub fn with_auto_delete_notice(text: &str, delay: Duration) -> String {
    let minutes = delay.as_secs().div_ceil(60).max(1);
    format!("{text}\n\n<i>⏰ 此消息将在 {minutes} 分钟后自动删除</i>")
}

/// Placeholder shown while the provider call is in flight.
pub fn searching(keyword: &str) -> String {
    format!("🔍 正在搜索：<b>{}</b>...", escape_html(keyword))
}

/// Placeholder shown while a refresh re-runs the previous search.
pub fn refreshing(keyword: &str) -> String {
    format!("🔄 正在重新搜索：<b>{}</b>...", escape_html(keyword))
}

/// Overview body: totals plus a prompt to pick a category.
pub fn overview(keyword: &str, total: usize) -> String {
    format!(
        "🔍 搜索结果: {}\n📊 共找到 {total} 条结果\n\n👇 请选择网盘类型查看详细资源:",
        escape_html(keyword)
    )
}

pub fn no_results(keyword: &str) -> String {
    format!("🔍 未找到与「{}」相关的资源", escape_html(keyword))
}

pub fn search_failed(message: &str) -> String {
    format!("❌ {}", escape_html(message))
}

/// Notice shown when a navigation intent outlives its session.
pub fn expired() -> String {
    "⚠️ 搜索结果已过期，请重新搜索".to_owned()
}

/// One page of a single category.
pub fn category_page(
    keyword: &str,
    category: CloudType,
    total_in_category: usize,
    page: &Page<'_, ResourceLink>,
    page_size: usize,
) -> String {
    let mut lines = vec![
        format!(
            "{} <b>{}</b> - {}",
            category.icon(),
            category.display_name(),
            escape_html(keyword)
        ),
        format!(
            "📊 共 {total_in_category} 条结果 (第{}/{}页)\n",
            page.page, page.total_pages
        ),
    ];

    let first_index = (page.page - 1) * page_size;
    for (offset, link) in page.items.iter().enumerate() {
        push_link(&mut lines, first_index + offset + 1, link);
    }

    lines.push(FOOTER_RULE.to_owned());
    lines.push("💡 提示: 点击链接可访问，长按可复制".to_owned());
    lines.join("\n")
}

/// Every category at once, previewing the first few links of each.
pub fn all_results(keyword: &str, results: &SearchData) -> String {
    let mut lines = vec![
        format!("🔍 搜索结果: {}", escape_html(keyword)),
        format!("📊 共找到 {} 条结果\n", results.total),
    ];

    for (category, links) in &results.merged_by_type {
        if links.is_empty() {
            continue;
        }
        lines.push(format!(
            "\n📁 {} ({}个)",
            category.display_name(),
            links.len()
        ));
        for (index, link) in links.iter().take(ALL_RESULTS_PREVIEW).enumerate() {
            lines.push(String::new());
            push_link(&mut lines, index + 1, link);
            lines.pop();
        }
    }

    lines.push(format!("\n{FOOTER_RULE}"));
    lines.push("💡 提示: 长按链接可复制，密码可手动复制".to_owned());
    truncate_message(lines.join("\n"))
}

fn push_link(lines: &mut Vec<String>, index: usize, link: &ResourceLink) {
    let note = link
        .note
        .as_deref()
        .map(clean_note)
        .filter(|note| !note.is_empty())
        .unwrap_or_else(|| "无标题".to_owned());

    lines.push(format!("{index}. {}", escape_html(&note)));
    lines.push(format!("   🔗 {}", escape_html(&link.url)));
    if let Some(password) = link.password.as_deref().filter(|pw| !pw.is_empty()) {
        lines.push(format!("   🔑 密码: <code>{}</code>", escape_html(password)));
    }
    if let Some(source) = link.source.as_deref().filter(|src| !src.is_empty()) {
        lines.push(format!("   📌 来源: {}", escape_html(source)));
    }
    lines.push(String::new());
}

/// Strip control characters and collapse runs of whitespace.
fn clean_note(note: &str) -> String {
    note.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape the characters significant to Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn truncate_message(text: String) -> String {
    if text.len() <= MAX_MESSAGE_LEN {
        return text;
    }
    let mut cut = TRUNCATED_BODY_LEN;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{TRUNCATION_NOTICE}", &text[..cut])
}
