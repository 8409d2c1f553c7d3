//! Inline keyboard descriptors, converted to transport markup at the
//! edge.

use pansou_search::{CloudType, SearchData};

use crate::cache::SessionKey;
use crate::pagination::token::{NavIntent, encode};

/// One button: a label plus an encoded navigation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub label: String,
    pub token: String,
}

impl NavButton {
    fn new(label: impl Into<String>, key: SessionKey, intent: NavIntent) -> NavButton {
        NavButton {
            label: label.into(),
            token: encode(key, intent),
        }
    }
}

/// Rows of buttons attached to a rendered message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<NavButton>>,
}

/// Category picker under the overview: one button per non-empty
/// category sorted by result count descending, two per row, plus the
/// refresh / show-all controls.
pub fn category_keyboard(key: SessionKey, results: &SearchData) -> Keyboard {
    let mut counted: Vec<(CloudType, usize)> = results
        .merged_by_type
        .iter()
        .filter(|(_, links)| !links.is_empty())
        .map(|(ty, links)| (*ty, links.len()))
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut rows: Vec<Vec<NavButton>> = Vec::new();
    let mut row: Vec<NavButton> = Vec::new();
    for (ty, count) in counted {
        row.push(NavButton::new(
            format!("{} {} ({count})", ty.icon(), ty.display_name()),
            key,
            NavIntent::CategoryPage {
                category: ty,
                page: 1,
            },
        ));
        if row.len() == 2 {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }

    rows.push(vec![refresh_button(key), all_results_button(key)]);
    Keyboard { rows }
}

/// Prev / position / next controls plus back / refresh for one
/// category page. The center button is a no-op position marker.
pub fn pagination_keyboard(
    key: SessionKey,
    category: CloudType,
    page: usize,
    total_pages: usize,
) -> Keyboard {
    let mut nav_row: Vec<NavButton> = Vec::new();
    if page > 1 {
        nav_row.push(NavButton::new(
            "⬅️ 上一页",
            key,
            NavIntent::CategoryPage {
                category,
                page: page - 1,
            },
        ));
    }
    nav_row.push(NavButton::new(
        format!("{page}/{total_pages}"),
        key,
        NavIntent::Noop,
    ));
    if page < total_pages {
        nav_row.push(NavButton::new(
            "下一页 ➡️",
            key,
            NavIntent::CategoryPage {
                category,
                page: page + 1,
            },
        ));
    }

    Keyboard {
        rows: vec![nav_row, vec![back_button(key), refresh_button(key)]],
    }
}

/// Back / refresh controls for the all-results view.
pub fn back_refresh_keyboard(key: SessionKey) -> Keyboard {
    Keyboard {
        rows: vec![vec![back_button(key), refresh_button(key)]],
    }
}

fn refresh_button(key: SessionKey) -> NavButton {
    NavButton::new("🔄 重新搜索", key, NavIntent::Refresh)
}

fn back_button(key: SessionKey) -> NavButton {
    NavButton::new("🔙 返回分类", key, NavIntent::Back)
}

fn all_results_button(key: SessionKey) -> NavButton {
    NavButton::new("📊 显示全部", key, NavIntent::AllResults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pansou_search::ResourceLink;

    fn link(url: &str) -> ResourceLink {
        ResourceLink {
            url: url.to_owned(),
            password: None,
            note: None,
            source: None,
        }
    }

    fn results() -> SearchData {
        let mut raw = IndexMap::new();
        raw.insert("magnet".to_owned(), vec![link("a"), link("b"), link("c")]);
        raw.insert("baidu".to_owned(), (0..12).map(|i| link(&format!("b{i}"))).collect());
        raw.insert("quark".to_owned(), Vec::new());
        SearchData::from_raw(raw, 15)
    }

    const KEY: SessionKey = SessionKey {
        chat_id: 10,
        user_id: 20,
    };

    #[test]
    fn category_buttons_sorted_by_count_and_paired() {
        let keyboard = category_keyboard(KEY, &results());
        // One row with the two non-empty categories, one control row.
        assert_eq!(keyboard.rows.len(), 2);
        assert!(keyboard.rows[0][0].label.contains("百度网盘 (12)"));
        assert!(keyboard.rows[0][1].label.contains("磁力链接 (3)"));
        assert!(keyboard.rows[0][0].token.starts_with("type:10:20:baidu:1"));
    }

    #[test]
    fn empty_categories_get_no_button() {
        let keyboard = category_keyboard(KEY, &results());
        for row in &keyboard.rows {
            for button in row {
                assert!(!button.label.contains("夸克"));
            }
        }
    }

    #[test]
    fn first_page_has_no_prev_and_last_has_no_next() {
        let first = pagination_keyboard(KEY, CloudType::Baidu, 1, 3);
        assert_eq!(first.rows[0].len(), 2);
        assert_eq!(first.rows[0][0].label, "1/3");

        let last = pagination_keyboard(KEY, CloudType::Baidu, 3, 3);
        assert_eq!(last.rows[0].len(), 2);
        assert!(last.rows[0][0].label.contains("上一页"));

        let middle = pagination_keyboard(KEY, CloudType::Baidu, 2, 3);
        assert_eq!(middle.rows[0].len(), 3);
    }

    #[test]
    fn position_marker_is_a_noop_token() {
        let keyboard = pagination_keyboard(KEY, CloudType::Baidu, 2, 3);
        let marker = &keyboard.rows[0][1];
        assert_eq!(marker.label, "2/3");
        assert!(marker.token.starts_with("noop:"));
    }
}
