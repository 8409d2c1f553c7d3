//! Provider result data model: category tags and grouped resource links.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed vocabulary of netdisk category tags returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudType {
    Baidu,
    Aliyun,
    Quark,
    Tianyi,
    Uc,
    Mobile,
    Pan115,
    PikPak,
    Xunlei,
    Pan123,
    Magnet,
    Ed2k,
    Others,
}

impl CloudType {
    /// Every known category, in the provider's canonical order.
    pub const ALL: [CloudType; 13] = [
        CloudType::Baidu,
        CloudType::Aliyun,
        CloudType::Quark,
        CloudType::Tianyi,
        CloudType::Uc,
        CloudType::Mobile,
        CloudType::Pan115,
        CloudType::PikPak,
        CloudType::Xunlei,
        CloudType::Pan123,
        CloudType::Magnet,
        CloudType::Ed2k,
        CloudType::Others,
    ];

    /// Wire tag used by the provider API and inside navigation tokens.
    pub fn tag(self) -> &'static str {
        match self {
            CloudType::Baidu => "baidu",
            CloudType::Aliyun => "aliyun",
            CloudType::Quark => "quark",
            CloudType::Tianyi => "tianyi",
            CloudType::Uc => "uc",
            CloudType::Mobile => "mobile",
            CloudType::Pan115 => "115",
            CloudType::PikPak => "pikpak",
            CloudType::Xunlei => "xunlei",
            CloudType::Pan123 => "123",
            CloudType::Magnet => "magnet",
            CloudType::Ed2k => "ed2k",
            CloudType::Others => "others",
        }
    }

    /// Parse a wire tag. Unknown tags are rejected, not defaulted.
    pub fn from_tag(tag: &str) -> Option<CloudType> {
        CloudType::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    /// Human-readable category name.
    pub fn display_name(self) -> &'static str {
        match self {
            CloudType::Baidu => "百度网盘",
            CloudType::Aliyun => "阿里云盘",
            CloudType::Quark => "夸克网盘",
            CloudType::Tianyi => "天翼云盘",
            CloudType::Uc => "UC网盘",
            CloudType::Mobile => "移动云盘",
            CloudType::Pan115 => "115网盘",
            CloudType::PikPak => "PikPak",
            CloudType::Xunlei => "迅雷网盘",
            CloudType::Pan123 => "123网盘",
            CloudType::Magnet => "磁力链接",
            CloudType::Ed2k => "电驴链接",
            CloudType::Others => "其他",
        }
    }

    /// Emoji shown on category buttons and page headers.
    pub fn icon(self) -> &'static str {
        match self {
            CloudType::Baidu => "🔴",
            CloudType::Aliyun => "🔵",
            CloudType::Quark => "🟠",
            CloudType::Tianyi => "🟡",
            CloudType::Uc => "🟣",
            CloudType::Mobile => "🟢",
            CloudType::Pan115 => "⚫",
            CloudType::PikPak => "🩷",
            CloudType::Xunlei => "🔷",
            CloudType::Pan123 => "🔶",
            CloudType::Magnet => "🧲",
            CloudType::Ed2k => "📎",
            CloudType::Others => "📁",
        }
    }
}

impl fmt::Display for CloudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One shared resource as returned by the provider.
///
/// Only `url` is guaranteed; the other fields are display hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub url: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Search results grouped by category, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchData {
    pub merged_by_type: IndexMap<CloudType, Vec<ResourceLink>>,
    pub total: usize,
}

impl SearchData {
    /// Build from the provider's string-keyed grouping.
    ///
    /// Unknown tags are folded into [`CloudType::Others`] so a provider
    /// rollout of a new category never drops results.
    pub fn from_raw(raw: IndexMap<String, Vec<ResourceLink>>, total: usize) -> SearchData {
        let mut merged_by_type: IndexMap<CloudType, Vec<ResourceLink>> = IndexMap::new();
        for (tag, links) in raw {
            let ty = CloudType::from_tag(&tag).unwrap_or(CloudType::Others);
            merged_by_type.entry(ty).or_default().extend(links);
        }
        SearchData {
            merged_by_type,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0 || self.merged_by_type.is_empty()
    }

    /// Links for one category, if present.
    pub fn category(&self, ty: CloudType) -> Option<&[ResourceLink]> {
        self.merged_by_type.get(&ty).map(Vec::as_slice)
    }

    /// Recompute `total` from the per-category lists.
    pub fn recount(&mut self) {
        self.total = self.merged_by_type.values().map(Vec::len).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str) -> ResourceLink {
        ResourceLink {
            url: url.to_owned(),
            password: None,
            note: None,
            source: None,
        }
    }

    #[test]
    fn tag_round_trip_covers_every_category() {
        for ty in CloudType::ALL {
            assert_eq!(CloudType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(CloudType::from_tag("gopher"), None);
    }

    #[test]
    fn unknown_tags_fold_into_others() {
        let mut raw = IndexMap::new();
        raw.insert("baidu".to_owned(), vec![link("a")]);
        raw.insert("warp-drive".to_owned(), vec![link("b"), link("c")]);
        raw.insert("others".to_owned(), vec![link("d")]);

        let data = SearchData::from_raw(raw, 4);
        assert_eq!(data.category(CloudType::Baidu).unwrap().len(), 1);
        assert_eq!(data.category(CloudType::Others).unwrap().len(), 3);
    }

    #[test]
    fn recount_sums_category_lists() {
        let mut raw = IndexMap::new();
        raw.insert("magnet".to_owned(), vec![link("a"), link("b")]);
        let mut data = SearchData::from_raw(raw, 99);
        data.recount();
        assert_eq!(data.total, 2);
    }

    #[test]
    fn provider_order_is_preserved() {
        let mut raw = IndexMap::new();
        raw.insert("magnet".to_owned(), vec![link("a")]);
        raw.insert("baidu".to_owned(), vec![link("b")]);
        let data = SearchData::from_raw(raw, 2);
        let order: Vec<CloudType> = data.merged_by_type.keys().copied().collect();
        assert_eq!(order, vec![CloudType::Magnet, CloudType::Baidu]);
    }
}
