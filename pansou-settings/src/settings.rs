//! Per-user search preferences.

use pansou_search::{CloudType, SearchOptions};
use serde::{Deserialize, Serialize};

/// Source types accepted by the provider.
pub const SOURCE_TYPES: [&str; 3] = ["all", "tg", "plugin"];

/// One user's persisted search preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: u64,
    #[serde(default = "default_cloud_types")]
    pub cloud_types: Vec<String>,
    #[serde(default)]
    pub filter_include: Vec<String>,
    #[serde(default)]
    pub filter_exclude: Vec<String>,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn default_cloud_types() -> Vec<String> {
    CloudType::ALL
        .into_iter()
        .filter(|ty| *ty != CloudType::Others)
        .map(|ty| ty.tag().to_owned())
        .collect()
}

fn default_result_limit() -> usize {
    10
}

fn default_source_type() -> String {
    "all".to_owned()
}

impl UserSettings {
    pub fn new(user_id: u64) -> UserSettings {
        UserSettings {
            user_id,
            cloud_types: default_cloud_types(),
            filter_include: Vec::new(),
            filter_exclude: Vec::new(),
            result_limit: default_result_limit(),
            source_type: default_source_type(),
            channels: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Provider request options derived from these preferences.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            channels: self.channels.clone(),
            plugins: self.plugins.clone(),
            cloud_types: self.cloud_types.clone(),
            source_type: self.source_type.clone(),
            include: self.filter_include.clone(),
            exclude: self.filter_exclude.clone(),
        }
    }

    /// HTML summary shown by `/settings` and `/status`.
    pub fn format_display(&self) -> String {
        let mut lines = vec![
            "⚙️ <b>当前设置</b>\n".to_owned(),
            format!("📊 结果数量: <code>{}</code>", self.result_limit),
            format!("🔍 搜索来源: <code>{}</code>", self.source_type),
        ];

        if self.cloud_types.is_empty() {
            lines.push("📁 网盘类型: 全部".to_owned());
        } else {
            let mut names: Vec<String> = self
                .cloud_types
                .iter()
                .take(5)
                .map(|tag| {
                    CloudType::from_tag(tag)
                        .map(|ty| ty.display_name().to_owned())
                        .unwrap_or_else(|| tag.clone())
                })
                .collect();
            if self.cloud_types.len() > 5 {
                names.push(format!("等{}个", self.cloud_types.len()));
            }
            lines.push(format!("📁 网盘类型: {}", names.join(", ")));
        }

        if !self.filter_include.is_empty() {
            lines.push(format!("✅ 包含过滤: {}", self.filter_include.join(", ")));
        }
        if !self.filter_exclude.is_empty() {
            lines.push(format!("❌ 排除过滤: {}", self.filter_exclude.join(", ")));
        }
        if !self.channels.is_empty() {
            lines.push(format!("📡 指定频道: {}个", self.channels.len()));
        }
        if !self.plugins.is_empty() {
            lines.push(format!("🔌 指定插件: {}个", self.plugins.len()));
        }

        lines.join("\n")
    }
}
