//! HTTP client for the pansou search service.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, warn};

use crate::error::SearchError;
use crate::types::{CloudType, ResourceLink, SearchData};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_PAUSE: Duration = Duration::from_secs(1);
const RETRIES: usize = 2;

/// Per-search request options derived from user settings.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub channels: Vec<String>,
    pub plugins: Vec<String>,
    pub cloud_types: Vec<String>,
    /// `all`, `tg`, or `plugin`; empty means `all`.
    pub source_type: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Serialize)]
struct SearchPayload<'a> {
    kw: &'a str,
    res: &'static str,
    src: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    channels: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    plugins: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    cloud_types: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterPayload<'a>>,
}

#[derive(Serialize)]
struct FilterPayload<'a> {
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    include: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    exclude: &'a [String],
}

#[derive(Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RawData>,
}

#[derive(Deserialize, Default)]
struct RawData {
    #[serde(default)]
    merged_by_type: IndexMap<String, Vec<ResourceLink>>,
    #[serde(default)]
    total: usize,
}

/// Client for the pansou `/api/search` and `/api/health` endpoints.
pub struct PansouClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PansouClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        search_timeout: Duration,
    ) -> Result<PansouClient, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(search_timeout)
            .build()?;
        Ok(PansouClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        })
    }

    /// Search the provider, retrying transient network failures.
    pub async fn search(
        &self,
        keyword: &str,
        options: &SearchOptions,
    ) -> Result<SearchData, SearchError> {
        let mut attempt = 0;
        loop {
            match self.search_once(keyword, options).await {
                Ok(data) => return Ok(data),
                Err(SearchError::Network(source)) if attempt < RETRIES => {
                    attempt += 1;
                    warn!(keyword, attempt, %source, "search retry");
                    sleep(RETRY_PAUSE).await;
                }
                Err(SearchError::Timeout) if attempt < RETRIES => {
                    attempt += 1;
                    warn!(keyword, attempt, "search retry after timeout");
                    sleep(RETRY_PAUSE).await;
                }
                Err(source) => {
                    error!(keyword, %source, "search failed");
                    return Err(source);
                }
            }
        }
    }

    async fn search_once(
        &self,
        keyword: &str,
        options: &SearchOptions,
    ) -> Result<SearchData, SearchError> {
        let source_type = if options.source_type.is_empty() {
            "all"
        } else {
            options.source_type.as_str()
        };
        let filter = (!options.include.is_empty() || !options.exclude.is_empty()).then(|| {
            FilterPayload {
                include: &options.include,
                exclude: &options.exclude,
            }
        });
        let payload = SearchPayload {
            kw: keyword,
            res: "merge",
            src: source_type,
            channels: &options.channels,
            plugins: &options.plugins,
            cloud_types: &options.cloud_types,
            filter,
        };

        let mut request = self
            .http
            .post(format!("{}/api/search", self.base_url))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let envelope: Envelope = response.json().await.map_err(classify)?;
        if envelope.code != 0 {
            let message = if envelope.message.is_empty() {
                "搜索失败".to_owned()
            } else {
                envelope.message
            };
            return Err(SearchError::Api(message));
        }

        let raw = envelope.data.unwrap_or_default();
        let mut data = SearchData::from_raw(raw.merged_by_type, raw.total);

        // Second-pass filter: the provider's own filter is advisory.
        if !options.include.is_empty() || !options.exclude.is_empty() {
            data.merged_by_type = apply_filter(
                std::mem::take(&mut data.merged_by_type),
                &options.include,
                &options.exclude,
            );
            data.recount();
        }
        Ok(data)
    }

    /// Whether the provider answers its health endpoint.
    pub async fn health_check(&self) -> bool {
        let mut request = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .timeout(HEALTH_TIMEOUT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

fn classify(source: reqwest::Error) -> SearchError {
    if source.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Network(source)
    }
}

/// Keep only links whose note/url matches every configured filter rule.
///
/// Categories left empty after filtering are dropped entirely; an empty
/// category is never rendered as a page.
fn apply_filter(
    merged_by_type: IndexMap<CloudType, Vec<ResourceLink>>,
    include: &[String],
    exclude: &[String],
) -> IndexMap<CloudType, Vec<ResourceLink>> {
    if include.is_empty() && exclude.is_empty() {
        return merged_by_type;
    }

    let mut filtered: IndexMap<CloudType, Vec<ResourceLink>> = IndexMap::new();
    for (ty, links) in merged_by_type {
        let kept: Vec<ResourceLink> = links
            .into_iter()
            .filter(|link| {
                let haystack = format!(
                    "{} {}",
                    link.note.as_deref().unwrap_or_default(),
                    link.url
                )
                .to_lowercase();
                if exclude.iter().any(|word| haystack.contains(&word.to_lowercase())) {
                    return false;
                }
                include.is_empty()
                    || include.iter().any(|word| haystack.contains(&word.to_lowercase()))
            })
            .collect();
        if !kept.is_empty() {
            filtered.insert(ty, kept);
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, note: &str) -> ResourceLink {
        ResourceLink {
            url: url.to_owned(),
            password: None,
            note: Some(note.to_owned()),
            source: None,
        }
    }

    fn grouped(links: Vec<ResourceLink>) -> IndexMap<CloudType, Vec<ResourceLink>> {
        let mut map = IndexMap::new();
        map.insert(CloudType::Baidu, links);
        map
    }

    #[test]
    fn exclude_filter_drops_matching_links() {
        let map = grouped(vec![
            link("https://a", "复仇者联盟 1080P"),
            link("https://b", "复仇者联盟 预告"),
        ]);
        let out = apply_filter(map, &[], &["预告".to_owned()]);
        assert_eq!(out[&CloudType::Baidu].len(), 1);
        assert_eq!(out[&CloudType::Baidu][0].url, "https://a");
    }

    #[test]
    fn include_filter_keeps_only_matches() {
        let map = grouped(vec![
            link("https://a", "1080P 蓝光"),
            link("https://b", "720P"),
        ]);
        let out = apply_filter(map, &["1080p".to_owned()], &[]);
        assert_eq!(out[&CloudType::Baidu].len(), 1);
    }

    #[test]
    fn fully_filtered_category_is_dropped() {
        let map = grouped(vec![link("https://a", "预告")]);
        let out = apply_filter(map, &[], &["预告".to_owned()]);
        assert!(out.is_empty());
    }

    #[test]
    fn envelope_with_unknown_category_still_parses() {
        let body = r#"{
            "code": 0,
            "message": "success",
            "data": {
                "total": 2,
                "merged_by_type": {
                    "baidu": [{"url": "https://pan.baidu.com/x", "password": "abcd"}],
                    "newdisk": [{"url": "https://new.example/y"}]
                }
            }
        }"#;
        let envelope: Envelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.code, 0);
        let raw = envelope.data.unwrap();
        let data = SearchData::from_raw(raw.merged_by_type, raw.total);
        assert_eq!(data.total, 2);
        assert!(data.category(CloudType::Others).is_some());
    }

    #[test]
    fn error_envelope_carries_message() {
        let body = r#"{"code": 1, "message": "rate limited"}"#;
        let envelope: Envelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.code, 1);
        assert_eq!(envelope.message, "rate limited");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn payload_omits_empty_collections() {
        let payload = SearchPayload {
            kw: "钢铁侠",
            res: "merge",
            src: "all",
            channels: &[],
            plugins: &[],
            cloud_types: &[],
            filter: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kw": "钢铁侠", "res": "merge", "src": "all"})
        );
    }
}
