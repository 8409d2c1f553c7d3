//! Environment-driven runtime configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result, ensure};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub pansou_api_url: String,
    pub pansou_api_token: Option<String>,
    pub default_result_limit: usize,
    pub max_result_limit: usize,
    pub search_timeout: Duration,
    pub auto_delete_delay: Duration,
    pub page_size: usize,
    pub sweep_interval: Duration,
    pub admin_ids: Vec<u64>,
    pub default_channels: Vec<String>,
    pub default_plugins: Vec<String>,
    pub data_dir: PathBuf,
}

impl Config {
    /// Read every setting from the environment, applying defaults.
    pub fn from_env() -> Result<Config> {
        let bot_token =
            env::var("TG_BOT_TOKEN").context("TG_BOT_TOKEN environment variable is required")?;
        ensure!(!bot_token.trim().is_empty(), "TG_BOT_TOKEN must not be empty");

        let config = Config {
            bot_token,
            pansou_api_url: env::var("PANSOU_API_URL")
                .unwrap_or_else(|_| "http://localhost:8888".to_owned()),
            pansou_api_token: env::var("PANSOU_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            default_result_limit: parse_var("DEFAULT_RESULT_LIMIT", 10)?,
            max_result_limit: parse_var("MAX_RESULT_LIMIT", 20)?,
            search_timeout: Duration::from_secs(parse_var("SEARCH_TIMEOUT", 30)?),
            auto_delete_delay: Duration::from_secs(parse_var("AUTO_DELETE_DELAY", 180)?),
            page_size: parse_var("PAGE_SIZE", 5)?,
            sweep_interval: Duration::from_secs(parse_var("SWEEP_INTERVAL", 5)?),
            admin_ids: parse_id_list(env::var("ADMIN_IDS").ok().as_deref())
                .context("ADMIN_IDS must be a comma-separated list of numeric user ids")?,
            default_channels: parse_str_list(env::var("DEFAULT_CHANNELS").ok().as_deref()),
            default_plugins: parse_str_list(env::var("DEFAULT_PLUGINS").ok().as_deref()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
        };

        ensure!(config.page_size > 0, "PAGE_SIZE must be at least 1");
        ensure!(
            config.sweep_interval > Duration::ZERO,
            "SWEEP_INTERVAL must be at least 1 second"
        );
        Ok(config)
    }

    /// An empty admin list grants admin commands to everyone.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_id_list(raw: Option<&str>) -> Result<Vec<u64>> {
    parse_str_list(raw)
        .into_iter()
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("invalid id {part:?}"))
        })
        .collect()
}

fn parse_str_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
