/// Environment-driven runtime configuration.
pub mod config;

use std::sync::Arc;

use pansou_nav::{DeletionQueue, SearchCache};
use pansou_search::PansouClient;
use pansou_settings::SettingsStore;

pub use config::Config;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub config: Arc<Config>,
    pub client: Arc<PansouClient>,
    pub cache: Arc<SearchCache>,
    pub deletions: Arc<DeletionQueue>,
    pub settings: Arc<SettingsStore>,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        config: Arc<Config>,
        client: Arc<PansouClient>,
        cache: Arc<SearchCache>,
        deletions: Arc<DeletionQueue>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            config,
            client,
            cache,
            deletions,
            settings,
        }
    }
}
