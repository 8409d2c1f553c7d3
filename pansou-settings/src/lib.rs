/// Per-user preference model and display formatting.
pub mod settings;
/// JSON-file-backed settings persistence with an in-memory cache.
pub mod store;

pub use settings::UserSettings;
pub use store::SettingsStore;
