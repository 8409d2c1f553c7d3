//! One JSON file per user, fronted by an in-memory cache.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{error, info};

use crate::settings::UserSettings;

/// Settings persistence for all users of the bot.
///
/// Reads go through the cache; writes update the cache and the file.
/// A missing or corrupt file falls back to defaults rather than failing
/// the interaction.
pub struct SettingsStore {
    data_dir: PathBuf,
    cache: Mutex<HashMap<u64, UserSettings>>,
}

impl SettingsStore {
    /// Open (and create if needed) the settings directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> io::Result<SettingsStore> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(SettingsStore {
            data_dir,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn settings_path(&self, user_id: u64) -> PathBuf {
        self.data_dir.join(format!("user_{user_id}.json"))
    }

    /// Current settings for a user, creating defaults on first contact.
    pub fn get(&self, user_id: u64) -> UserSettings {
        if let Some(settings) = self.lock().get(&user_id) {
            return settings.clone();
        }

        let settings = load_file(&self.settings_path(user_id), user_id)
            .unwrap_or_else(|| UserSettings::new(user_id));
        self.lock().insert(user_id, settings.clone());
        settings
    }

    /// Persist settings, replacing any previous value for the user.
    pub fn save(&self, settings: &UserSettings) {
        let path = self.settings_path(settings.user_id);
        match serde_json::to_vec_pretty(settings) {
            Ok(body) => {
                if let Err(source) = fs::write(&path, body) {
                    error!(user_id = settings.user_id, %source, "settings write failed");
                } else {
                    info!(user_id = settings.user_id, "settings saved");
                }
            }
            Err(source) => error!(user_id = settings.user_id, %source, "settings encode failed"),
        }
        self.lock().insert(settings.user_id, settings.clone());
    }

    /// Apply a mutation to the user's settings and persist the result.
    pub fn update(&self, user_id: u64, apply: impl FnOnce(&mut UserSettings)) -> UserSettings {
        let mut settings = self.get(user_id);
        apply(&mut settings);
        self.save(&settings);
        settings
    }

    /// Replace the user's settings with defaults.
    pub fn reset(&self, user_id: u64) -> UserSettings {
        let settings = UserSettings::new(user_id);
        self.save(&settings);
        settings
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, UserSettings>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load_file(path: &Path, user_id: u64) -> Option<UserSettings> {
    let body = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&body) {
        Ok(settings) => Some(settings),
        Err(source) => {
            error!(user_id, %source, "settings file corrupt, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_get_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path()).unwrap();
        let settings = store.get(100);
        assert_eq!(settings, UserSettings::new(100));
    }

    #[test]
    fn save_round_trips_through_a_fresh_store() {
        let dir = TempDir::new().unwrap();
        {
            let store = SettingsStore::new(dir.path()).unwrap();
            store.update(7, |settings| {
                settings.result_limit = 30;
                settings.filter_exclude.push("预告".to_owned());
            });
        }
        let store = SettingsStore::new(dir.path()).unwrap();
        let settings = store.get(7);
        assert_eq!(settings.result_limit, 30);
        assert_eq!(settings.filter_exclude, vec!["预告".to_owned()]);
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path()).unwrap();
        store.update(7, |settings| settings.result_limit = 49);
        store.reset(7);
        assert_eq!(store.get(7), UserSettings::new(7));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("user_9.json"), b"{not json").unwrap();
        assert_eq!(store.get(9), UserSettings::new(9));
    }
}
