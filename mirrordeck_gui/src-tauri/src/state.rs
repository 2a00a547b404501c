//! Application state management

use mirrordeck_core::session::SessionManager;
use mirrordeck_core::settings::{DebouncedSaver, Settings, SettingsStore, SAVE_DEBOUNCE};
use mirrordeck_core::toolchain::Toolchain;
use mirrordeck_core::tracker::DeviceTracker;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Global application state
pub struct AppState {
    /// Paths to the wrapped executables
    pub toolchain: Toolchain,
    /// The single mirror process (at most one at a time)
    pub manager: Mutex<SessionManager>,
    /// Device snapshot shared with the background poller
    pub tracker: Arc<std::sync::Mutex<DeviceTracker>>,
    /// Settings file on disk
    pub store: SettingsStore,
    /// Debounced settings writer, started on first save
    saver: Mutex<Option<DebouncedSaver>>,
}

impl AppState {
    pub fn new() -> mirrordeck_core::Result<Self> {
        Ok(Self {
            toolchain: Toolchain::from_env(),
            manager: Mutex::new(SessionManager::new()),
            tracker: Arc::new(std::sync::Mutex::new(DeviceTracker::new())),
            store: SettingsStore::default_location()?,
            saver: Mutex::new(None),
        })
    }

    /// State backed by an explicit settings file (used by tests)
    pub fn with_store(store: SettingsStore) -> Self {
        Self {
            toolchain: Toolchain::from_env(),
            manager: Mutex::new(SessionManager::new()),
            tracker: Arc::new(std::sync::Mutex::new(DeviceTracker::new())),
            store,
            saver: Mutex::new(None),
        }
    }

    /// Queue a settings snapshot through the debounced writer.
    ///
    /// The writer task is started lazily because it needs a running
    /// async runtime, which `new()` is called before.
    pub async fn submit_settings(&self, settings: Settings) {
        let mut slot = self.saver.lock().await;
        let saver = slot
            .get_or_insert_with(|| DebouncedSaver::spawn(self.store.clone(), SAVE_DEBOUNCE));
        saver.submit(settings).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_state_starts_idle() {
        let temp = TempDir::new().unwrap();
        let state = AppState::with_store(SettingsStore::new(temp.path().join("settings.json")));

        assert!(!state.manager.lock().await.is_running());
        assert!(state.tracker.lock().unwrap().devices().is_empty());
    }

    #[tokio::test]
    async fn test_submit_settings_persists_after_debounce() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::new(temp.path().join("settings.json"));
        let state = AppState::with_store(store.clone());

        let mut settings = Settings::new();
        settings.set("max-fps", 30u32);
        state.submit_settings(settings).await;

        tokio::time::sleep(SAVE_DEBOUNCE + Duration::from_millis(300)).await;
        assert_eq!(store.load().unwrap().number("max-fps"), Some(30.0));
    }
}
