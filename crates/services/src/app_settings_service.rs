use std::sync::Arc;

use learn_core::model::{AppSettings, AppSettingsDraft, Theme};
use storage::repository::{KeyValueStore, StoreKey};

use crate::error::AppSettingsServiceError;
use crate::persisted::PersistedState;

#[derive(Clone)]
pub struct AppSettingsService {
    state: Arc<PersistedState<AppSettings>>,
}

impl AppSettingsService {
    /// Load persisted settings (or defaults if missing or unreadable).
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let state = PersistedState::load(store, StoreKey::AppSettings).await;
        Self {
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn settings(&self) -> AppSettings {
        self.state.snapshot()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.update(|settings| settings.set_theme(theme));
    }

    pub fn set_notifications(&self, enabled: bool) {
        self.state.update(|settings| settings.set_notifications(enabled));
    }

    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if the size is outside the allowed range.
    pub fn set_code_editor_font_size(&self, size: u8) -> Result<AppSettings, AppSettingsServiceError> {
        let current = self.settings();
        self.save(AppSettingsDraft {
            code_editor_font_size: Some(size),
            ..AppSettingsDraft::from_settings(&current)
        })
    }

    pub fn increase_font_size(&self) -> u8 {
        self.state.update(|settings| {
            settings.increase_font_size();
            settings.code_editor_font_size()
        })
    }

    pub fn decrease_font_size(&self) -> u8 {
        self.state.update(|settings| {
            settings.decrease_font_size();
            settings.code_editor_font_size()
        })
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails; nothing is stored then.
    pub fn save(&self, draft: AppSettingsDraft) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.state.update(|current| *current = settings.clone());
        Ok(settings)
    }

    pub async fn flush(&self) {
        self.state.flush().await;
    }
}
