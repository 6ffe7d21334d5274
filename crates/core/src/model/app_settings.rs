use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_CODE_FONT_SIZE: u8 = 12;
pub const MAX_CODE_FONT_SIZE: u8 = 24;
const DEFAULT_CODE_FONT_SIZE: u8 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    /// Resolve `System` against the platform preference; `None` means light.
    #[must_use]
    pub fn resolve(self, system_prefers_dark: Option<bool>) -> Theme {
        match self {
            Theme::System if system_prefers_dark == Some(true) => Theme::Dark,
            Theme::System => Theme::Light,
            explicit => explicit,
        }
    }
}

/// User preferences persisted under the `app-settings` key.
///
/// Deserialization goes through [`AppSettingsDraft::validate`], so stored
/// documents with missing fields pick up defaults and out-of-range values
/// are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredSettings")]
pub struct AppSettings {
    theme: Theme,
    notifications: bool,
    code_editor_font_size: u8,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub code_editor_font_size: Option<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    theme: Option<Theme>,
    notifications: Option<bool>,
    code_editor_font_size: Option<u8>,
}

impl TryFrom<StoredSettings> for AppSettings {
    type Error = AppSettingsError;

    fn try_from(stored: StoredSettings) -> Result<Self, Self::Error> {
        AppSettingsDraft {
            theme: stored.theme,
            notifications: stored.notifications,
            code_editor_font_size: stored.code_editor_font_size,
        }
        .validate()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("code editor font size must be between 12 and 24, got {0}")]
    FontSizeOutOfRange(u8),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing settings so unset fields keep their values.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            theme: Some(settings.theme),
            notifications: Some(settings.notifications),
            code_editor_font_size: Some(settings.code_editor_font_size),
        }
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the font size is out of range.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let defaults = AppSettings::default();
        let size = self
            .code_editor_font_size
            .unwrap_or(defaults.code_editor_font_size);
        if !(MIN_CODE_FONT_SIZE..=MAX_CODE_FONT_SIZE).contains(&size) {
            return Err(AppSettingsError::FontSizeOutOfRange(size));
        }

        Ok(AppSettings {
            theme: self.theme.unwrap_or(defaults.theme),
            notifications: self.notifications.unwrap_or(defaults.notifications),
            code_editor_font_size: size,
        })
    }
}

impl AppSettings {
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn notifications(&self) -> bool {
        self.notifications
    }

    #[must_use]
    pub fn code_editor_font_size(&self) -> u8 {
        self.code_editor_font_size
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications = enabled;
    }

    /// One point larger, stopping at the maximum.
    pub fn increase_font_size(&mut self) {
        if self.code_editor_font_size < MAX_CODE_FONT_SIZE {
            self.code_editor_font_size += 1;
        }
    }

    /// One point smaller, stopping at the minimum.
    pub fn decrease_font_size(&mut self) {
        if self.code_editor_font_size > MIN_CODE_FONT_SIZE {
            self.code_editor_font_size -= 1;
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications: true,
            code_editor_font_size: DEFAULT_CODE_FONT_SIZE,
        }
    }
}
