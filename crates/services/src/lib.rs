#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod error;
pub mod lesson_service;
pub mod persisted;
pub mod progress_service;

pub use learn_core::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use error::{AppServicesError, AppSettingsServiceError, LessonServiceError};
pub use lesson_service::{LESSON_XP, LessonService, LessonView, ModuleOverview};
pub use persisted::PersistedState;
pub use progress_service::ProgressService;
