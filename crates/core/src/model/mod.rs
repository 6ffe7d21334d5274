mod app_settings;
pub mod catalog;
pub mod content;
pub mod exercise;
mod ids;
mod progress;

pub use content::ContentBlock;
pub use ids::{ChallengeId, LessonId, ModuleId};

pub use app_settings::{
    AppSettings, AppSettingsDraft, AppSettingsError, MAX_CODE_FONT_SIZE, MIN_CODE_FONT_SIZE,
    Theme,
};
pub use catalog::{Catalog, CatalogError, Challenge, Difficulty, Lesson, Module};
pub use exercise::{Advance, Exercise, ExerciseSession, Verdict};
pub use progress::{LastAccessed, ProgressEvent, UserProgress};
