//! Shared error types for the services crate.
//!
//! Persistence failures never show up here: loading falls back to defaults
//! and writes are logged by the background writer.

use thiserror::Error;

use learn_core::model::{AppSettingsError, CatalogError, LessonId, ModuleId};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("lesson not found: {0}")]
    UnknownLesson(LessonId),
    #[error("module not found: {0}")]
    UnknownModule(ModuleId),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
