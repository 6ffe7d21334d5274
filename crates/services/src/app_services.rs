use std::sync::Arc;

use learn_core::model::Catalog;
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over one storage backend.
///
/// Construction is the app-launch path: both persisted documents are loaded
/// and the daily streak is checked once.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: ProgressService,
    app_settings: Arc<AppSettingsService>,
    lessons: Arc<LessonService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// bundled catalog is inconsistent.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, Catalog::bundled()?, clock).await)
    }

    /// Build services over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bundled catalog is inconsistent.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Ok(Self::from_storage(Storage::in_memory(), Catalog::bundled()?, clock).await)
    }

    pub async fn from_storage(storage: Storage, catalog: Catalog, clock: Clock) -> Self {
        let catalog = Arc::new(catalog);
        let progress = ProgressService::load(clock, Arc::clone(&storage.kv)).await;
        let app_settings = Arc::new(AppSettingsService::load(Arc::clone(&storage.kv)).await);
        let lessons = Arc::new(LessonService::new(Arc::clone(&catalog), progress.clone()));

        progress.update_streak();
        let snapshot = progress.snapshot();
        info!(
            streak_days = snapshot.streak_days(),
            xp = snapshot.xp(),
            lessons = catalog.lessons().len(),
            "services ready"
        );

        Self {
            catalog,
            progress,
            app_settings,
            lessons,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> ProgressService {
        self.progress.clone()
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    /// Wait until all queued writes have been attempted.
    pub async fn flush(&self) {
        self.progress.flush().await;
        self.app_settings.flush().await;
    }
}
