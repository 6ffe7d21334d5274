use std::sync::Arc;

use learn_core::model::{Catalog, ContentBlock, LastAccessed, Lesson, LessonId, Module, ModuleId};
use learn_core::parser;
use learn_core::stats::CompletionStats;
use tracing::debug;

use crate::error::LessonServiceError;
use crate::progress_service::ProgressService;

/// XP awarded the first time a lesson is completed.
pub const LESSON_XP: u32 = 10;

/// Everything a lesson screen needs.
#[derive(Debug, Clone)]
pub struct LessonView {
    pub lesson: Lesson,
    pub module_title: Option<String>,
    pub blocks: Vec<ContentBlock>,
    pub is_completed: bool,
    pub is_bookmarked: bool,
    pub previous: Option<LessonId>,
    pub next: Option<LessonId>,
}

#[derive(Debug, Clone)]
pub struct ModuleOverview {
    pub module: Module,
    pub stats: CompletionStats,
}

/// Lesson-level flows over the catalog and progress.
#[derive(Clone)]
pub struct LessonService {
    catalog: Arc<Catalog>,
    progress: ProgressService,
}

impl LessonService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, progress: ProgressService) -> Self {
        Self { catalog, progress }
    }

    /// Parse a lesson for display and record it as last accessed.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::UnknownLesson` if the catalog has no such lesson.
    pub fn open_lesson(&self, lesson_id: &LessonId) -> Result<LessonView, LessonServiceError> {
        let lesson = self.lesson(lesson_id)?;

        self.progress.update_last_accessed(LastAccessed::new(
            Some(lesson.module_id.clone()),
            Some(lesson.id.clone()),
        ));

        let blocks = parser::parse(&lesson.content);
        debug!(lesson = %lesson.id, blocks = blocks.len(), "lesson opened");

        let (previous, next) = self.catalog.adjacent_lessons(lesson_id);
        Ok(LessonView {
            module_title: self
                .catalog
                .module(&lesson.module_id)
                .map(|module| module.title.clone()),
            blocks,
            is_completed: self.progress.is_lesson_completed(lesson_id),
            is_bookmarked: self.progress.is_bookmarked(lesson_id),
            previous: previous.map(|l| l.id.clone()),
            next: next.map(|l| l.id.clone()),
            lesson: lesson.clone(),
        })
    }

    /// Mark the lesson complete, awarding [`LESSON_XP`] the first time only.
    ///
    /// Returns whether this call completed the lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::UnknownLesson` if the catalog has no such lesson.
    pub fn complete_lesson(&self, lesson_id: &LessonId) -> Result<bool, LessonServiceError> {
        let lesson = self.lesson(lesson_id)?;
        Ok(self.progress.complete_lesson_once(lesson.id.clone(), LESSON_XP))
    }

    /// Toggle the bookmark and return whether the lesson is now bookmarked.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::UnknownLesson` if the catalog has no such lesson.
    pub fn toggle_bookmark(&self, lesson_id: &LessonId) -> Result<bool, LessonServiceError> {
        let lesson = self.lesson(lesson_id)?;
        self.progress.toggle_bookmark(lesson.id.clone());
        Ok(self.progress.is_bookmarked(lesson_id))
    }

    /// The lesson "continue learning" should open.
    ///
    /// On first use this records the first module's first lesson as last accessed.
    #[must_use]
    pub fn resume(&self) -> Option<Lesson> {
        let last = self.progress.snapshot().last_accessed().clone();
        if last.module_id.is_none() {
            if let Some(first) = self.catalog.modules().first() {
                self.progress.update_last_accessed(LastAccessed::new(
                    Some(first.id.clone()),
                    first.lessons.first().cloned(),
                ));
            }
        }

        let last = self.progress.snapshot().last_accessed().clone();
        self.catalog.resume_target(&last).cloned()
    }

    /// Modules in display order with their completion figures.
    #[must_use]
    pub fn modules_overview(&self) -> Vec<ModuleOverview> {
        self.catalog
            .modules()
            .iter()
            .map(|module| ModuleOverview {
                stats: self.progress.module_completion(module),
                module: module.clone(),
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::UnknownModule` if the catalog has no such module.
    pub fn module_overview(&self, module_id: &ModuleId) -> Result<ModuleOverview, LessonServiceError> {
        let module = self
            .catalog
            .module(module_id)
            .ok_or_else(|| LessonServiceError::UnknownModule(module_id.clone()))?;
        Ok(ModuleOverview {
            stats: self.progress.module_completion(module),
            module: module.clone(),
        })
    }

    #[must_use]
    pub fn overall_completion(&self) -> CompletionStats {
        self.progress.overall_completion(&self.catalog)
    }

    fn lesson(&self, lesson_id: &LessonId) -> Result<&Lesson, LessonServiceError> {
        self.catalog
            .lesson(lesson_id)
            .ok_or_else(|| LessonServiceError::UnknownLesson(lesson_id.clone()))
    }
}
