//! Completion figures derived from progress and the catalog. Nothing here is
//! stored; callers recompute on every render.

use crate::model::{Catalog, Module, UserProgress};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// 0.0 ..= 100.0, or more if progress records lessons the catalog lacks.
    pub percentage: f64,
}

impl CompletionStats {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }

    #[must_use]
    pub fn rounded_percentage(&self) -> u32 {
        // Clamped to u32 range before the cast.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = self.percentage.round().clamp(0.0, f64::from(u32::MAX)) as u32;
        rounded
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// `completed / total * 100`, with an empty total yielding 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Completion across the whole catalog.
///
/// The numerator counts every lesson marked complete, as recorded.
#[must_use]
pub fn overall_completion(progress: &UserProgress, catalog: &Catalog) -> CompletionStats {
    CompletionStats::new(progress.completed_lesson_count(), catalog.lessons().len())
}

/// Completion restricted to one module's lesson list.
#[must_use]
pub fn module_completion(progress: &UserProgress, module: &Module) -> CompletionStats {
    let completed = module
        .lessons
        .iter()
        .filter(|id| progress.is_lesson_completed(id))
        .count();
    CompletionStats::new(completed, module.lessons.len())
}
