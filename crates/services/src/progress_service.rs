use std::sync::Arc;

use learn_core::model::{
    Catalog, ChallengeId, LastAccessed, LessonId, Module, ProgressEvent, UserProgress,
};
use learn_core::stats::{self, CompletionStats};
use storage::repository::{KeyValueStore, StoreKey};

use crate::Clock;
use crate::persisted::PersistedState;

/// Owns the learner's progress and persists it after every mutation.
///
/// Mutations return as soon as the in-memory state has changed; the write to
/// the store happens in the background (see [`ProgressService::flush`]).
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    state: Arc<PersistedState<UserProgress>>,
}

impl ProgressService {
    /// Load persisted progress, or start empty if none is usable.
    pub async fn load(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        let state = PersistedState::load(store, StoreKey::UserProgress).await;
        Self {
            clock,
            state: Arc::new(state),
        }
    }

    pub fn apply(&self, event: ProgressEvent) {
        let today = self.clock.today();
        self.state.update(|progress| progress.apply(event, today));
    }

    pub fn mark_lesson_complete(&self, lesson_id: LessonId) {
        self.apply(ProgressEvent::LessonCompleted(lesson_id));
    }

    pub fn mark_challenge_complete(&self, challenge_id: ChallengeId) {
        self.apply(ProgressEvent::ChallengeCompleted(challenge_id));
    }

    pub fn toggle_bookmark(&self, lesson_id: LessonId) {
        self.apply(ProgressEvent::BookmarkToggled(lesson_id));
    }

    pub fn update_last_accessed(&self, update: LastAccessed) {
        self.apply(ProgressEvent::Accessed(update));
    }

    pub fn increment_xp(&self, amount: u32) {
        self.apply(ProgressEvent::XpEarned(amount));
    }

    /// Count today towards the streak. Meant to run once per app launch.
    pub fn update_streak(&self) {
        self.apply(ProgressEvent::StreakChecked);
    }

    pub fn reset_progress(&self) {
        self.apply(ProgressEvent::Reset);
    }

    /// Mark a lesson complete and award `xp`, unless it was already complete.
    ///
    /// Both changes land in a single write; nothing is written when the
    /// lesson was already complete. Returns whether the lesson was newly
    /// completed.
    pub fn complete_lesson_once(&self, lesson_id: LessonId, xp: u32) -> bool {
        self.state.update_if(|progress| {
            if progress.is_lesson_completed(&lesson_id) {
                return false;
            }
            progress.mark_lesson_complete(lesson_id);
            progress.increment_xp(xp);
            true
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> UserProgress {
        self.state.snapshot()
    }

    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.state.read(|progress| progress.is_lesson_completed(lesson_id))
    }

    #[must_use]
    pub fn is_bookmarked(&self, lesson_id: &LessonId) -> bool {
        self.state.read(|progress| progress.is_bookmarked(lesson_id))
    }

    #[must_use]
    pub fn overall_completion(&self, catalog: &Catalog) -> CompletionStats {
        self.state
            .read(|progress| stats::overall_completion(progress, catalog))
    }

    #[must_use]
    pub fn module_completion(&self, module: &Module) -> CompletionStats {
        self.state
            .read(|progress| stats::module_completion(progress, module))
    }

    /// Wait for queued writes to reach the store.
    pub async fn flush(&self) {
        self.state.flush().await;
    }
}
