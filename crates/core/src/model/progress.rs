use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ChallengeId, LessonId, ModuleId};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// The most recently visited module/lesson pair. Either side may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAccessed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<ModuleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<LessonId>,
}

impl LastAccessed {
    #[must_use]
    pub fn new(module_id: Option<ModuleId>, lesson_id: Option<LessonId>) -> Self {
        Self {
            module_id,
            lesson_id,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module_id.is_none() && self.lesson_id.is_none()
    }
}

/// Per-installation learning progress.
///
/// The JSON shape (camelCase keys, `lastStreak` as `""` or `YYYY-MM-DD`) is
/// the one persisted under the `user-progress` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    completed_lessons: BTreeMap<LessonId, bool>,
    completed_challenges: BTreeMap<ChallengeId, bool>,
    bookmarked_lessons: Vec<LessonId>,
    last_accessed: LastAccessed,
    streak_days: u32,
    #[serde(with = "streak_date")]
    last_streak: Option<NaiveDate>,
    xp: u64,
}

/// A single mutation of [`UserProgress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    LessonCompleted(LessonId),
    ChallengeCompleted(ChallengeId),
    BookmarkToggled(LessonId),
    Accessed(LastAccessed),
    XpEarned(u32),
    /// Streak check for an app launch on the given day.
    StreakChecked,
    Reset,
}

impl UserProgress {
    /// Applies one event. `today` is only consulted for streak checks.
    pub fn apply(&mut self, event: ProgressEvent, today: NaiveDate) {
        match event {
            ProgressEvent::LessonCompleted(id) => self.mark_lesson_complete(id),
            ProgressEvent::ChallengeCompleted(id) => self.mark_challenge_complete(id),
            ProgressEvent::BookmarkToggled(id) => self.toggle_bookmark(id),
            ProgressEvent::Accessed(update) => self.update_last_accessed(update),
            ProgressEvent::XpEarned(amount) => self.increment_xp(amount),
            ProgressEvent::StreakChecked => self.update_streak(today),
            ProgressEvent::Reset => self.reset(),
        }
    }

    pub fn mark_lesson_complete(&mut self, lesson_id: LessonId) {
        self.completed_lessons.insert(lesson_id, true);
    }

    pub fn mark_challenge_complete(&mut self, challenge_id: ChallengeId) {
        self.completed_challenges.insert(challenge_id, true);
    }

    /// Removes the lesson from the bookmarks if present, otherwise appends it.
    pub fn toggle_bookmark(&mut self, lesson_id: LessonId) {
        if let Some(pos) = self.bookmarked_lessons.iter().position(|id| *id == lesson_id) {
            self.bookmarked_lessons.remove(pos);
        } else {
            self.bookmarked_lessons.push(lesson_id);
        }
    }

    /// Merges `update` into the last-accessed pair; unset fields keep their
    /// previous value.
    pub fn update_last_accessed(&mut self, update: LastAccessed) {
        if let Some(module_id) = update.module_id {
            self.last_accessed.module_id = Some(module_id);
        }
        if let Some(lesson_id) = update.lesson_id {
            self.last_accessed.lesson_id = Some(lesson_id);
        }
    }

    pub fn increment_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(u64::from(amount));
    }

    /// Counts `today` towards the daily streak.
    ///
    /// A second call on the same day is a no-op. A call on the day after the
    /// last counted day extends the streak; any other gap restarts it at 1.
    pub fn update_streak(&mut self, today: NaiveDate) {
        if self.last_streak == Some(today) {
            return;
        }

        let yesterday = today.checked_sub_days(Days::new(1));
        self.streak_days = if self.last_streak.is_some() && self.last_streak == yesterday {
            self.streak_days.saturating_add(1)
        } else {
            1
        };
        self.last_streak = Some(today);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.get(lesson_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_challenge_completed(&self, challenge_id: &ChallengeId) -> bool {
        self.completed_challenges
            .get(challenge_id)
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn is_bookmarked(&self, lesson_id: &LessonId) -> bool {
        self.bookmarked_lessons.contains(lesson_id)
    }

    /// Number of lessons recorded as completed, whether or not they are in
    /// the current catalog.
    #[must_use]
    pub fn completed_lesson_count(&self) -> usize {
        self.completed_lessons.values().filter(|done| **done).count()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeMap<LessonId, bool> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn completed_challenges(&self) -> &BTreeMap<ChallengeId, bool> {
        &self.completed_challenges
    }

    #[must_use]
    pub fn bookmarked_lessons(&self) -> &[LessonId] {
        &self.bookmarked_lessons
    }

    #[must_use]
    pub fn last_accessed(&self) -> &LastAccessed {
        &self.last_accessed
    }

    #[must_use]
    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    #[must_use]
    pub fn last_streak(&self) -> Option<NaiveDate> {
        self.last_streak
    }

    #[must_use]
    pub fn xp(&self) -> u64 {
        self.xp
    }
}

/// `Option<NaiveDate>` stored as `""` (never) or `YYYY-MM-DD`.
mod streak_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => ser.collect_str(&date.format(FORMAT)),
            None => ser.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(de)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map(Some)
            .map_err(D::Error::custom)
    }
}
