use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChallengeId, LessonId, ModuleId};
use crate::model::progress::LastAccessed;

const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),

    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    #[error("lesson {lesson} belongs to unknown module {module}")]
    UnknownLessonModule { lesson: LessonId, module: ModuleId },

    #[error("invalid catalog data: {0}")]
    Malformed(#[from] serde_json::Error),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub description: String,
    /// Markdown-like body, see [`crate::parser::parse`].
    pub content: String,
    #[serde(default)]
    pub code_example: Option<String>,
    pub difficulty: Difficulty,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub module_id: ModuleId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Lesson ids in display order.
    pub lessons: Vec<LessonId>,
    pub order: u32,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub initial_code: String,
    pub solution: String,
    #[serde(default)]
    pub hints: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub module_id: ModuleId,
}

#[derive(Deserialize)]
struct CatalogFile {
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
    #[serde(default)]
    challenges: Vec<Challenge>,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Read-only lesson catalog. Modules are kept sorted by `order`.
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
    challenges: Vec<Challenge>,
    lesson_index: HashMap<LessonId, usize>,
}

impl Catalog {
    /// Build a catalog after checking ids are unique and every lesson has a module.
    ///
    /// A module may list lessons that are not authored yet. They count towards
    /// the module's size but are skipped wherever a lesson record is needed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids or a lesson pointing at an unknown module.
    pub fn new(
        mut modules: Vec<Module>,
        lessons: Vec<Lesson>,
        challenges: Vec<Challenge>,
    ) -> Result<Self, CatalogError> {
        let mut lesson_index = HashMap::with_capacity(lessons.len());
        for (idx, lesson) in lessons.iter().enumerate() {
            if lesson_index.insert(lesson.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateLesson(lesson.id.clone()));
            }
        }

        let mut module_ids = HashSet::with_capacity(modules.len());
        for module in &modules {
            if !module_ids.insert(module.id.clone()) {
                return Err(CatalogError::DuplicateModule(module.id.clone()));
            }
        }

        if let Some(orphan) = lessons.iter().find(|l| !module_ids.contains(&l.module_id)) {
            return Err(CatalogError::UnknownLessonModule {
                lesson: orphan.id.clone(),
                module: orphan.module_id.clone(),
            });
        }

        modules.sort_by_key(|module| module.order);

        Ok(Self {
            modules,
            lessons,
            challenges,
            lesson_index,
        })
    }

    /// Parse a catalog from its JSON form (`{"modules": [...], "lessons": [...], "challenges": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Malformed` for invalid JSON, or any validation error from [`Catalog::new`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.modules, file.lessons, file.challenges)
    }

    /// The catalog shipped with the application.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is inconsistent.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lesson_index.get(id).map(|idx| &self.lessons[*idx])
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == *id)
    }

    #[must_use]
    pub fn challenge(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|challenge| challenge.id == *id)
    }

    /// Authored lessons of a module in the module's own order.
    #[must_use]
    pub fn lessons_in_module(&self, id: &ModuleId) -> Vec<&Lesson> {
        self.module(id)
            .map(|module| {
                module
                    .lessons
                    .iter()
                    .filter_map(|lesson_id| self.lesson(lesson_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First `limit` modules that are not locked.
    #[must_use]
    pub fn unlocked_modules(&self, limit: usize) -> Vec<&Module> {
        self.modules
            .iter()
            .filter(|module| !module.is_locked)
            .take(limit)
            .collect()
    }

    /// Previous and next lessons within the lesson's module.
    ///
    /// Siblings follow the order of the lesson records, not the module's list.
    #[must_use]
    pub fn adjacent_lessons(&self, id: &LessonId) -> (Option<&Lesson>, Option<&Lesson>) {
        let Some(lesson) = self.lesson(id) else {
            return (None, None);
        };
        let siblings: Vec<&Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.module_id == lesson.module_id)
            .collect();
        let Some(pos) = siblings.iter().position(|l| l.id == *id) else {
            return (None, None);
        };

        let previous = pos.checked_sub(1).and_then(|p| siblings.get(p)).copied();
        let next = siblings.get(pos + 1).copied();
        (previous, next)
    }

    /// Where "continue learning" should land.
    ///
    /// The last accessed lesson wins; otherwise the first lesson of the last
    /// accessed module, falling back to the first module.
    #[must_use]
    pub fn resume_target(&self, last: &LastAccessed) -> Option<&Lesson> {
        if let Some(lesson) = last.lesson_id.as_ref().and_then(|id| self.lesson(id)) {
            return Some(lesson);
        }

        let module = match last.module_id.as_ref() {
            Some(id) => self.module(id),
            None => self.modules.first(),
        }?;
        module.lessons.first().and_then(|id| self.lesson(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, module: &str) -> Lesson {
        Lesson {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            content: format!("# {id}"),
            code_example: None,
            difficulty: Difficulty::Beginner,
            duration_minutes: 5,
            tags: Vec::new(),
            module_id: module.into(),
        }
    }

    fn module(id: &str, order: u32, lessons: &[&str], is_locked: bool) -> Module {
        Module {
            id: id.into(),
            title: id.to_owned(),
            description: String::new(),
            icon: "book".into(),
            lessons: lessons.iter().map(|l| LessonId::from(*l)).collect(),
            order,
            is_locked,
        }
    }

    fn sample() -> Catalog {
        Catalog::new(
            vec![
                module("later", 2, &["c"], true),
                module("basics", 1, &["a", "b"], false),
            ],
            vec![lesson("a", "basics"), lesson("b", "basics"), lesson("c", "later")],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn modules_are_sorted_by_order() {
        let catalog = sample();
        let ids: Vec<_> = catalog.modules().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["basics", "later"]);
        assert_eq!(catalog.unlocked_modules(3).len(), 1);
    }

    #[test]
    fn accepts_module_listing_unauthored_lessons() {
        let raw = r##"{
            "modules": [
                {"id": "m", "title": "M", "description": "", "icon": "book", "lessons": ["a", "planned"], "order": 1}
            ],
            "lessons": [
                {"id": "a", "title": "A", "description": "", "content": "# A", "difficulty": "beginner", "duration": 5, "tags": [], "moduleId": "m"}
            ],
            "challenges": []
        }"##;
        let catalog = Catalog::from_json(raw).unwrap();
        let module = catalog.module(&"m".into()).unwrap();
        assert_eq!(module.lessons.len(), 2);
        assert!(catalog.lesson(&"planned".into()).is_none());

        let authored: Vec<_> = catalog
            .lessons_in_module(&"m".into())
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(authored, ["a"]);
    }

    #[test]
    fn rejects_orphan_lesson() {
        let err = Catalog::new(Vec::new(), vec![lesson("a", "nowhere")], Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownLessonModule { .. }));
    }

    #[test]
    fn rejects_duplicate_lessons() {
        let err = Catalog::new(
            vec![module("basics", 1, &["a"], false)],
            vec![lesson("a", "basics"), lesson("a", "basics")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLesson(_)));
    }

    #[test]
    fn adjacent_lessons_stay_within_module() {
        let catalog = sample();
        let (prev, next) = catalog.adjacent_lessons(&"a".into());
        assert!(prev.is_none());
        assert_eq!(next.map(|l| l.id.as_str()), Some("b"));

        let (prev, next) = catalog.adjacent_lessons(&"b".into());
        assert_eq!(prev.map(|l| l.id.as_str()), Some("a"));
        assert!(next.is_none());
    }

    #[test]
    fn adjacent_lessons_follow_record_order() {
        let catalog = Catalog::new(
            vec![module("basics", 1, &["b", "a"], false)],
            vec![lesson("a", "basics"), lesson("b", "basics")],
            Vec::new(),
        )
        .unwrap();

        let (prev, next) = catalog.adjacent_lessons(&"a".into());
        assert!(prev.is_none());
        assert_eq!(next.map(|l| l.id.as_str()), Some("b"));
    }

    #[test]
    fn resume_target_prefers_lesson_then_module() {
        let catalog = sample();
        let empty = LastAccessed::default();
        assert_eq!(catalog.resume_target(&empty).map(|l| l.id.as_str()), Some("a"));

        let module_only = LastAccessed::new(Some("later".into()), None);
        assert_eq!(catalog.resume_target(&module_only).map(|l| l.id.as_str()), Some("c"));

        let both = LastAccessed::new(Some("later".into()), Some("b".into()));
        assert_eq!(catalog.resume_target(&both).map(|l| l.id.as_str()), Some("b"));
    }

    #[test]
    fn bundled_catalog_is_consistent() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.modules().len(), 8);
        assert_eq!(catalog.lessons().len(), 5);
        assert_eq!(catalog.challenges().len(), 2);
        assert!(catalog.modules().iter().all(|m| m.lessons.len() == 5));
        assert_eq!(catalog.unlocked_modules(usize::MAX).len(), 4);
        for lesson in catalog.lessons() {
            assert!(catalog.module(&lesson.module_id).is_some());
        }
    }
}
