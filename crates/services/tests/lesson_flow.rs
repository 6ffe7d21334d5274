use learn_core::model::{ContentBlock, LessonId, ModuleId};
use learn_core::time::fixed_clock;
use services::{AppServices, LESSON_XP, LessonServiceError};

#[tokio::test]
async fn launch_counts_streak_once() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let progress = app.progress().snapshot();
    assert_eq!(progress.streak_days(), 1);
    assert_eq!(progress.last_streak(), Some(fixed_clock().today()));
}

#[tokio::test]
async fn opening_a_lesson_parses_content_and_records_access() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let lessons = app.lessons();

    let view = lessons.open_lesson(&"intro-to-rn".into()).unwrap();
    assert_eq!(
        view.blocks.first(),
        Some(&ContentBlock::heading(1, "Introduction to React Native"))
    );
    assert!(view.blocks.iter().any(|b| matches!(b, ContentBlock::List { .. })));
    assert_eq!(view.previous, None);
    assert_eq!(view.next, Some(LessonId::from("setting-up-environment")));
    assert!(!view.is_completed);

    let last = app.progress().snapshot().last_accessed().clone();
    assert_eq!(last.module_id, Some(ModuleId::from("getting-started")));
    assert_eq!(last.lesson_id, Some(LessonId::from("intro-to-rn")));
}

#[tokio::test]
async fn completing_awards_xp_only_once() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let lessons = app.lessons();
    let id = LessonId::from("hello-world");

    assert!(lessons.complete_lesson(&id).unwrap());
    assert!(!lessons.complete_lesson(&id).unwrap());
    assert_eq!(app.progress().snapshot().xp(), u64::from(LESSON_XP));

    let overview = lessons.module_overview(&"getting-started".into()).unwrap();
    assert_eq!(overview.stats.completed, 1);
    assert_eq!(overview.stats.total, 5);
    assert!(lessons.open_lesson(&id).unwrap().is_completed);
}

#[tokio::test]
async fn unknown_lessons_are_rejected() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let err = app.lessons().complete_lesson(&"nope".into()).unwrap_err();
    assert!(matches!(err, LessonServiceError::UnknownLesson(_)));
    assert_eq!(app.progress().snapshot().xp(), 0);
}

#[tokio::test]
async fn resume_seeds_first_lesson_on_first_launch() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let target = app.lessons().resume().expect("catalog has lessons");
    assert_eq!(target.id, LessonId::from("intro-to-rn"));

    let last = app.progress().snapshot().last_accessed().clone();
    assert_eq!(last.module_id, Some(ModuleId::from("getting-started")));
}

#[tokio::test]
async fn bookmark_toggle_reports_state() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let lessons = app.lessons();
    let id = LessonId::from("understanding-jsx");

    assert!(lessons.toggle_bookmark(&id).unwrap());
    assert!(!lessons.toggle_bookmark(&id).unwrap());
    assert!(app.progress().snapshot().bookmarked_lessons().is_empty());
}

#[tokio::test]
async fn sqlite_backed_services_persist_between_launches() {
    let url = "sqlite:file:memdb_services_launch?mode=memory&cache=shared";
    let first = AppServices::new_sqlite(url, fixed_clock()).await.unwrap();
    first.lessons().complete_lesson(&"intro-to-rn".into()).unwrap();
    first.flush().await;

    let second = AppServices::new_sqlite(url, fixed_clock()).await.unwrap();
    let progress = second.progress().snapshot();
    assert!(progress.is_lesson_completed(&"intro-to-rn".into()));
    assert_eq!(progress.streak_days(), 1);
    assert_eq!(second.lessons().overall_completion().completed, 1);
}

#[tokio::test]
async fn modules_count_lessons_that_are_not_authored_yet() {
    let app = AppServices::in_memory(fixed_clock()).await.unwrap();
    let overview = app.lessons().module_overview(&"core-components".into()).unwrap();
    assert_eq!(overview.stats.completed, 0);
    assert_eq!(overview.stats.total, 5);

    let err = app.lessons().open_lesson(&"view-component".into()).unwrap_err();
    assert!(matches!(err, LessonServiceError::UnknownLesson(_)));
}
