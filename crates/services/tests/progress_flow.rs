use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use learn_core::model::{Catalog, LastAccessed, LessonId, UserProgress};
use learn_core::time::{fixed_clock, fixed_now};
use services::{Clock, ProgressService};
use storage::repository::{InMemoryStore, KeyValueStore, StorageError, StoreKey};

async fn reload(store: &InMemoryStore, clock: Clock) -> ProgressService {
    ProgressService::load(clock, Arc::new(store.clone())).await
}

#[tokio::test]
async fn progress_survives_restart() {
    let store = InMemoryStore::new();
    let progress = reload(&store, fixed_clock()).await;

    progress.mark_lesson_complete("intro-to-rn".into());
    progress.toggle_bookmark("hello-world".into());
    progress.increment_xp(10);
    progress.update_last_accessed(LastAccessed::new(
        Some("getting-started".into()),
        Some("intro-to-rn".into()),
    ));
    progress.flush().await;

    let restarted = reload(&store, fixed_clock()).await;
    assert_eq!(restarted.snapshot(), progress.snapshot());
    assert!(restarted.is_lesson_completed(&"intro-to-rn".into()));
    assert!(restarted.is_bookmarked(&"hello-world".into()));
    assert_eq!(restarted.snapshot().xp(), 10);
}

#[tokio::test]
async fn streak_follows_calendar_days_across_launches() {
    let store = InMemoryStore::new();
    let mut clock = fixed_clock();

    let day_one = reload(&store, clock).await;
    day_one.update_streak();
    day_one.update_streak();
    day_one.flush().await;
    assert_eq!(day_one.snapshot().streak_days(), 1);

    clock.advance(Duration::days(1));
    let day_two = reload(&store, clock).await;
    day_two.update_streak();
    day_two.flush().await;
    assert_eq!(day_two.snapshot().streak_days(), 2);
    assert_eq!(day_two.snapshot().last_streak(), Some(clock.today()));

    clock.advance(Duration::days(2));
    let after_gap = reload(&store, clock).await;
    after_gap.update_streak();
    assert_eq!(after_gap.snapshot().streak_days(), 1);
}

#[tokio::test]
async fn reset_is_persisted_immediately() {
    let store = InMemoryStore::new();
    let progress = reload(&store, fixed_clock()).await;
    progress.mark_lesson_complete("a".into());
    progress.increment_xp(25);
    progress.update_streak();

    progress.reset_progress();
    assert_eq!(progress.snapshot(), UserProgress::default());
    progress.flush().await;

    let restarted = reload(&store, fixed_clock()).await;
    assert_eq!(restarted.snapshot(), UserProgress::default());
}

#[tokio::test]
async fn complete_lesson_once_awards_xp_once() {
    let store = InMemoryStore::new();
    let progress = reload(&store, fixed_clock()).await;
    let id = LessonId::from("hello-world");

    assert!(progress.complete_lesson_once(id.clone(), 10));
    assert!(!progress.complete_lesson_once(id, 10));
    assert_eq!(progress.snapshot().xp(), 10);
}

#[tokio::test]
async fn repeat_completion_writes_nothing() {
    let store = InMemoryStore::new();
    let progress = reload(&store, fixed_clock()).await;
    let id = LessonId::from("hello-world");

    assert!(progress.complete_lesson_once(id.clone(), 10));
    progress.flush().await;
    store.remove(StoreKey::UserProgress).await.unwrap();

    assert!(!progress.complete_lesson_once(id, 10));
    progress.flush().await;
    assert_eq!(store.get(StoreKey::UserProgress).await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_progress_starts_fresh() {
    let store = InMemoryStore::new();
    store
        .set(StoreKey::UserProgress, r#"{"state": {"streakDays": "many"}, "version": 0}"#)
        .await
        .unwrap();

    let progress = reload(&store, fixed_clock()).await;
    assert_eq!(progress.snapshot(), UserProgress::default());
}

#[tokio::test]
async fn empty_catalog_completion_is_zero() {
    let progress = reload(&InMemoryStore::new(), fixed_clock()).await;
    progress.mark_lesson_complete("stray".into());

    let catalog = Catalog::new(Vec::new(), Vec::new(), Vec::new()).unwrap();
    let stats = progress.overall_completion(&catalog);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.percentage, 0.0);
}

struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: StoreKey) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set(&self, _key: StoreKey, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn remove(&self, _key: StoreKey) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn storage_failures_never_reach_callers() {
    let progress = ProgressService::load(Clock::fixed(fixed_now()), Arc::new(UnavailableStore)).await;
    assert_eq!(progress.snapshot(), UserProgress::default());

    progress.increment_xp(5);
    progress.flush().await;
    assert_eq!(progress.snapshot().xp(), 5);
}
