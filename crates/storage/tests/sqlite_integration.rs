use learn_core::model::{AppSettings, AppSettingsDraft, Theme, UserProgress};
use learn_core::time::fixed_clock;
use storage::repository::{KeyValueStore, Storage, StoreKey};
use storage::snapshot;
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_set_overwrites_previous_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set(StoreKey::UserProgress, "first").await.unwrap();
    repo.set(StoreKey::UserProgress, "second").await.unwrap();

    let value = repo.get(StoreKey::UserProgress).await.unwrap();
    assert_eq!(value.as_deref(), Some("second"));
    assert_eq!(repo.get(StoreKey::AppSettings).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_remove_clears_key() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_remove?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set(StoreKey::AppSettings, "{}").await.unwrap();
    repo.remove(StoreKey::AppSettings).await.unwrap();
    repo.remove(StoreKey::AppSettings).await.unwrap();

    assert_eq!(repo.get(StoreKey::AppSettings).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn snapshots_round_trip_through_sqlite_storage() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshots?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut progress = UserProgress::default();
    progress.mark_lesson_complete("intro-to-rn".into());
    progress.toggle_bookmark("hello-world".into());
    progress.update_streak(fixed_clock().today());
    snapshot::save(storage.kv.as_ref(), StoreKey::UserProgress, &progress)
        .await
        .unwrap();

    let settings = AppSettingsDraft {
        theme: Some(Theme::Dark),
        ..AppSettingsDraft::from_settings(&AppSettings::default())
    }
    .validate()
    .unwrap();
    snapshot::save(storage.kv.as_ref(), StoreKey::AppSettings, &settings)
        .await
        .unwrap();

    let loaded: UserProgress = snapshot::load(storage.kv.as_ref(), StoreKey::UserProgress)
        .await
        .unwrap()
        .expect("progress stored");
    assert_eq!(loaded, progress);

    let loaded: AppSettings = snapshot::load(storage.kv.as_ref(), StoreKey::AppSettings)
        .await
        .unwrap()
        .expect("settings stored");
    assert_eq!(loaded.theme(), Theme::Dark);
}
