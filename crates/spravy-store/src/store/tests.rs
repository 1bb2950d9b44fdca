use super::Store;
use crate::types::{DayBucket, ReminderInterval, TaskItem};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

#[tokio::test]
async fn test_unknown_user_has_empty_lists() {
    let store = test_store().await;
    let lists = store.load_tasks("nobody").await.unwrap();
    assert!(lists.today.is_empty());
    assert!(lists.tomorrow.is_empty());
    assert!(lists.is_empty());
}

#[tokio::test]
async fn test_save_task_appends_one_row() {
    let store = test_store().await;
    let before = store.load_tasks("user1").await.unwrap();

    store
        .save_task("user1", DayBucket::Today, "X", false)
        .await
        .unwrap();

    let after = store.load_tasks("user1").await.unwrap();
    assert_eq!(after.today.len(), before.today.len() + 1);
    assert_eq!(
        after.today.last().unwrap(),
        &TaskItem {
            text: "X".into(),
            done: false
        }
    );
    assert_eq!(after.tomorrow.len(), before.tomorrow.len());
}

#[tokio::test]
async fn test_tasks_keep_storage_order_and_duplicates() {
    let store = test_store().await;
    store
        .save_task("user1", DayBucket::Today, "first", false)
        .await
        .unwrap();
    store
        .save_task("user1", DayBucket::Tomorrow, "later", false)
        .await
        .unwrap();
    store
        .save_task("user1", DayBucket::Today, "first", false)
        .await
        .unwrap();

    let lists = store.load_tasks("user1").await.unwrap();
    assert_eq!(lists.today.len(), 2);
    assert_eq!(lists.today[0].text, "first");
    assert_eq!(lists.today[1].text, "first");
    assert_eq!(lists.tomorrow.len(), 1);
    assert_eq!(lists.tomorrow[0].text, "later");
}

#[tokio::test]
async fn test_tasks_are_per_user() {
    let store = test_store().await;
    store
        .save_task("user1", DayBucket::Today, "mine", false)
        .await
        .unwrap();

    let other = store.load_tasks("user2").await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_empty_task_text_accepted() {
    let store = test_store().await;
    store
        .save_task("user1", DayBucket::Today, "", false)
        .await
        .unwrap();

    let lists = store.load_tasks("user1").await.unwrap();
    assert_eq!(lists.today.len(), 1);
    assert_eq!(lists.today[0].text, "");
}

#[tokio::test]
async fn test_done_flag_roundtrip() {
    let store = test_store().await;
    store
        .save_task("user1", DayBucket::Tomorrow, "done one", true)
        .await
        .unwrap();

    let lists = store.load_tasks("user1").await.unwrap();
    assert!(lists.tomorrow[0].done);
    assert!(lists.incomplete(DayBucket::Tomorrow).is_empty());
}

#[tokio::test]
async fn test_unknown_bucket_row_is_skipped() {
    let store = test_store().await;
    sqlx::query("INSERT INTO tasks (user_id, day, task_text, done) VALUES (?, ?, ?, ?)")
        .bind("user1")
        .bind("someday")
        .bind("orphan")
        .bind(false)
        .execute(&store.pool)
        .await
        .unwrap();

    let lists = store.load_tasks("user1").await.unwrap();
    assert!(lists.is_empty());
}

#[tokio::test]
async fn test_reminder_defaults_to_off() {
    let store = test_store().await;
    let interval = store.load_reminder("nobody").await.unwrap();
    assert_eq!(interval, ReminderInterval::Off);
}

#[tokio::test]
async fn test_reminder_roundtrip_all_intervals() {
    let store = test_store().await;
    for interval in [
        ReminderInterval::Hourly,
        ReminderInterval::TwoHourly,
        ReminderInterval::Off,
    ] {
        store.save_reminder("user1", interval).await.unwrap();
        assert_eq!(store.load_reminder("user1").await.unwrap(), interval);
    }
}

#[tokio::test]
async fn test_reminder_upsert_keeps_latest_only() {
    let store = test_store().await;
    store
        .save_reminder("user1", ReminderInterval::Hourly)
        .await
        .unwrap();
    store
        .save_reminder("user1", ReminderInterval::TwoHourly)
        .await
        .unwrap();

    assert_eq!(
        store.load_reminder("user1").await.unwrap(),
        ReminderInterval::TwoHourly
    );

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reminders WHERE user_id = 'user1'")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_users_with_reminders_filters_off() {
    let store = test_store().await;
    store
        .save_reminder("hourly", ReminderInterval::Hourly)
        .await
        .unwrap();
    store
        .save_reminder("twohourly", ReminderInterval::TwoHourly)
        .await
        .unwrap();
    store
        .save_reminder("silent", ReminderInterval::Off)
        .await
        .unwrap();

    let mut users = store.users_with_reminders().await.unwrap();
    users.sort();
    assert_eq!(users, vec!["hourly".to_string(), "twohourly".to_string()]);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(&store.pool).await.unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}
