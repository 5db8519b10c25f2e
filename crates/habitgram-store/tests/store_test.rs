//! Integration tests for the SQLite store.

use chrono::{NaiveDate, Utc};
use habitgram_core::{HabitId, LedgerEvent, Priority, UserId};
use habitgram_store::{NewHabit, Store, StoreError};
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> Store {
    let path = dir.path().join("test.db");
    Store::connect(path.to_str().unwrap(), 2).await.unwrap()
}

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_user_and_habit(store: &Store) -> (UserId, HabitId) {
    let user = UserId(42);
    store.ensure_user(user, None, "UTC").await.unwrap();
    let habit = store
        .create_habit(NewHabit {
            user_id: user,
            title: "Morning run".to_string(),
            category: "fitness".to_string(),
            priority: Priority::High,
            color: "#ff5722".to_string(),
            coins_reward: Some(15),
            reminder_time: Some("07:30".to_string()),
            reminder_date: None,
            reminder_days: None,
        })
        .await
        .unwrap();
    (user, habit.id())
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let first = store
        .ensure_user(UserId(7), Some(UserId(99)), "Europe/Berlin")
        .await
        .unwrap();
    assert_eq!(first.referred_by, Some(99));
    assert_eq!(first.timezone, "Europe/Berlin");

    // A second call with different creation-time fields must not overwrite.
    let second = store.ensure_user(UserId(7), None, "UTC").await.unwrap();
    assert_eq!(second.referred_by, Some(99));
    assert_eq!(second.timezone, "Europe/Berlin");
    assert_eq!(second.xp, 0);
    assert_eq!(second.level, 1);
}

#[tokio::test]
async fn duplicate_completion_insert_is_a_benign_conflict() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;

    let d = day("2026-08-29");
    store
        .insert_completion(habit, user, d, Utc::now(), None)
        .await
        .unwrap();

    let err = store
        .insert_completion(habit, user, d, Utc::now(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateCompletion { .. }));

    // Exactly one row survives.
    let dates = store.completion_dates_for_habit(habit).await.unwrap();
    assert_eq!(dates, vec![d]);
}

#[tokio::test]
async fn ledger_delta_is_applied_atomically_and_clamped() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, _) = seed_user_and_habit(&store).await;

    store
        .apply_ledger_delta(user, LedgerEvent::Added { reward: 15 }.delta())
        .await
        .unwrap();
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 10);
    assert_eq!(row.total_coins, 15);
    assert_eq!(row.level, 1);

    // Removing more than was ever added clamps at zero.
    store
        .apply_ledger_delta(user, LedgerEvent::Removed { reward: 500 }.delta())
        .await
        .unwrap();
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 0);
    assert_eq!(row.total_coins, 0);
    assert_eq!(row.level, 1);
}

#[tokio::test]
async fn ledger_level_crosses_boundary_in_sql() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, _) = seed_user_and_habit(&store).await;

    // Nine completions: xp 90, still level 1.
    for _ in 0..9 {
        store
            .apply_ledger_delta(user, LedgerEvent::Added { reward: 10 }.delta())
            .await
            .unwrap();
    }
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 90);
    assert_eq!(row.level, 1);

    // The tenth crosses into level 2.
    store
        .apply_ledger_delta(user, LedgerEvent::Added { reward: 10 }.delta())
        .await
        .unwrap();
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 100);
    assert_eq!(row.level, 2);
}

#[tokio::test]
async fn ledger_delta_for_unknown_user_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let err = store
        .apply_ledger_delta(UserId(555), LedgerEvent::Added { reward: 10 }.delta())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn delete_completion_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;

    let d = day("2026-08-29");
    store
        .insert_completion(habit, user, d, Utc::now(), Some("felt great"))
        .await
        .unwrap();

    let removed = store.delete_completion(habit, d).await.unwrap();
    assert_eq!(removed.unwrap().note.as_deref(), Some("felt great"));

    // Second delete is a no-op, not an error.
    let removed = store.delete_completion(habit, d).await.unwrap();
    assert!(removed.is_none());
}

#[tokio::test]
async fn recompute_totals_corrects_drift() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;

    // Two persisted completions, but pretend the ledger update was lost.
    store
        .insert_completion(habit, user, day("2026-08-28"), Utc::now(), None)
        .await
        .unwrap();
    store
        .insert_completion(habit, user, day("2026-08-29"), Utc::now(), None)
        .await
        .unwrap();

    store.recompute_user_totals(user).await.unwrap();
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 20);
    assert_eq!(row.total_coins, 30);
    assert_eq!(row.level, 1);
}

#[tokio::test]
async fn archived_habits_drop_out_of_views_and_reminder_scans() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;

    let slots = vec!["07:30".to_string(), "04:30".to_string()];
    assert_eq!(store.habits_with_reminder_at(&slots).await.unwrap().len(), 1);

    store.archive_habit(habit, user).await.unwrap();

    assert!(store.list_active_habits(user).await.unwrap().is_empty());
    assert!(store.habits_with_reminder_at(&slots).await.unwrap().is_empty());
}

#[tokio::test]
async fn reminder_scan_respects_notification_opt_out() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, _) = seed_user_and_habit(&store).await;

    store.set_notifications_enabled(user, false).await.unwrap();

    let slots = vec!["07:30".to_string(), "04:30".to_string()];
    assert!(store.habits_with_reminder_at(&slots).await.unwrap().is_empty());
}

#[tokio::test]
async fn habit_patch_updates_only_provided_fields() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;

    let updated = store
        .update_habit(
            habit,
            user,
            habitgram_store::HabitPatch {
                title: Some("Evening run".to_string()),
                reminder_time: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Evening run");
    assert_eq!(updated.reminder_time, None);
    // Untouched fields survive.
    assert_eq!(updated.category, "fitness");
    assert_eq!(updated.coins_reward, 15);
}

#[tokio::test]
async fn habit_edits_are_scoped_to_the_owner() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (_, habit) = seed_user_and_habit(&store).await;
    store.ensure_user(UserId(1000), None, "UTC").await.unwrap();

    let err = store
        .update_habit(habit, UserId(1000), habitgram_store::HabitPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    let err = store.archive_habit(habit, UserId(1000)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn daily_counts_group_by_date() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let (user, habit) = seed_user_and_habit(&store).await;
    let other = store
        .create_habit(NewHabit {
            user_id: user,
            title: "Read".to_string(),
            category: "reading".to_string(),
            priority: Priority::Low,
            color: "#2196f3".to_string(),
            coins_reward: None,
            reminder_time: None,
            reminder_date: None,
            reminder_days: None,
        })
        .await
        .unwrap();

    let d = day("2026-08-29");
    store
        .insert_completion(habit, user, d, Utc::now(), None)
        .await
        .unwrap();
    store
        .insert_completion(other.id(), user, d, Utc::now(), None)
        .await
        .unwrap();
    store
        .insert_completion(habit, user, day("2026-08-28"), Utc::now(), None)
        .await
        .unwrap();

    let counts = store
        .daily_counts(user, day("2026-08-23"), d)
        .await
        .unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].date, day("2026-08-28"));
    assert_eq!(counts[0].count, 1);
    assert_eq!(counts[1].date, d);
    assert_eq!(counts[1].count, 2);
}
