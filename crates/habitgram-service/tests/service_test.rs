//! Integration tests for the orchestration layer against a real temporary
//! SQLite store and a stubbed messaging gateway.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use habitgram_core::{Badge, HabitId, Priority, UserId};
use habitgram_service::{
    ReminderDispatcher, ServiceError, StatsService, ToggleRequest, ToggleService, ViewService,
};
use habitgram_store::{NewHabit, Store};
use habitgram_telegram::{MessagingGateway, ReminderMessage, TelegramError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct RecordingGateway {
    sent: Mutex<Vec<(UserId, HabitId)>>,
    fail_for: Option<UserId>,
}

impl RecordingGateway {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: None,
        }
    }

    fn failing_for(user: UserId) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: Some(user),
        }
    }

    fn sent(&self) -> Vec<(UserId, HabitId)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_reminder(
        &self,
        chat_id: UserId,
        reminder: &ReminderMessage,
    ) -> Result<(), TelegramError> {
        if self.fail_for == Some(chat_id) {
            return Err(TelegramError::Api {
                description: "chat not found".to_string(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, reminder.habit_id));
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str, _text: &str) -> Result<(), TelegramError> {
        Ok(())
    }
}

async fn open_store(dir: &TempDir) -> Store {
    let path = dir.path().join("test.db");
    Store::connect(path.to_str().unwrap(), 2).await.unwrap()
}

async fn seed(store: &Store, user: UserId, reward: u32) -> HabitId {
    store.ensure_user(user, None, "UTC").await.unwrap();
    store
        .create_habit(NewHabit {
            user_id: user,
            title: "Stretch".to_string(),
            category: "health".to_string(),
            priority: Priority::Medium,
            color: "#4caf50".to_string(),
            coins_reward: Some(reward),
            reminder_time: None,
            reminder_date: None,
            reminder_days: None,
        })
        .await
        .unwrap()
        .id()
}

fn request(habit: HabitId, user: UserId, date: NaiveDate, want: bool) -> ToggleRequest {
    ToggleRequest {
        habit_id: habit,
        user_id: user,
        date,
        want_completed: want,
        note: None,
    }
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[tokio::test]
async fn toggling_on_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(1);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());
    let date = today_utc();

    let first = service.toggle(request(habit, user, date, true)).await.unwrap();
    assert_eq!(first.coins_earned, 10);
    assert!(first.completion_id.is_some());

    let second = service.toggle(request(habit, user, date, true)).await.unwrap();
    assert_eq!(second.coins_earned, 0);
    assert_eq!(second.new_badge, None);
    assert_eq!(second.completion_id, first.completion_id);

    // Exactly one row persisted, ledger applied once.
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 10);
    assert_eq!(row.total_coins, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_award_exactly_one_reward() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::connect(path.to_str().unwrap(), 8).await.unwrap();
    let user = UserId(11);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());
    let date = today_utc();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.toggle(request(habit, user, date, true)).await })
        })
        .collect();

    // Every caller succeeds; the unique constraint arbitrates which one
    // wins the insert, the rest degrade to the already-done outcome.
    let mut total_coins = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.coins_earned == 0 || outcome.coins_earned == 10);
        total_coins += outcome.coins_earned;
    }
    assert_eq!(total_coins, 10);

    assert_eq!(store.count_completions_for_user(user).await.unwrap(), 1);
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 10);
    assert_eq!(row.total_coins, 10);
}

#[tokio::test]
async fn toggle_round_trip_restores_totals() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(2);
    let habit = seed(&store, user, 25).await;
    let service = ToggleService::new(store.clone());
    let date = today_utc();

    let on = service.toggle(request(habit, user, date, true)).await.unwrap();
    assert_eq!(on.coins_earned, 25);

    let off = service.toggle(request(habit, user, date, false)).await.unwrap();
    assert_eq!(off.coins_earned, -25);
    assert_eq!(off.new_badge, None);

    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 0);
    assert_eq!(row.total_coins, 0);
    assert_eq!(row.level, 1);
}

#[tokio::test]
async fn untoggling_a_never_completed_date_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(3);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());

    let outcome = service
        .toggle(request(habit, user, today_utc(), false))
        .await
        .unwrap();
    assert_eq!(outcome.coins_earned, 0);

    // No phantom ledger removal.
    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.xp, 0);
    assert_eq!(row.total_coins, 0);
}

#[tokio::test]
async fn foreign_habits_are_rejected_before_any_mutation() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let owner = UserId(4);
    let intruder = UserId(5);
    let habit = seed(&store, owner, 10).await;
    store.ensure_user(intruder, None, "UTC").await.unwrap();
    let service = ToggleService::new(store.clone());

    let err = service
        .toggle(request(habit, intruder, today_utc(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotOwner { .. }));

    assert!(store
        .find_completion(habit, today_utc())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn backdated_completions_are_accepted() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(6);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());

    let long_ago: NaiveDate = "2020-01-01".parse().unwrap();
    let outcome = service.toggle(request(habit, user, long_ago, true)).await.unwrap();
    assert_eq!(outcome.coins_earned, 10);
}

#[tokio::test]
async fn first_completion_unlocks_first_step() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(7);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());

    // Backdated so the event cannot be a 7-day streak or level transition;
    // the early-bird hour may coincide, but first_step outranks it.
    let date = today_utc() - Duration::days(30);
    let outcome = service.toggle(request(habit, user, date, true)).await.unwrap();
    assert_eq!(outcome.new_badge, Some(Badge::FirstStep));
}

#[tokio::test]
async fn seventh_consecutive_day_unlocks_week_streak() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(8);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());

    let today = today_utc();
    for offset in (1..7).rev() {
        service
            .toggle(request(habit, user, today - Duration::days(offset), true))
            .await
            .unwrap();
    }
    let outcome = service.toggle(request(habit, user, today, true)).await.unwrap();
    assert_eq!(outcome.new_badge, Some(Badge::WeekStreak));

    let row = store.get_user(user).await.unwrap().unwrap();
    assert_eq!(row.current_streak, 7);
}

#[tokio::test]
async fn callback_toggle_completes_today() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(9);
    let habit = seed(&store, user, 10).await;
    let service = ToggleService::new(store.clone());

    let outcome = service.toggle_done_today(habit, user).await.unwrap();
    assert_eq!(outcome.coins_earned, 10);

    // Pressing the button again is the idempotent already-done path.
    let again = service.toggle_done_today(habit, user).await.unwrap();
    assert_eq!(again.coins_earned, 0);
}

#[tokio::test]
async fn habit_list_is_annotated_for_the_requested_date() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(10);
    let habit = seed(&store, user, 10).await;
    let toggle = ToggleService::new(store.clone());
    let views = ViewService::new(store.clone(), "UTC".to_string());

    let date = today_utc();
    toggle
        .toggle(ToggleRequest {
            habit_id: habit,
            user_id: user,
            date,
            want_completed: true,
            note: Some("easy day".to_string()),
        })
        .await
        .unwrap();

    let annotated = views.habits_for_date(user, Some(date)).await.unwrap();
    assert_eq!(annotated.len(), 1);
    assert!(annotated[0].completed);
    assert_eq!(annotated[0].today_note.as_deref(), Some("easy day"));
    assert_eq!(annotated[0].current_streak, 1);

    let yesterday = views
        .habits_for_date(user, Some(date - Duration::days(1)))
        .await
        .unwrap();
    assert!(!yesterday[0].completed);
}

#[tokio::test]
async fn weekly_stats_zero_fill_the_seven_day_window_oldest_first() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(12);
    let habit = seed(&store, user, 10).await;
    let toggle = ToggleService::new(store.clone());
    let stats = StatsService::new(store.clone());

    let today = today_utc();
    toggle.toggle(request(habit, user, today, true)).await.unwrap();
    toggle
        .toggle(request(habit, user, today - Duration::days(2), true))
        .await
        .unwrap();
    // Older than the window; must not leak in.
    toggle
        .toggle(request(habit, user, today - Duration::days(10), true))
        .await
        .unwrap();

    let weekly = stats.weekly(user).await.unwrap();
    assert_eq!(weekly.len(), 7);
    assert_eq!(weekly[0].date, today - Duration::days(6));
    assert_eq!(weekly[6].date, today);
    let counts: Vec<u32> = weekly.iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 1, 0, 1]);
}

#[tokio::test]
async fn heatmap_spans_a_year_of_zero_filled_cells() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(13);
    let habit = seed(&store, user, 10).await;
    let toggle = ToggleService::new(store.clone());
    let stats = StatsService::new(store.clone());

    let today = today_utc();
    toggle.toggle(request(habit, user, today, true)).await.unwrap();
    toggle
        .toggle(request(habit, user, today - Duration::days(364), true))
        .await
        .unwrap();
    // One day past the window edge; counted globally but not as a cell.
    toggle
        .toggle(request(habit, user, today - Duration::days(365), true))
        .await
        .unwrap();

    let heatmap = stats.heatmap(user).await.unwrap();
    assert_eq!(heatmap.cells.len(), 365);
    assert_eq!(heatmap.cells[0].date, today - Duration::days(364));
    assert_eq!(heatmap.cells[0].count, 1);
    assert_eq!(heatmap.cells[0].level, 1);
    assert_eq!(heatmap.cells[364].date, today);
    assert_eq!(heatmap.cells[364].count, 1);
    assert!(heatmap.cells[1..364].iter().all(|c| c.count == 0 && c.level == 0));
    assert_eq!(heatmap.total_completions, 3);
    assert_eq!(heatmap.current_streak, 1);
}

fn reminder_habit(user: UserId, time: &str) -> NewHabit {
    NewHabit {
        user_id: user,
        title: format!("habit at {time}"),
        category: "health".to_string(),
        priority: Priority::Medium,
        color: "#4caf50".to_string(),
        coins_reward: None,
        reminder_time: Some(time.to_string()),
        reminder_date: None,
        reminder_days: None,
    }
}

#[tokio::test]
async fn reminder_scan_matches_the_rounded_slot_in_both_zones() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(20);
    store.ensure_user(user, None, "UTC").await.unwrap();

    // 17:30 is the Moscow (UTC+3) rendering of the 14:30 UTC slot; 14:35 is
    // off-boundary and must never match.
    store.create_habit(reminder_habit(user, "17:30")).await.unwrap();
    store.create_habit(reminder_habit(user, "14:30")).await.unwrap();
    store.create_habit(reminder_habit(user, "14:35")).await.unwrap();

    let gateway = Arc::new(RecordingGateway::new());
    let dispatcher = ReminderDispatcher::new(
        store.clone(),
        gateway.clone(),
        "Europe/Moscow".parse().unwrap(),
    );

    // 14:33 UTC rounds down to the 14:30 slot.
    let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 33, 0).unwrap();
    let report = dispatcher.dispatch(now).await.unwrap();

    assert_eq!(report.checked, ["17:30".to_string(), "14:30".to_string()]);
    assert_eq!(report.found, 2);
    assert_eq!(report.sent, 2);
    assert_eq!(gateway.sent().len(), 2);
}

#[tokio::test]
async fn one_failed_delivery_does_not_block_the_rest() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let broken = UserId(21);
    let healthy = UserId(22);
    store.ensure_user(broken, None, "UTC").await.unwrap();
    store.ensure_user(healthy, None, "UTC").await.unwrap();
    store.create_habit(reminder_habit(broken, "14:30")).await.unwrap();
    store.create_habit(reminder_habit(healthy, "14:30")).await.unwrap();

    let gateway = Arc::new(RecordingGateway::failing_for(broken));
    let dispatcher = ReminderDispatcher::new(
        store.clone(),
        gateway.clone(),
        "Europe/Moscow".parse().unwrap(),
    );

    let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 30, 0).unwrap();
    let report = dispatcher.dispatch(now).await.unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.sent, 1);
    assert_eq!(gateway.sent(), vec![(healthy, HabitId(2))]);
}

#[tokio::test]
async fn weekday_filter_skips_unscheduled_days() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let user = UserId(23);
    store.ensure_user(user, None, "UTC").await.unwrap();

    // 2026-08-29 is a Saturday (weekday 6); schedule Monday only.
    let mut habit = reminder_habit(user, "14:30");
    habit.reminder_days = Some("1".to_string());
    store.create_habit(habit).await.unwrap();

    let gateway = Arc::new(RecordingGateway::new());
    let dispatcher = ReminderDispatcher::new(
        store.clone(),
        gateway.clone(),
        "Europe/Moscow".parse().unwrap(),
    );

    let now = Utc.with_ymd_and_hms(2026, 8, 29, 14, 30, 0).unwrap();
    let report = dispatcher.dispatch(now).await.unwrap();
    assert_eq!(report.found, 0);
    assert!(gateway.sent().is_empty());
}
