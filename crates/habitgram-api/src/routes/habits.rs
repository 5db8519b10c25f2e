//! Habit CRUD and the annotated list view.

use crate::auth::caller;
use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use habitgram_core::{HabitId, Priority};
use habitgram_service::AnnotatedHabit;
use habitgram_store::{HabitPatch, HabitRow, NewHabit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct HabitPayload {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub color: String,
    pub coins_reward: i64,
    pub reminder_time: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_days: Option<String>,
}

impl From<&HabitRow> for HabitPayload {
    fn from(row: &HabitRow) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            category: row.category.clone(),
            priority: row.priority(),
            color: row.color.clone(),
            coins_reward: row.coins_reward,
            reminder_time: row.reminder_time.clone(),
            reminder_date: row.reminder_date,
            reminder_days: row.reminder_days.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnnotatedHabitPayload {
    #[serde(flatten)]
    pub habit: HabitPayload,
    pub completed: bool,
    pub completion_id: Option<i64>,
    pub today_note: Option<String>,
    pub current_streak: u32,
}

impl From<AnnotatedHabit> for AnnotatedHabitPayload {
    fn from(a: AnnotatedHabit) -> Self {
        Self {
            habit: HabitPayload::from(&a.habit),
            completed: a.completed,
            completion_id: a.completion_id.map(|c| c.0),
            today_note: a.today_note,
            current_streak: a.current_streak,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse {
    pub success: bool,
    pub habits: Vec<AnnotatedHabitPayload>,
}

/// Habits for a date, annotated with completion state and streak.
pub(crate) async fn list_habits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let habits = state.views.habits_for_date(user_id, query.date).await?;
    Ok(Json(ListResponse {
        success: true,
        habits: habits.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateHabitRequest {
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub coins_reward: Option<u32>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_days: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HabitResponse {
    pub success: bool,
    pub habit: HabitPayload,
}

/// Creates a habit for the caller.
pub(crate) async fn create_habit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateHabitRequest>,
) -> Result<Json<HabitResponse>, ApiError> {
    let user_id = caller(&headers)?;
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title cannot be empty".to_string()));
    }

    let row = state
        .store
        .create_habit(NewHabit {
            user_id,
            title: request.title,
            category: request.category,
            priority: request.priority.unwrap_or_default(),
            color: request.color.unwrap_or_else(|| "#4caf50".to_string()),
            coins_reward: request.coins_reward,
            reminder_time: request.reminder_time,
            reminder_date: request.reminder_date,
            reminder_days: request.reminder_days,
        })
        .await?;
    Ok(Json(HabitResponse {
        success: true,
        habit: HabitPayload::from(&row),
    }))
}

/// Distinguishes an absent field (leave alone) from an explicit null
/// (clear the value) for the reminder fields.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateHabitRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub coins_reward: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub reminder_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reminder_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reminder_days: Option<Option<String>>,
}

/// Partial edit of a habit, scoped to the owner.
pub(crate) async fn update_habit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateHabitRequest>,
) -> Result<Json<HabitResponse>, ApiError> {
    let user_id = caller(&headers)?;
    let row = state
        .store
        .update_habit(
            HabitId(id),
            user_id,
            HabitPatch {
                title: request.title,
                category: request.category,
                priority: request.priority,
                color: request.color,
                coins_reward: request.coins_reward,
                reminder_time: request.reminder_time,
                reminder_date: request.reminder_date,
                reminder_days: request.reminder_days,
            },
        )
        .await?;
    Ok(Json(HabitResponse {
        success: true,
        habit: HabitPayload::from(&row),
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct AckResponse {
    pub success: bool,
}

/// Soft-deletes a habit.
pub(crate) async fn archive_habit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<AckResponse>, ApiError> {
    let user_id = caller(&headers)?;
    state.store.archive_habit(HabitId(id), user_id).await?;
    Ok(Json(AckResponse { success: true }))
}
