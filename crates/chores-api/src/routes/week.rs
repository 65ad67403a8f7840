//! # Weekly View and Completion Toggles
//!
//! `GET /api/week` returns the current window and every zone's assignments.
//! A read that finds the window already ended advances the rotation first,
//! under the same lock as the timer.
//!
//! Toggle endpoints address a task by its external identifier and answer
//! `204 No Content` or `404 Not Found`. They never touch assignments or the
//! rotation index.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chores_state::{Completion, RotationError, WeekView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Build the weekly view router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/week", get(current_week))
        .route("/toggle/{id}", post(flip_task))
        .route(
            "/api/tasks/{id}/complete",
            put(complete_task).delete(reopen_task),
        )
}

// -- DTOs ---------------------------------------------------------------------

/// The current week as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeekResponse {
    /// Monday that starts the week, formatted `Mon-DD-YY`.
    pub start_date: String,
    /// Monday that starts the following week, formatted `Mon-DD-YY`.
    pub end_date: String,
    /// Rotation offset that produced this week's assignments.
    pub rotation_index: u64,
    /// Zones in configuration order.
    pub zones: Vec<ZoneResponse>,
}

/// One zone's tasks, in configuration order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneResponse {
    /// Zone name as configured.
    pub name: String,
    /// Task slots in configuration order.
    pub tasks: Vec<TaskResponse>,
}

/// One task slot for the week.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    /// External identifier accepted by the toggle endpoints.
    pub id: String,
    /// Display text of the task.
    pub description: String,
    /// User name, or `"Anyone"` when no user landed on this slot.
    pub assigned: String,
    /// Whether the task was marked done this week.
    pub completed: bool,
}

impl From<WeekView> for WeekResponse {
    fn from(view: WeekView) -> Self {
        Self {
            start_date: view.window.start_label(),
            end_date: view.window.end_label(),
            rotation_index: view.index.value(),
            zones: view
                .zones
                .iter()
                .map(|zone| ZoneResponse {
                    name: zone.name().to_string(),
                    tasks: zone
                        .tasks()
                        .iter()
                        .map(|task| TaskResponse {
                            id: task.id().to_string(),
                            description: task.description().to_string(),
                            assigned: task.assignee().to_string(),
                            completed: task.is_completed(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Convert a rotation failure, raising the fatal signal if it is not
/// recoverable.
pub(crate) fn escalate(state: &AppState, err: RotationError) -> AppError {
    if !err.is_recoverable() {
        state.fatal.raise(err.to_string());
    }
    err.into()
}

// -- Handlers -----------------------------------------------------------------

/// GET /api/week: Current window and assignments.
#[utoipa::path(
    get,
    path = "/api/week",
    responses(
        (status = 200, description = "Current week", body = WeekResponse),
        (status = 500, description = "Rotation could not be advanced", body = crate::error::ErrorBody),
    ),
    tag = "week"
)]
pub(crate) async fn current_week(
    State(state): State<AppState>,
) -> Result<Json<WeekResponse>, AppError> {
    let view = state
        .rotation
        .current_view(&state.clock.now())
        .map_err(|e| escalate(&state, e))?;
    Ok(Json(view.into()))
}

/// POST /toggle/{id}: Flip a task's completion flag.
#[utoipa::path(
    post,
    path = "/toggle/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Completion flipped"),
        (status = 404, description = "Unknown task", body = crate::error::ErrorBody),
    ),
    tag = "tasks"
)]
pub(crate) async fn flip_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    apply(&state, &id, Completion::Flip)
}

/// PUT /api/tasks/{id}/complete: Mark a task done.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/complete",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task marked complete"),
        (status = 404, description = "Unknown task", body = crate::error::ErrorBody),
    ),
    tag = "tasks"
)]
pub(crate) async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    apply(&state, &id, Completion::Set(true))
}

/// DELETE /api/tasks/{id}/complete: Mark a task not done.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}/complete",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task marked incomplete"),
        (status = 404, description = "Unknown task", body = crate::error::ErrorBody),
    ),
    tag = "tasks"
)]
pub(crate) async fn reopen_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    apply(&state, &id, Completion::Set(false))
}

fn apply(state: &AppState, id: &str, change: Completion) -> Result<StatusCode, AppError> {
    state
        .rotation
        .toggle(id, change)
        .map_err(|e| escalate(state, e))?;
    Ok(StatusCode::NO_CONTENT)
}
