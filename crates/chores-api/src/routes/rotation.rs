//! # Manual Rotation
//!
//! `POST /rotate` advances the rotation immediately, independent of the week
//! boundary. It shares the lock and the persist-then-commit path with the
//! timer and lazy triggers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;

use crate::error::AppError;
use crate::routes::week::escalate;
use crate::state::AppState;

/// Build the manual rotation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/rotate", post(force_rotate))
}

/// POST /rotate: Advance to the next rotation now.
#[utoipa::path(
    post,
    path = "/rotate",
    responses(
        (status = 204, description = "Rotation advanced"),
        (status = 500, description = "Index could not be persisted; the service shuts down", body = crate::error::ErrorBody),
    ),
    tag = "rotation"
)]
pub(crate) async fn force_rotate(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .rotation
        .force_advance(&state.clock.now())
        .map_err(|e| escalate(&state, e))?;
    Ok(StatusCode::NO_CONTENT)
}
