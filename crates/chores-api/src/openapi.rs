//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chores Rotation API",
        version = "0.1.0",
        description = "Weekly round-robin chore assignments: current week, completion toggles and manual rotation.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::week::current_week,
        crate::routes::week::flip_task,
        crate::routes::week::complete_task,
        crate::routes::week::reopen_task,
        crate::routes::rotation::force_rotate,
    ),
    components(schemas(
        crate::routes::week::WeekResponse,
        crate::routes::week::ZoneResponse,
        crate::routes::week::TaskResponse,
        crate::middleware::metrics::MetricsSnapshot,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "week", description = "Current week and assignments"),
        (name = "tasks", description = "Task completion"),
        (name = "rotation", description = "Rotation control"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
