//! # chores-api: HTTP Service for the Chore Rotation
//!
//! Serves the current week's round-robin assignments, accepts completion
//! toggles, and advances the rotation every Monday.
//!
//! ## API Surface
//!
//! | Route                              | Module                 | Purpose                     |
//! |------------------------------------|------------------------|-----------------------------|
//! | `GET /api/week`                    | [`routes::week`]       | Current window and tasks    |
//! | `POST /toggle/{id}`                | [`routes::week`]       | Flip completion             |
//! | `PUT/DELETE /api/tasks/{id}/complete` | [`routes::week`]    | Set/clear completion        |
//! | `POST /rotate`                     | [`routes::rotation`]   | Advance immediately         |
//! | `GET /`, `GET /static/*`           | [`routes::web`]        | HTML page and assets        |
//! | `GET /health/*`                    | this module            | Probes and counters         |
//!
//! ## Week Advancement
//!
//! Two triggers move the rotation forward: the background [`scheduler`] and
//! the staleness check performed by every read of the week. Both go through
//! the single lock inside [`chores_state::SharedRotation`], so each boundary
//! is crossed exactly once.
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros at `/openapi.json`.

pub mod bootstrap;
pub mod clock;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod scheduler;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    let api = Router::new()
        .merge(routes::week::router())
        .merge(routes::rotation::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/health/metrics", get(metrics_snapshot))
        .with_state(state.clone());

    let web = routes::web::router(&state.config.web_root);

    Router::new()
        .merge(health)
        .merge(api)
        .merge(web)
        .layer(Extension(metrics))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 503 once a fatal error has been raised.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.fatal.is_raised() {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting down")
    } else {
        (StatusCode::OK, "ready")
    }
}

async fn metrics_snapshot(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
