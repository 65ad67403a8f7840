//! # Static Web Assets
//!
//! `GET /` serves `<web_root>/index.html` and `/static/*` serves
//! `<web_root>/static/`. The page renders itself from `GET /api/week`.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Build the static asset router rooted at `web_root`.
pub fn router(web_root: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(web_root.join("index.html")))
        .nest_service("/static", ServeDir::new(web_root.join("static")))
}
