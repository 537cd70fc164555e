//! Embedded web UI for looksy-ui
//!
//! HTML pages are rendered from handlers; CSS/JS are embedded at compile
//! time and served under /static/.

pub mod dashboard;
pub mod root;
pub mod static_assets;

use axum::{routing::get, Router};

use crate::AppState;

/// Build UI routes (HTML pages + static assets)
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root::landing_page))
        .route("/dashboard", get(dashboard::dashboard_page))
        .route("/static/looksy-ui.css", get(static_assets::serve_ui_css))
        .route("/static/dashboard.js", get(static_assets::serve_dashboard_js))
}
