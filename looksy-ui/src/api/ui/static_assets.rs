//! Static asset handlers for the looksy-ui web UI
//!
//! Embeds and serves CSS/JS files at compile time

use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;

const LOOKSY_UI_CSS: &str = include_str!("../../../static/looksy-ui.css");
const DASHBOARD_JS: &str = include_str!("../../../static/dashboard.js");

/// GET /static/looksy-ui.css
pub async fn serve_ui_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        LOOKSY_UI_CSS,
    )
        .into_response()
}

/// GET /static/dashboard.js
pub async fn serve_dashboard_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        DASHBOARD_JS,
    )
        .into_response()
}
