//! Authentication placeholder
//!
//! The demo has no real credential validation: any login succeeds and
//! logout is stateless. Sessions are not tied to a login in any way.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub ok: bool,
}

/// POST /api/login — accepts anything
pub async fn login(body: Option<Json<LoginRequest>>) -> Json<AuthResponse> {
    let username = body.map(|Json(b)| b.username).unwrap_or_default();
    info!(username = %username, "Demo login");
    Json(AuthResponse { ok: true })
}

/// POST /api/logout — stateless, the client returns to the landing page
pub async fn logout() -> Json<AuthResponse> {
    Json(AuthResponse { ok: true })
}

/// Build auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}
