//! looksy-ui library interface
//!
//! Exposes the application state, router, and domain modules for
//! integration testing.

pub mod api;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use catalog::Catalog;
use chrono::{DateTime, Utc};
use looksy_common::config::LooksyConfig;
use looksy_common::events::EventBus;
use models::session::CustomerSession;
use services::{AnalysisClient, GenerationClient};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Application state shared across handlers
///
/// Sessions live only in this registry — there is no persistence. Each
/// session is an isolated unit of work; gateways operate on snapshots and
/// results are written back under the registry lock.
#[derive(Clone)]
pub struct AppState {
    /// Active customer sessions keyed by session id
    pub sessions: Arc<RwLock<HashMap<Uuid, CustomerSession>>>,
    /// Immutable hairstyle catalog, loaded at startup
    pub catalog: Arc<Catalog>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Analysis gateway client
    pub analysis: Arc<AnalysisClient>,
    /// Generation gateway client
    pub generation: Arc<GenerationClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last gateway error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: &LooksyConfig, catalog: Catalog, event_bus: EventBus) -> anyhow::Result<Self> {
        Ok(Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(catalog),
            event_bus,
            analysis: Arc::new(AnalysisClient::new(&config.ai)?),
            generation: Arc::new(GenerationClient::new(&config.ai)?),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    Router::new()
        // UI routes (HTML pages + embedded static assets)
        .merge(api::ui_routes())
        // JSON API routes
        .merge(api::session_routes())
        .merge(api::auth_routes())
        .merge(api::health_routes())
        .route("/events", get(api::sse::general_event_stream))
        .route("/api/session/:session_id/events", get(api::session_event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
