//! Customer session API handlers
//!
//! The session registry is the single owner of workflow state; every
//! handler mutates it under the registry lock and returns a fresh snapshot.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    catalog::HairstyleRecord,
    eligibility,
    error::{ApiError, ApiResult},
    ingest,
    models::{
        session::{PhotoSlot, SessionStep},
        CustomerSession, GeneratedPreview, HairProfile,
    },
    workflow, AppState,
};
use looksy_common::events::LooksyEvent;

/// Per-slot uploaded flags (photo bytes stay server-side)
#[derive(Debug, Serialize)]
pub struct SlotStatus {
    pub front: bool,
    pub top: bool,
    pub left: bool,
    pub right: bool,
    pub back: bool,
    pub closeup: bool,
}

/// Session snapshot returned by every mutating handler
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub step: SessionStep,
    pub uploaded_count: usize,
    pub photos: SlotStatus,
    pub analysis: Option<HairProfile>,
    pub selected_style_id: Option<String>,
    pub generated_preview: Option<GeneratedPreview>,
    pub last_error: Option<String>,
    pub gateway_busy: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionResponse {
    fn from_session(session: &CustomerSession) -> Self {
        Self {
            session_id: session.id,
            step: session.step,
            uploaded_count: session.uploaded_count(),
            photos: SlotStatus {
                front: session.photos.front.is_some(),
                top: session.photos.top.is_some(),
                left: session.photos.left.is_some(),
                right: session.photos.right.is_some(),
                back: session.photos.back.is_some(),
                closeup: session.photos.closeup.is_some(),
            },
            analysis: session.analysis.clone(),
            selected_style_id: session.selected_style.clone(),
            generated_preview: session.generated_preview.clone(),
            last_error: session.last_error.clone(),
            gateway_busy: session.gateway_in_flight,
            created_at: session.created_at,
        }
    }
}

/// GET /api/session/{id}/gallery response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryResponse {
    pub analysis: HairProfile,
    pub eligible: Vec<HairstyleRecord>,
    pub ineligible: Vec<HairstyleRecord>,
}

/// POST /api/session/{id}/select request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStyleRequest {
    pub style_id: String,
}

/// POST /api/session
///
/// Create a fresh customer session at the upload step.
pub async fn create_session(State(state): State<AppState>) -> ApiResult<Json<SessionResponse>> {
    let session = CustomerSession::new();
    let response = SessionResponse::from_session(&session);

    state.sessions.write().await.insert(session.id, session);

    state
        .event_bus
        .emit(LooksyEvent::SessionCreated {
            session_id: response.session_id,
            timestamp: Utc::now(),
        })
        .ok();

    tracing::info!(session_id = %response.session_id, "Customer session created");
    Ok(Json(response))
}

/// GET /api/session/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    Ok(Json(SessionResponse::from_session(session)))
}

fn parse_slot(slot: &str) -> Result<PhotoSlot, ApiError> {
    slot.parse::<PhotoSlot>().map_err(ApiError::BadRequest)
}

/// PUT /api/session/{id}/photos/{slot}
///
/// Upload raw image bytes for one slot. Ingestion (bounded resize +
/// re-encode, lossless fallback) runs before the photo is stored.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path((session_id, slot)): Path<(Uuid, String)>,
    body: Bytes,
) -> ApiResult<Json<SessionResponse>> {
    let slot = parse_slot(&slot)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty upload body".to_string()));
    }

    let photo = ingest::ingest(&body)?;
    tracing::debug!(
        session_id = %session_id,
        slot = %slot,
        fallback = photo.fallback,
        "Photo ingested"
    );

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    session.assign_photo(slot, photo)?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// DELETE /api/session/{id}/photos/{slot}
pub async fn remove_photo(
    State(state): State<AppState>,
    Path((session_id, slot)): Path<(Uuid, String)>,
) -> ApiResult<Json<SessionResponse>> {
    let slot = parse_slot(&slot)?;

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    session.remove_photo(slot)?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// POST /api/session/{id}/analyze
///
/// Submit for analysis (guarded by 6/6 uploaded); also the retry entry
/// point after a failed analysis.
pub async fn submit_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    workflow::start_analysis(&state, session_id).await?;

    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// GET /api/session/{id}/gallery
///
/// The eligible/ineligible partition for the analyzed profile, in catalog
/// order.
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<GalleryResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

    let analysis = session
        .analysis
        .clone()
        .ok_or_else(|| ApiError::BadRequest("hair analysis has not completed".to_string()))?;

    let split = eligibility::partition(
        &state.catalog,
        analysis.hair_type,
        analysis.hair_length,
        analysis.hair_density,
    );

    Ok(Json(GalleryResponse {
        analysis,
        eligible: split.eligible.into_iter().cloned().collect(),
        ineligible: split.ineligible.into_iter().cloned().collect(),
    }))
}

/// POST /api/session/{id}/select
///
/// Choose a style from the gallery and kick off preview generation.
pub async fn select_style(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectStyleRequest>,
) -> ApiResult<Json<SessionResponse>> {
    if state.catalog.get(&request.style_id).is_none() {
        return Err(ApiError::NotFound(format!(
            "Hairstyle not found: {}",
            request.style_id
        )));
    }

    {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
        session.select_style(request.style_id)?;
    }

    workflow::start_generation(&state, session_id).await?;

    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// POST /api/session/{id}/generate
///
/// Retry preview generation with the same front photo and selection.
pub async fn retry_generation(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    workflow::start_generation(&state, session_id).await?;

    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// POST /api/session/{id}/back
///
/// Preview → Gallery: drops the stale preview, keeps the selection.
pub async fn back_to_gallery(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
    session.back_to_gallery()?;
    Ok(Json(SessionResponse::from_session(session)))
}

/// POST /api/session/{id}/reset
///
/// Discard the session and hand back a brand-new one (new id, all slots
/// empty). A still-outstanding gateway call for the old id settles into
/// nothing — its registry entry is gone.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let mut sessions = state.sessions.write().await;
    if sessions.remove(&session_id).is_none() {
        return Err(ApiError::NotFound(format!("Session not found: {}", session_id)));
    }

    let fresh = CustomerSession::new();
    let response = SessionResponse::from_session(&fresh);
    sessions.insert(fresh.id, fresh);

    state
        .event_bus
        .emit(LooksyEvent::SessionReset {
            old_session_id: session_id,
            session_id: response.session_id,
            timestamp: Utc::now(),
        })
        .ok();

    tracing::info!(
        old_session_id = %session_id,
        session_id = %response.session_id,
        "Session reset"
    );
    Ok(Json(response))
}

/// Build session workflow routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", post(create_session))
        .route("/api/session/:session_id", get(get_session))
        .route("/api/session/:session_id/photos/:slot", put(upload_photo))
        .route("/api/session/:session_id/photos/:slot", delete(remove_photo))
        .route("/api/session/:session_id/analyze", post(submit_analysis))
        .route("/api/session/:session_id/gallery", get(get_gallery))
        .route("/api/session/:session_id/select", post(select_style))
        .route("/api/session/:session_id/generate", post(retry_generation))
        .route("/api/session/:session_id/back", post(back_to_gallery))
        .route("/api/session/:session_id/reset", post(reset_session))
}
