//! Session workflow orchestration
//!
//! API handlers call `start_analysis` / `start_generation`, which apply the
//! state-machine guard under the registry lock, snapshot the inputs, and
//! spawn a background task for the gateway call. Results are written back
//! by session id; if the session was reset meanwhile the id is gone from
//! the registry and the settled result is dropped, which is how a
//! superseded call is ignored.

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::session::SessionPhotos;
use crate::services::analysis_client::ANALYSIS_FAILED_MESSAGE;
use crate::services::generation_client::GENERATION_FAILED_MESSAGE;
use crate::AppState;
use looksy_common::events::LooksyEvent;

/// Cosmetic analysis progress sequence: (label, display duration ms).
/// Purely presentational — the Analyzing → Gallery transition is driven by
/// the gateway result, never by this sequence.
pub const ANALYSIS_STEPS: [(&str, u64); 5] = [
    ("Detecting face and hair region", 1500),
    ("Analyzing hair type and texture", 2000),
    ("Measuring hair density", 1500),
    ("Evaluating hairline condition", 1500),
    ("Matching suitable hairstyles", 2000),
];

/// Minimum time the analyzing indicator is shown before the session is
/// allowed to leave the analyzing step, even when the gateway answers
/// faster. The real result alone decides success or failure.
pub const MIN_ANALYSIS_DISPLAY: Duration = Duration::from_millis(1500);

/// Guard the transition into Analyzing and spawn the analysis task.
///
/// Returns 409 while a gateway call is already outstanding for the session
/// (one call in flight per session, retries wait for settlement).
pub async fn start_analysis(state: &AppState, session_id: Uuid) -> Result<(), ApiError> {
    let photos = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
        session.begin_analysis()?;
        session.photos.clone()
    };

    state
        .event_bus
        .emit(LooksyEvent::AnalysisStarted {
            session_id,
            timestamp: Utc::now(),
        })
        .ok();

    info!(session_id = %session_id, "Hair analysis started");

    let task_state = state.clone();
    tokio::spawn(async move {
        run_analysis_task(task_state, session_id, photos).await;
    });

    Ok(())
}

/// Background analysis task: cosmetic ticker + minimum display time joined
/// with the real gateway call; write-back under the registry lock.
async fn run_analysis_task(state: AppState, session_id: Uuid, photos: SessionPhotos) {
    let ticker = tokio::spawn(run_analysis_ticker(state.clone(), session_id));

    let (result, _) = tokio::join!(
        state.analysis.analyze(&photos),
        tokio::time::sleep(MIN_ANALYSIS_DISPLAY)
    );

    ticker.abort();

    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        debug!(session_id = %session_id, "Session superseded; dropping analysis result");
        return;
    };

    match result {
        Ok(profile) => {
            if let Err(e) = session.complete_analysis(profile) {
                error!(session_id = %session_id, error = %e, "Analysis result rejected by session");
                return;
            }
            info!(session_id = %session_id, "Hair analysis completed");
            state
                .event_bus
                .emit(LooksyEvent::AnalysisCompleted {
                    session_id,
                    timestamp: Utc::now(),
                })
                .ok();
        }
        Err(e) => {
            let message = e.user_message(ANALYSIS_FAILED_MESSAGE);
            error!(session_id = %session_id, error = %e, "Hair analysis failed");
            *state.last_error.write().await = Some(message.clone());
            if let Err(e) = session.fail_analysis(message.clone()) {
                error!(session_id = %session_id, error = %e, "Analysis failure rejected by session");
                return;
            }
            state
                .event_bus
                .emit(LooksyEvent::AnalysisFailed {
                    session_id,
                    message,
                    timestamp: Utc::now(),
                })
                .ok();
        }
    }
}

/// Timer-driven cosmetic progress sequence, aborted when the real result
/// settles. Runs independently of the gateway call.
async fn run_analysis_ticker(state: AppState, session_id: Uuid) {
    let total = ANALYSIS_STEPS.len();
    for (index, (label, duration_ms)) in ANALYSIS_STEPS.iter().enumerate() {
        state
            .event_bus
            .emit(LooksyEvent::AnalysisStep {
                session_id,
                label: label.to_string(),
                index,
                total,
                timestamp: Utc::now(),
            })
            .ok();
        tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
    }
}

/// Guard the generation start (or retry) and spawn the generation task.
pub async fn start_generation(state: &AppState, session_id: Uuid) -> Result<(), ApiError> {
    let (front_photo, style) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;
        session.begin_generation()?;

        // begin_generation guarantees selection and front photo; the catalog
        // lookup is the one resolution that can still miss. Release the
        // in-flight flag on any of these paths so the session never wedges.
        let style_id = session.selected_style.clone().unwrap_or_default();
        let style = match state.catalog.get(&style_id) {
            Some(style) => style.clone(),
            None => {
                session.gateway_in_flight = false;
                return Err(ApiError::Internal(format!(
                    "Selected style missing from catalog: {}",
                    style_id
                )));
            }
        };
        let front = session
            .photos
            .front
            .as_ref()
            .map(|photo| photo.data_uri.clone())
            .unwrap_or_default();
        (front, style)
    };

    state
        .event_bus
        .emit(LooksyEvent::GenerationStarted {
            session_id,
            style_name: style.name.clone(),
            timestamp: Utc::now(),
        })
        .ok();

    info!(session_id = %session_id, style = %style.name, "Preview generation started");

    let task_state = state.clone();
    tokio::spawn(async move {
        run_generation_task(task_state, session_id, front_photo, style).await;
    });

    Ok(())
}

async fn run_generation_task(
    state: AppState,
    session_id: Uuid,
    front_photo: String,
    style: crate::catalog::HairstyleRecord,
) {
    let result = state.generation.generate(&front_photo, &style).await;

    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        debug!(session_id = %session_id, "Session superseded; dropping generation result");
        return;
    };

    match result {
        Ok(preview) => {
            let score = preview.suitability_score;
            if let Err(e) = session.complete_generation(preview) {
                error!(session_id = %session_id, error = %e, "Generation result rejected by session");
                return;
            }
            info!(session_id = %session_id, suitability_score = score, "Preview generation completed");
            state
                .event_bus
                .emit(LooksyEvent::GenerationCompleted {
                    session_id,
                    suitability_score: score,
                    timestamp: Utc::now(),
                })
                .ok();
        }
        Err(e) => {
            let message = e.user_message(GENERATION_FAILED_MESSAGE);
            error!(session_id = %session_id, error = %e, "Preview generation failed");
            *state.last_error.write().await = Some(message.clone());
            if let Err(e) = session.fail_generation(message.clone()) {
                error!(session_id = %session_id, error = %e, "Generation failure rejected by session");
                return;
            }
            state
                .event_bus
                .emit(LooksyEvent::GenerationFailed {
                    session_id,
                    message,
                    timestamp: Utc::now(),
                })
                .ok();
        }
    }
}
