//! Server-Sent Events (SSE) for session progress streaming
//!
//! One stream per session: the browser subscribes after creating its
//! session and receives analysis/generation progress for that session only.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::AppState;
use looksy_common::events::LooksyEvent;

/// GET /events - heartbeat-only stream for connection status monitoring
pub async fn general_event_stream(
    State(_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    looksy_common::sse::create_heartbeat_sse_stream("looksy-ui")
}

/// Does this event belong on the stream for `session_id`?
///
/// Reset events are matched on the old id too, so a dashboard listening on
/// a superseded session learns about its replacement.
fn belongs_to(event: &LooksyEvent, session_id: Uuid) -> bool {
    if event.session_id() == session_id {
        return true;
    }
    matches!(event, LooksyEvent::SessionReset { old_session_id, .. } if *old_session_id == session_id)
}

/// GET /api/session/{id}/events - SSE event stream for one session
///
/// Streams events:
/// - AnalysisStarted / AnalysisStep / AnalysisCompleted / AnalysisFailed
/// - GenerationStarted / GenerationCompleted / GenerationFailed
/// - SessionReset
pub async fn session_event_stream(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(session_id = %session_id, "New SSE client connected to session events");

    let mut rx = state.event_bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default().event("ConnectionStatus").data("connected"));

        loop {
            tokio::select! {
                // Heartbeat every 15 seconds
                _ = tokio::time::sleep(Duration::from_secs(15)) => {
                    debug!("SSE: Sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }

                event = rx.recv() => {
                    match event {
                        Ok(event) if belongs_to(&event, session_id) => {
                            match serde_json::to_string(&event) {
                                Ok(json) => {
                                    yield Ok(Event::default()
                                        .event(event.event_type())
                                        .data(json));
                                }
                                Err(e) => {
                                    warn!(error = %e, "SSE: Failed to serialize event");
                                }
                            }
                        }
                        Ok(_) => {} // another session's event, skip
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "SSE: Subscriber lagged; events dropped");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            debug!("SSE: Event bus closed; ending stream");
                            break;
                        }
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
