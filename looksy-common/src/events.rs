//! Event types for the Looksy session workflow
//!
//! Events are broadcast per-process on the [`EventBus`] and forwarded to
//! browser clients over SSE, filtered by session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Looksy event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LooksyEvent {
    /// New customer session created
    SessionCreated {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Hair analysis submitted to the AI service
    AnalysisStarted {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Cosmetic analysis progress step (presentational only — the real
    /// transition is driven by the gateway result, never by these)
    AnalysisStep {
        session_id: Uuid,
        label: String,
        index: usize,
        total: usize,
        timestamp: DateTime<Utc>,
    },

    /// Analysis result stored; session moved to the gallery step
    AnalysisCompleted {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Analysis failed; session remains on the analyzing step with a retry path
    AnalysisFailed {
        session_id: Uuid,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Preview generation submitted to the AI service
    GenerationStarted {
        session_id: Uuid,
        style_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Generated preview stored on the session
    GenerationCompleted {
        session_id: Uuid,
        suitability_score: f64,
        timestamp: DateTime<Utc>,
    },

    /// Generation failed; session remains on the preview step with a retry path
    GenerationFailed {
        session_id: Uuid,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Session discarded and replaced with a fresh one
    SessionReset {
        old_session_id: Uuid,
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl LooksyEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            LooksyEvent::SessionCreated { .. } => "SessionCreated",
            LooksyEvent::AnalysisStarted { .. } => "AnalysisStarted",
            LooksyEvent::AnalysisStep { .. } => "AnalysisStep",
            LooksyEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
            LooksyEvent::AnalysisFailed { .. } => "AnalysisFailed",
            LooksyEvent::GenerationStarted { .. } => "GenerationStarted",
            LooksyEvent::GenerationCompleted { .. } => "GenerationCompleted",
            LooksyEvent::GenerationFailed { .. } => "GenerationFailed",
            LooksyEvent::SessionReset { .. } => "SessionReset",
        }
    }

    /// Session this event belongs to (the new session id for resets)
    pub fn session_id(&self) -> Uuid {
        match self {
            LooksyEvent::SessionCreated { session_id, .. }
            | LooksyEvent::AnalysisStarted { session_id, .. }
            | LooksyEvent::AnalysisStep { session_id, .. }
            | LooksyEvent::AnalysisCompleted { session_id, .. }
            | LooksyEvent::AnalysisFailed { session_id, .. }
            | LooksyEvent::GenerationStarted { session_id, .. }
            | LooksyEvent::GenerationCompleted { session_id, .. }
            | LooksyEvent::GenerationFailed { session_id, .. }
            | LooksyEvent::SessionReset { session_id, .. } => *session_id,
        }
    }
}

/// Broadcast event bus for SSE streaming
///
/// Thin wrapper over `tokio::sync::broadcast`; slow subscribers may miss
/// events once the channel buffer wraps.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LooksyEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LooksyEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count, or an error if nobody is listening.
    /// An SSE-less session is a normal condition, so callers emit with
    /// `.ok()` and move on.
    pub fn emit(
        &self,
        event: LooksyEvent,
    ) -> Result<usize, broadcast::error::SendError<LooksyEvent>> {
        self.tx.send(event)
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
