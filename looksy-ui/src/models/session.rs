//! Customer session state machine
//!
//! A session walks the four-step workflow Upload → Analyzing → Gallery →
//! Preview, with reset available from any step. Gateway failures keep the
//! session on its current step with a recorded error and a retry path;
//! collected input (photos, selection) is never discarded by a failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ingest::EncodedPhoto;

/// The six fixed photo-capture positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSlot {
    Front,
    Top,
    Left,
    Right,
    Back,
    Closeup,
}

impl PhotoSlot {
    /// All slots in display order
    pub const ALL: [PhotoSlot; 6] = [
        PhotoSlot::Front,
        PhotoSlot::Top,
        PhotoSlot::Left,
        PhotoSlot::Right,
        PhotoSlot::Back,
        PhotoSlot::Closeup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoSlot::Front => "front",
            PhotoSlot::Top => "top",
            PhotoSlot::Left => "left",
            PhotoSlot::Right => "right",
            PhotoSlot::Back => "back",
            PhotoSlot::Closeup => "closeup",
        }
    }

    /// Capture guidance shown in the upload grid
    pub fn label(&self) -> &'static str {
        match self {
            PhotoSlot::Front => "Front Face",
            PhotoSlot::Top => "Top View",
            PhotoSlot::Left => "Left Side",
            PhotoSlot::Right => "Right Side",
            PhotoSlot::Back => "Back View",
            PhotoSlot::Closeup => "Hair Close-up",
        }
    }
}

impl std::str::FromStr for PhotoSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(PhotoSlot::Front),
            "top" => Ok(PhotoSlot::Top),
            "left" => Ok(PhotoSlot::Left),
            "right" => Ok(PhotoSlot::Right),
            "back" => Ok(PhotoSlot::Back),
            "closeup" => Ok(PhotoSlot::Closeup),
            other => Err(format!("unknown photo slot: {}", other)),
        }
    }
}

impl std::fmt::Display for PhotoSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-arity photo record — the slot set is closed, so this is a struct
/// of six optional fields rather than an open-ended map.
#[derive(Debug, Clone, Default)]
pub struct SessionPhotos {
    pub front: Option<EncodedPhoto>,
    pub top: Option<EncodedPhoto>,
    pub left: Option<EncodedPhoto>,
    pub right: Option<EncodedPhoto>,
    pub back: Option<EncodedPhoto>,
    pub closeup: Option<EncodedPhoto>,
}

impl SessionPhotos {
    pub fn get(&self, slot: PhotoSlot) -> Option<&EncodedPhoto> {
        match slot {
            PhotoSlot::Front => self.front.as_ref(),
            PhotoSlot::Top => self.top.as_ref(),
            PhotoSlot::Left => self.left.as_ref(),
            PhotoSlot::Right => self.right.as_ref(),
            PhotoSlot::Back => self.back.as_ref(),
            PhotoSlot::Closeup => self.closeup.as_ref(),
        }
    }

    pub fn set(&mut self, slot: PhotoSlot, photo: Option<EncodedPhoto>) {
        match slot {
            PhotoSlot::Front => self.front = photo,
            PhotoSlot::Top => self.top = photo,
            PhotoSlot::Left => self.left = photo,
            PhotoSlot::Right => self.right = photo,
            PhotoSlot::Back => self.back = photo,
            PhotoSlot::Closeup => self.closeup = photo,
        }
    }

    /// Number of filled slots
    pub fn uploaded_count(&self) -> usize {
        PhotoSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }

    pub fn all_uploaded(&self) -> bool {
        self.uploaded_count() == PhotoSlot::ALL.len()
    }
}

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStep {
    /// Collecting the six photos
    Upload,
    /// Analysis gateway call outstanding or failed-awaiting-retry
    Analyzing,
    /// Analysis stored; browsing the eligibility partition
    Gallery,
    /// Style selected; generation outstanding, failed, or displayed
    Preview,
}

impl std::fmt::Display for SessionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStep::Upload => write!(f, "upload"),
            SessionStep::Analyzing => write!(f, "analyzing"),
            SessionStep::Gallery => write!(f, "gallery"),
            SessionStep::Preview => write!(f, "preview"),
        }
    }
}

/// Generated preview stored on the session after a successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPreview {
    /// Generated image (data URI or URL, as returned by the service)
    pub image: String,
    /// Narrative explanation from the AI
    pub explanation: String,
    /// Suitability score in [3.5, 5.0] (server-synthesized, treated as opaque)
    pub suitability_score: f64,
}

/// Session transition guard violations
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("all 6 photos are required, have {uploaded}")]
    PhotosIncomplete { uploaded: usize },

    #[error("action '{action}' not available on step '{step}'")]
    WrongStep {
        action: &'static str,
        step: SessionStep,
    },

    #[error("a gateway call is already in flight for this session")]
    GatewayBusy,

    #[error("front photo is required for preview generation")]
    MissingFrontPhoto,

    #[error("hair analysis has not completed")]
    MissingAnalysis,

    #[error("no hairstyle selected")]
    MissingSelection,
}

/// One customer's visit through the four-step workflow
///
/// Exclusively owned by the registry entry that holds it; gateway tasks
/// receive cloned snapshots of the fields they need and write results back
/// by session id.
#[derive(Debug, Clone)]
pub struct CustomerSession {
    pub id: Uuid,
    pub step: SessionStep,
    pub photos: SessionPhotos,
    pub analysis: Option<crate::models::HairProfile>,
    /// Catalog id of the chosen style
    pub selected_style: Option<String>,
    pub generated_preview: Option<GeneratedPreview>,
    /// User-facing message of the most recent gateway failure on this step
    pub last_error: Option<String>,
    /// True while a gateway call is outstanding for this session
    pub gateway_in_flight: bool,
    pub created_at: DateTime<Utc>,
}

impl CustomerSession {
    /// Create a fresh session at the upload step
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: SessionStep::Upload,
            photos: SessionPhotos::default(),
            analysis: None,
            selected_style: None,
            generated_preview: None,
            last_error: None,
            gateway_in_flight: false,
            created_at: Utc::now(),
        }
    }

    pub fn uploaded_count(&self) -> usize {
        self.photos.uploaded_count()
    }

    pub fn all_photos_uploaded(&self) -> bool {
        self.photos.all_uploaded()
    }

    /// Assign a photo to a slot (upload step only)
    pub fn assign_photo(&mut self, slot: PhotoSlot, photo: EncodedPhoto) -> Result<(), SessionError> {
        if self.step != SessionStep::Upload {
            return Err(SessionError::WrongStep {
                action: "assign photo",
                step: self.step,
            });
        }
        self.photos.set(slot, Some(photo));
        Ok(())
    }

    /// Remove a photo from a slot (upload step only)
    pub fn remove_photo(&mut self, slot: PhotoSlot) -> Result<(), SessionError> {
        if self.step != SessionStep::Upload {
            return Err(SessionError::WrongStep {
                action: "remove photo",
                step: self.step,
            });
        }
        self.photos.set(slot, None);
        Ok(())
    }

    /// Enter the analyzing step, or retry a failed analysis in place
    ///
    /// The 6/6 upload count is the sole guard on Upload → Analyzing.
    pub fn begin_analysis(&mut self) -> Result<(), SessionError> {
        match self.step {
            SessionStep::Upload | SessionStep::Analyzing => {}
            step => {
                return Err(SessionError::WrongStep {
                    action: "begin analysis",
                    step,
                })
            }
        }
        if self.gateway_in_flight {
            return Err(SessionError::GatewayBusy);
        }
        if !self.all_photos_uploaded() {
            return Err(SessionError::PhotosIncomplete {
                uploaded: self.uploaded_count(),
            });
        }
        self.step = SessionStep::Analyzing;
        self.last_error = None;
        self.gateway_in_flight = true;
        Ok(())
    }

    /// Store the analysis result and move to the gallery step
    pub fn complete_analysis(
        &mut self,
        profile: crate::models::HairProfile,
    ) -> Result<(), SessionError> {
        if self.step != SessionStep::Analyzing {
            return Err(SessionError::WrongStep {
                action: "complete analysis",
                step: self.step,
            });
        }
        self.analysis = Some(profile);
        self.step = SessionStep::Gallery;
        self.last_error = None;
        self.gateway_in_flight = false;
        Ok(())
    }

    /// Record an analysis failure; the session stays on the analyzing step
    /// and keeps every uploaded photo, so retry needs no re-upload.
    pub fn fail_analysis(&mut self, message: String) -> Result<(), SessionError> {
        if self.step != SessionStep::Analyzing {
            return Err(SessionError::WrongStep {
                action: "fail analysis",
                step: self.step,
            });
        }
        self.last_error = Some(message);
        self.gateway_in_flight = false;
        Ok(())
    }

    /// Choose a style from the gallery; clears any stale preview from an
    /// earlier attempt and moves to the preview step.
    pub fn select_style(&mut self, style_id: String) -> Result<(), SessionError> {
        if self.step != SessionStep::Gallery {
            return Err(SessionError::WrongStep {
                action: "select style",
                step: self.step,
            });
        }
        if self.analysis.is_none() {
            return Err(SessionError::MissingAnalysis);
        }
        self.selected_style = Some(style_id);
        self.generated_preview = None;
        self.last_error = None;
        self.step = SessionStep::Preview;
        Ok(())
    }

    /// Start (or retry) preview generation
    pub fn begin_generation(&mut self) -> Result<(), SessionError> {
        if self.step != SessionStep::Preview {
            return Err(SessionError::WrongStep {
                action: "begin generation",
                step: self.step,
            });
        }
        if self.gateway_in_flight {
            return Err(SessionError::GatewayBusy);
        }
        if self.selected_style.is_none() {
            return Err(SessionError::MissingSelection);
        }
        if self.photos.front.is_none() {
            return Err(SessionError::MissingFrontPhoto);
        }
        self.last_error = None;
        self.gateway_in_flight = true;
        Ok(())
    }

    /// Store a generated preview
    pub fn complete_generation(&mut self, preview: GeneratedPreview) -> Result<(), SessionError> {
        if self.step != SessionStep::Preview {
            return Err(SessionError::WrongStep {
                action: "complete generation",
                step: self.step,
            });
        }
        self.generated_preview = Some(preview);
        self.last_error = None;
        self.gateway_in_flight = false;
        Ok(())
    }

    /// Record a generation failure; selection and photos stay intact so the
    /// customer can retry with identical inputs or go back to the gallery.
    pub fn fail_generation(&mut self, message: String) -> Result<(), SessionError> {
        if self.step != SessionStep::Preview {
            return Err(SessionError::WrongStep {
                action: "fail generation",
                step: self.step,
            });
        }
        self.last_error = Some(message);
        self.gateway_in_flight = false;
        Ok(())
    }

    /// Return from preview to the gallery; the stale preview is dropped but
    /// the selection survives for a later retry.
    pub fn back_to_gallery(&mut self) -> Result<(), SessionError> {
        if self.step != SessionStep::Preview {
            return Err(SessionError::WrongStep {
                action: "back to gallery",
                step: self.step,
            });
        }
        if self.gateway_in_flight {
            return Err(SessionError::GatewayBusy);
        }
        self.generated_preview = None;
        self.step = SessionStep::Gallery;
        Ok(())
    }
}

impl Default for CustomerSession {
    fn default() -> Self {
        Self::new()
    }
}
