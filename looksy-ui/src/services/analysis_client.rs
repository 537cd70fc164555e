//! Analysis gateway client
//!
//! Single-shot request to the hair classification function. Input
//! completeness (all six photo slots) is validated before any network I/O.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{authorize, build_http_client, error_from_response, GatewayError};
use crate::models::session::{PhotoSlot, SessionPhotos};
use crate::models::HairProfile;
use looksy_common::config::AiServiceConfig;

/// Generic user-facing message for unclassified analysis failures
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze hair";

const EMPTY_ANALYSIS_MESSAGE: &str = "AI did not return structured analysis. Please try again.";

/// Request body: the six encoded photos keyed by slot
#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    photos: PhotoPayload,
}

#[derive(Debug, Serialize)]
struct PhotoPayload {
    front: String,
    top: String,
    left: String,
    right: String,
    back: String,
    closeup: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis: Option<HairProfile>,
}

/// Analysis gateway client
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnalysisClient {
    pub fn new(config: &AiServiceConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Classify hair attributes from the six session photos.
    ///
    /// The photos are a read-only snapshot; the result is returned by value
    /// and never written into any session by this client.
    pub async fn analyze(&self, photos: &SessionPhotos) -> Result<HairProfile, GatewayError> {
        let payload = Self::build_payload(photos)?;
        let url = format!("{}/analyze-hair", self.base_url);

        debug!(url = %url, "Submitting photos for hair analysis");

        let response = authorize(self.http_client.post(&url), &self.api_key)
            .json(&AnalyzeRequest { photos: payload })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: AnalyzeResponse = response.json().await.map_err(|e| GatewayError::Service {
            status: status.as_u16(),
            message: format!("malformed response: {}", e),
        })?;

        let profile = body
            .analysis
            .ok_or_else(|| GatewayError::EmptyResult(EMPTY_ANALYSIS_MESSAGE.to_string()))?;

        profile.validate().map_err(|e| GatewayError::Service {
            status: status.as_u16(),
            message: format!("invalid analysis: {}", e),
        })?;

        info!(
            hair_type = %profile.hair_type,
            hair_length = %profile.hair_length,
            hair_density = %profile.hair_density,
            "Hair analysis received"
        );

        Ok(profile)
    }

    /// Reject incomplete input locally — no network call is attempted
    fn build_payload(photos: &SessionPhotos) -> Result<PhotoPayload, GatewayError> {
        let missing: Vec<&str> = PhotoSlot::ALL
            .iter()
            .filter(|slot| photos.get(**slot).is_none())
            .map(|slot| slot.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(GatewayError::Validation(format!(
                "All 6 photos are required; missing: {}",
                missing.join(", ")
            )));
        }

        let uri = |slot: PhotoSlot| photos.get(slot).map(|p| p.data_uri.clone()).unwrap_or_default();
        Ok(PhotoPayload {
            front: uri(PhotoSlot::Front),
            top: uri(PhotoSlot::Top),
            left: uri(PhotoSlot::Left),
            right: uri(PhotoSlot::Right),
            back: uri(PhotoSlot::Back),
            closeup: uri(PhotoSlot::Closeup),
        })
    }
}
