//! Generation gateway client
//!
//! Single-shot request to the style-transfer function: front photo in,
//! composited preview plus narrative explanation and suitability score out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{authorize, build_http_client, error_from_response, GatewayError};
use crate::catalog::HairstyleRecord;
use crate::models::GeneratedPreview;
use looksy_common::config::AiServiceConfig;

/// Generic user-facing message for unclassified generation failures
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate hairstyle preview";

const EMPTY_GENERATION_MESSAGE: &str = "No image was generated. Please try again.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    front_photo: String,
    hairstyle_name: String,
    hairstyle_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    generated_image: Option<String>,
    ai_explanation: Option<String>,
    suitability_score: Option<f64>,
}

/// Generation gateway client
pub struct GenerationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GenerationClient {
    pub fn new(config: &AiServiceConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Render the selected style onto the customer's front photo.
    ///
    /// Inputs are a read-only snapshot; on failure no partial result is
    /// returned and no session state is touched by this client.
    pub async fn generate(
        &self,
        front_photo: &str,
        style: &HairstyleRecord,
    ) -> Result<GeneratedPreview, GatewayError> {
        if front_photo.is_empty() {
            return Err(GatewayError::Validation(
                "Front photo is required for preview generation".to_string(),
            ));
        }
        if style.name.is_empty() {
            return Err(GatewayError::Validation(
                "Hairstyle name is required for preview generation".to_string(),
            ));
        }

        let url = format!("{}/generate-hairstyle", self.base_url);
        debug!(url = %url, style = %style.name, "Requesting hairstyle preview");

        let response = authorize(self.http_client.post(&url), &self.api_key)
            .json(&GenerateRequest {
                front_photo: front_photo.to_string(),
                hairstyle_name: style.name.clone(),
                hairstyle_description: style.description.clone(),
            })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: GenerateResponse = response.json().await.map_err(|e| GatewayError::Service {
            status: status.as_u16(),
            message: format!("malformed response: {}", e),
        })?;

        let image = body
            .generated_image
            .ok_or_else(|| GatewayError::EmptyResult(EMPTY_GENERATION_MESSAGE.to_string()))?;

        let suitability_score = body.suitability_score.ok_or_else(|| GatewayError::Service {
            status: status.as_u16(),
            message: "malformed response: missing suitabilityScore".to_string(),
        })?;

        let explanation = body
            .ai_explanation
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| {
                format!("The {} has been applied to your photo.", style.name)
            });

        info!(style = %style.name, suitability_score, "Hairstyle preview received");

        Ok(GeneratedPreview {
            image,
            explanation,
            suitability_score,
        })
    }
}
