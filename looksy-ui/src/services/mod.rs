//! Gateway clients for the remote AI service
//!
//! Both gateways share the same shape: validate input completeness locally
//! (no network call on incomplete input), issue one HTTP request, and
//! normalize every failure into a [`GatewayError`] with a user-facing
//! message. Callers never see a partial result on failure.

pub mod analysis_client;
pub mod generation_client;

pub use analysis_client::AnalysisClient;
pub use generation_client::GenerationClient;

use serde::Deserialize;
use thiserror::Error;

/// Gateway errors, normalized across both AI calls
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Input incomplete; resolved locally, no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote unreachable (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP 429 from the service
    #[error("Rate limit exceeded")]
    RateLimited,

    /// HTTP 402 from the service
    #[error("AI credits exhausted")]
    QuotaExhausted,

    /// Any other non-2xx status, or a malformed response body
    #[error("Service error {status}: {message}")]
    Service { status: u16, message: String },

    /// 2xx response that omitted the required structured payload
    #[error("Empty result: {0}")]
    EmptyResult(String),
}

impl GatewayError {
    /// User-facing message; `generic` covers plain service failures and is
    /// operation-specific ("Failed to analyze hair", ...).
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            GatewayError::RateLimited => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            GatewayError::QuotaExhausted => {
                "AI credits exhausted. Please add credits to continue.".to_string()
            }
            GatewayError::Transport(_) => {
                "Could not reach the AI service. Try reducing photo sizes and retry.".to_string()
            }
            GatewayError::Validation(msg) | GatewayError::EmptyResult(msg) => msg.clone(),
            GatewayError::Service { .. } => generic.to_string(),
        }
    }
}

/// Error body the service attaches to non-2xx responses
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
}

/// Map a non-2xx response to the matching GatewayError
pub(crate) async fn error_from_response(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    match status {
        429 => GatewayError::RateLimited,
        402 => GatewayError::QuotaExhausted,
        _ => {
            let message = match response.json::<ServiceErrorBody>().await {
                Ok(body) => body.error.unwrap_or_default(),
                Err(_) => String::new(),
            };
            GatewayError::Service { status, message }
        }
    }
}

/// Build the shared reqwest client for a gateway
pub(crate) fn build_http_client(
    timeout_secs: u64,
) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GatewayError::Transport(e.to_string()))
}

/// Attach the Authorization header when an API key is configured
pub(crate) fn authorize(
    request: reqwest::RequestBuilder,
    api_key: &str,
) -> reqwest::RequestBuilder {
    if api_key.is_empty() {
        request
    } else {
        request.bearer_auth(api_key)
    }
}
