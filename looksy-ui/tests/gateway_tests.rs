//! Gateway status-code and failure mapping
//!
//! Each test spawns a local stub server standing in for the remote AI
//! service and checks that the client normalizes the outcome into the
//! expected error kind and user-facing message.

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use looksy_common::config::AiServiceConfig;
use looksy_ui::catalog::Catalog;
use looksy_ui::ingest::EncodedPhoto;
use looksy_ui::models::session::{PhotoSlot, SessionPhotos};
use looksy_ui::services::analysis_client::ANALYSIS_FAILED_MESSAGE;
use looksy_ui::services::generation_client::GENERATION_FAILED_MESSAGE;
use looksy_ui::services::{AnalysisClient, GatewayError, GenerationClient};

/// Spawn a stub AI service and return its base URL
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn stub_config(base_url: String) -> AiServiceConfig {
    AiServiceConfig {
        base_url,
        api_key: String::new(),
        timeout_secs: 5,
    }
}

/// Stub that always answers `status` with `body` on the given path
fn canned(path: &str, status: StatusCode, body: Value) -> Router {
    Router::new().route(
        path,
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    )
}

fn full_photo_set() -> SessionPhotos {
    let mut photos = SessionPhotos::default();
    for slot in PhotoSlot::ALL {
        photos.set(
            slot,
            Some(EncodedPhoto {
                data_uri: format!("data:image/jpeg;base64,{}", slot.as_str()),
                dimensions: Some((640, 480)),
                fallback: false,
            }),
        );
    }
    photos
}

fn analysis_body() -> Value {
    json!({
        "analysis": {
            "hairType": "wavy",
            "hairLength": "medium",
            "hairColor": "dark brown",
            "hairDensity": "medium",
            "hairThickness": "medium",
            "scalpVisibility": "partially_visible",
            "hairlineCondition": "normal",
            "overallScore": 4.2
        }
    })
}

#[tokio::test]
async fn analysis_success_parses_profile() {
    let base = spawn_stub(canned("/analyze-hair", StatusCode::OK, analysis_body())).await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let profile = client.analyze(&full_photo_set()).await.unwrap();
    assert_eq!(profile.hair_color, "dark brown");
    assert_eq!(profile.overall_score, 4.2);
}

#[tokio::test]
async fn analysis_http_429_maps_to_rate_limit_message() {
    let base = spawn_stub(canned(
        "/analyze-hair",
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": "Rate limit exceeded. Please try again in a moment."}),
    ))
    .await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    assert!(matches!(err, GatewayError::RateLimited));
    assert_eq!(
        err.user_message(ANALYSIS_FAILED_MESSAGE),
        "Rate limit exceeded. Please try again in a moment."
    );
}

#[tokio::test]
async fn analysis_http_402_maps_to_credits_message() {
    let base = spawn_stub(canned(
        "/analyze-hair",
        StatusCode::PAYMENT_REQUIRED,
        json!({"error": "AI credits exhausted. Please add credits to continue."}),
    ))
    .await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    assert!(matches!(err, GatewayError::QuotaExhausted));
    assert_eq!(
        err.user_message(ANALYSIS_FAILED_MESSAGE),
        "AI credits exhausted. Please add credits to continue."
    );
}

#[tokio::test]
async fn analysis_other_non_2xx_maps_to_generic_message() {
    let base = spawn_stub(canned(
        "/analyze-hair",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "backend exploded"}),
    ))
    .await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    match &err {
        GatewayError::Service { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "backend exploded");
        }
        other => panic!("expected Service, got {:?}", other),
    }
    assert_eq!(err.user_message(ANALYSIS_FAILED_MESSAGE), ANALYSIS_FAILED_MESSAGE);
}

#[tokio::test]
async fn analysis_2xx_without_payload_is_empty_result() {
    let base = spawn_stub(canned("/analyze-hair", StatusCode::OK, json!({"ok": true}))).await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResult(_)));
    assert_eq!(
        err.user_message(ANALYSIS_FAILED_MESSAGE),
        "AI did not return structured analysis. Please try again."
    );
}

#[tokio::test]
async fn analysis_out_of_range_score_is_rejected() {
    let mut body = analysis_body();
    body["analysis"]["overallScore"] = json!(9.0);
    let base = spawn_stub(canned("/analyze-hair", StatusCode::OK, body)).await;
    let client = AnalysisClient::new(&stub_config(base)).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Service { .. }));
}

#[tokio::test]
async fn analysis_unreachable_service_maps_to_transport_message() {
    // Nothing is listening on this port
    let client = AnalysisClient::new(&stub_config("http://127.0.0.1:9".to_string())).unwrap();

    let err = client.analyze(&full_photo_set()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(
        err.user_message(ANALYSIS_FAILED_MESSAGE),
        "Could not reach the AI service. Try reducing photo sizes and retry."
    );
}

#[tokio::test]
async fn analysis_incomplete_photos_never_hit_the_network() {
    // Unreachable endpoint: if validation leaked into a request this would
    // surface as Transport, not Validation
    let client = AnalysisClient::new(&stub_config("http://127.0.0.1:9".to_string())).unwrap();

    let mut photos = full_photo_set();
    photos.set(PhotoSlot::Back, None);

    let err = client.analyze(&photos).await.unwrap_err();
    match err {
        GatewayError::Validation(msg) => assert!(msg.contains("back")),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn generation_success_parses_preview() {
    let base = spawn_stub(canned(
        "/generate-hairstyle",
        StatusCode::OK,
        json!({
            "generatedImage": "data:image/png;base64,xyz",
            "aiExplanation": "Clean lines suit the face shape.",
            "suitabilityScore": 4.6
        }),
    ))
    .await;
    let client = GenerationClient::new(&stub_config(base)).unwrap();
    let catalog = Catalog::load().unwrap();

    let preview = client
        .generate("data:image/jpeg;base64,front", catalog.get("buzz-cut").unwrap())
        .await
        .unwrap();
    assert_eq!(preview.image, "data:image/png;base64,xyz");
    assert_eq!(preview.explanation, "Clean lines suit the face shape.");
    assert!((3.5..=5.0).contains(&preview.suitability_score));
}

#[tokio::test]
async fn generation_missing_explanation_gets_default_text() {
    let base = spawn_stub(canned(
        "/generate-hairstyle",
        StatusCode::OK,
        json!({
            "generatedImage": "data:image/png;base64,xyz",
            "suitabilityScore": 3.9
        }),
    ))
    .await;
    let client = GenerationClient::new(&stub_config(base)).unwrap();
    let catalog = Catalog::load().unwrap();

    let preview = client
        .generate("data:image/jpeg;base64,front", catalog.get("buzz-cut").unwrap())
        .await
        .unwrap();
    assert_eq!(
        preview.explanation,
        "The Buzz Cut has been applied to your photo."
    );
}

#[tokio::test]
async fn generation_missing_image_is_empty_result() {
    let base = spawn_stub(canned(
        "/generate-hairstyle",
        StatusCode::OK,
        json!({"aiExplanation": "text only", "suitabilityScore": 4.0}),
    ))
    .await;
    let client = GenerationClient::new(&stub_config(base)).unwrap();
    let catalog = Catalog::load().unwrap();

    let err = client
        .generate("data:image/jpeg;base64,front", catalog.get("buzz-cut").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResult(_)));
    assert_eq!(
        err.user_message(GENERATION_FAILED_MESSAGE),
        "No image was generated. Please try again."
    );
}

#[tokio::test]
async fn generation_http_429_maps_to_rate_limit_message() {
    let base = spawn_stub(canned(
        "/generate-hairstyle",
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": "Rate limit exceeded. Please try again in a moment."}),
    ))
    .await;
    let client = GenerationClient::new(&stub_config(base)).unwrap();
    let catalog = Catalog::load().unwrap();

    let err = client
        .generate("data:image/jpeg;base64,front", catalog.get("buzz-cut").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::RateLimited));
    assert_eq!(
        err.user_message(GENERATION_FAILED_MESSAGE),
        "Rate limit exceeded. Please try again in a moment."
    );
}
