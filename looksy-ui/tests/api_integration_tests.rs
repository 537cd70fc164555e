//! API integration tests
//!
//! Drives the full four-step workflow through the real router with a local
//! stub standing in for the remote AI service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{routing::post, Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt;

use looksy_common::config::{AiServiceConfig, LooksyConfig};
use looksy_common::events::EventBus;
use looksy_ui::catalog::Catalog;
use looksy_ui::{build_router, AppState};

/// Spawn a stub AI service and return its base URL
async fn spawn_ai_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Stub with a working analyze + generate pair
fn happy_ai_stub() -> Router {
    Router::new()
        .route(
            "/analyze-hair",
            post(|| async {
                Json(json!({
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
                }))
            }),
        )
        .route(
            "/generate-hairstyle",
            post(|| async {
                Json(json!({
                    "generatedImage": "data:image/png;base64,generated",
                    "aiExplanation": "Volume on top balances the profile.",
                    "suitabilityScore": 4.4
                }))
            }),
        )
}

/// Build the app router wired to the given AI stub base URL
async fn app(ai_base_url: String) -> Router {
    let config = LooksyConfig {
        ai: AiServiceConfig {
            base_url: ai_base_url,
            api_key: String::new(),
            timeout_secs: 5,
        },
        ..LooksyConfig::default()
    };
    let catalog = Catalog::load().unwrap();
    let state = AppState::new(&config, catalog, EventBus::new(100)).unwrap();
    build_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    send(app, request).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 48, image::Rgb([80, 50, 20]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn upload_photo(app: &Router, session_id: &str, slot: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/session/{}/photos/{}", session_id, slot))
        .header("content-type", "application/octet-stream")
        .body(Body::from(png_bytes()))
        .unwrap();
    send(app, request).await
}

async fn upload_all_photos(app: &Router, session_id: &str) {
    for slot in ["front", "top", "left", "right", "back", "closeup"] {
        let (status, _) = upload_photo(app, session_id, slot).await;
        assert_eq!(status, StatusCode::OK, "upload of {} failed", slot);
    }
}

/// Poll the session until `predicate` holds or the deadline passes
async fn wait_for_session(
    app: &Router,
    session_id: &str,
    predicate: impl Fn(&Value) -> bool,
) -> Value {
    for _ in 0..100 {
        let (status, session) = get_json(app, &format!("/api/session/{}", session_id)).await;
        assert_eq!(status, StatusCode::OK);
        if predicate(&session) {
            return session;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("session {} never reached the expected state", session_id);
}

#[tokio::test]
async fn create_session_starts_at_upload() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;

    let (status, session) = post_json(&app, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "upload");
    assert_eq!(session["uploadedCount"], 0);
    assert_eq!(session["analysis"], Value::Null);
    assert_eq!(session["generatedPreview"], Value::Null);
}

#[tokio::test]
async fn analyze_is_guarded_by_six_of_six() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    // Five of six: submit has no effect
    for slot in ["front", "top", "left", "right", "back"] {
        upload_photo(&app, &id, slot).await;
    }
    let (status, body) = post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("6 photos"));

    let (_, session) = get_json(&app, &format!("/api/session/{}", id)).await;
    assert_eq!(session["step"], "upload");

    // Fill the sixth: submit transitions to analyzing
    upload_photo(&app, &id, "closeup").await;
    let (status, session) = post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "analyzing");
    assert_eq!(session["gatewayBusy"], true);
}

#[tokio::test]
async fn full_workflow_upload_analyze_select_preview() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    upload_all_photos(&app, &id).await;
    post_json(&app, &format!("/api/session/{}/analyze", id), None).await;

    // The minimum indicator display time holds the session in analyzing
    // even though the stub answers immediately
    let session = wait_for_session(&app, &id, |s| s["step"] == "gallery").await;
    assert_eq!(session["analysis"]["hairType"], "wavy");
    assert_eq!(session["analysis"]["overallScore"], 4.2);

    // Gallery partition for wavy/medium/medium
    let (status, gallery) = get_json(&app, &format!("/api/session/{}/gallery", id)).await;
    assert_eq!(status, StatusCode::OK);
    let eligible_ids: Vec<&str> = gallery["eligible"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    let ineligible_ids: Vec<&str> = gallery["ineligible"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(eligible_ids.contains(&"pompadour"));
    assert!(ineligible_ids.contains(&"slick-back"));
    assert_eq!(eligible_ids.len() + ineligible_ids.len(), 12);

    // Select a style and wait for the generated preview
    let (status, session) = post_json(
        &app,
        &format!("/api/session/{}/select", id),
        Some(json!({"styleId": "pompadour"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "preview");
    assert_eq!(session["selectedStyleId"], "pompadour");

    let session = wait_for_session(&app, &id, |s| !s["generatedPreview"].is_null()).await;
    assert_eq!(
        session["generatedPreview"]["image"],
        "data:image/png;base64,generated"
    );
    assert_eq!(session["generatedPreview"]["suitabilityScore"], 4.4);
    assert_eq!(
        session["generatedPreview"]["explanation"],
        "Volume on top balances the profile."
    );

    // Back to gallery: preview dropped, selection kept
    let (status, session) = post_json(&app, &format!("/api/session/{}/back", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["step"], "gallery");
    assert_eq!(session["generatedPreview"], Value::Null);
    assert_eq!(session["selectedStyleId"], "pompadour");
}

#[tokio::test]
async fn reset_from_any_step_yields_a_fresh_session() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    upload_all_photos(&app, &id).await;
    post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    wait_for_session(&app, &id, |s| s["step"] == "gallery").await;
    post_json(
        &app,
        &format!("/api/session/{}/select", id),
        Some(json!({"styleId": "buzz-cut"})),
    )
    .await;
    wait_for_session(&app, &id, |s| !s["generatedPreview"].is_null()).await;

    // Reset from the preview step
    let (status, fresh) = post_json(&app, &format!("/api/session/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fresh_id = fresh["sessionId"].as_str().unwrap();
    assert_ne!(fresh_id, id);
    assert_eq!(fresh["step"], "upload");
    assert_eq!(fresh["uploadedCount"], 0);
    assert_eq!(fresh["analysis"], Value::Null);
    assert_eq!(fresh["selectedStyleId"], Value::Null);
    assert_eq!(fresh["generatedPreview"], Value::Null);

    // The old id is gone
    let (status, _) = get_json(&app, &format!("/api/session/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn analysis_429_surfaces_message_and_preserves_session() {
    let stub = Router::new().route(
        "/analyze-hair",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "Rate limit exceeded. Please try again in a moment."})),
            )
        }),
    );
    let app = app(spawn_ai_stub(stub).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    upload_all_photos(&app, &id).await;
    post_json(&app, &format!("/api/session/{}/analyze", id), None).await;

    let session = wait_for_session(&app, &id, |s| !s["lastError"].is_null()).await;
    assert_eq!(
        session["lastError"],
        "Rate limit exceeded. Please try again in a moment."
    );
    // Prior fields untouched: still analyzing, photos intact, retry open
    assert_eq!(session["step"], "analyzing");
    assert_eq!(session["uploadedCount"], 6);
    assert_eq!(session["gatewayBusy"], false);

    let (status, _) = post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn second_submit_while_call_outstanding_is_conflict() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    upload_all_photos(&app, &id).await;
    let (status, _) = post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    assert_eq!(status, StatusCode::OK);

    // The minimum display time keeps the first call unsettled
    let (status, body) = post_json(&app, &format!("/api/session/{}/analyze", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]["message"].as_str().unwrap().contains("in flight"));
}

#[tokio::test]
async fn non_image_upload_is_unsupported_media() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/session/{}/photos/front", id))
        .header("content-type", "application/octet-stream")
        .body(Body::from("not an image at all"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA");

    let (_, session) = get_json(&app, &format!("/api/session/{}", id)).await;
    assert_eq!(session["uploadedCount"], 0);
}

#[tokio::test]
async fn unknown_slot_and_unknown_style_are_rejected() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (_, session) = post_json(&app, "/api/session", None).await;
    let id = session["sessionId"].as_str().unwrap().to_string();

    let (status, _) = upload_photo(&app, &id, "profile").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        &format!("/api/session/{}/select", id),
        Some(json!({"styleId": "mohawk-extreme"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    let (status, _) = get_json(
        &app,
        "/api/session/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_and_logout_are_stateless_placeholders() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;

    let (status, body) = post_json(
        &app,
        "/api/login",
        Some(json!({"username": "demo", "password": "anything"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, body) = post_json(&app, "/api/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn health_reports_module_and_sessions() {
    let app = app(spawn_ai_stub(happy_ai_stub()).await).await;
    post_json(&app, "/api/session", None).await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "looksy-ui");
    assert_eq!(body["active_sessions"], 1);
}
