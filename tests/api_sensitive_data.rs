use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;
use zeroize::Zeroizing;

use privault::config::Config;
use privault::crypto::cipher::generate_key_hex;
use privault::repositories::envelope::EnvelopeStore;
use privault::state::AppState;

fn test_state(dir: &TempDir) -> AppState {
    let key_bytes = hex::decode(generate_key_hex()).unwrap();
    let config = Config {
        data_dir: dir.path().join("sensitive"),
        session_duration_days: 7,
        encryption_key: Zeroizing::new(key_bytes),
    };
    AppState::new(&config).expect("state should build from a valid key")
}

fn signed_in(state: &AppState) -> Uuid {
    state
        .sessions
        .issue("user-1", "user-1@example.com", state.config.session_duration_days)
}

fn request(method: &str, session: Option<&Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/api/sensitive-data");

    if let Some(session_id) = session {
        builder = builder.header(header::COOKIE, format!("session_id={}", session_id));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn requests_without_a_session_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = privault::app(test_state(&dir));

    for method in ["GET", "POST", "PATCH", "DELETE"] {
        let body = (method == "POST" || method == "PATCH").then(|| json!({}));
        let (status, response) = send(&app, request(method, None, body)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} should be 401", method);
        assert_eq!(response["success"], false);
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());

    let session_id = state.sessions.issue("user-1", "user-1@example.com", -1);

    let (status, _) = send(&app, request("GET", Some(&session_id), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_with_nothing_stored_returns_empty_object() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    let (status, response) = send(&app, request("GET", Some(&session_id), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
    assert_eq!(response["data"], json!({}));
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    let record = json!({
        "fullName": "Ada Lovelace",
        "phoneNumber": "555-0100",
        "paymentMethods": [
            { "id": "pm-1", "type": "credit_card", "lastFour": "4242" }
        ],
        "customFields": { "employer": "Analytical Engines Ltd" }
    });

    let (status, response) =
        send(&app, request("POST", Some(&session_id), Some(record.clone()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["success"], true);
    assert!(response["message"].is_string());

    let (status, response) = send(&app, request("GET", Some(&session_id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"], record);
}

#[tokio::test]
async fn non_object_bodies_are_rejected() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    for method in ["POST", "PATCH"] {
        let (status, response) =
            send(&app, request(method, Some(&session_id), Some(json!([1, 2, 3])))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be 400", method);
        assert_eq!(response["success"], false);
    }
}

#[tokio::test]
async fn patch_merges_over_the_stored_record() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    let initial = json!({ "fullName": "Ada Lovelace", "phoneNumber": "1" });
    send(&app, request("POST", Some(&session_id), Some(initial))).await;

    let (status, response) = send(
        &app,
        request("PATCH", Some(&session_id), Some(json!({ "phoneNumber": "2" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let (_, response) = send(&app, request("GET", Some(&session_id), None)).await;
    assert_eq!(response["data"]["fullName"], "Ada Lovelace");
    assert_eq!(response["data"]["phoneNumber"], "2");
}

#[tokio::test]
async fn patch_without_a_stored_record_creates_one() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    let (status, _) = send(
        &app,
        request("PATCH", Some(&session_id), Some(json!({ "phoneNumber": "555" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, response) = send(&app, request("GET", Some(&session_id), None)).await;
    assert_eq!(response["data"]["phoneNumber"], "555");
}

#[tokio::test]
async fn delete_clears_the_payload_but_keeps_the_envelope() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    send(
        &app,
        request("POST", Some(&session_id), Some(json!({ "fullName": "Ada" }))),
    )
    .await;

    let (status, response) = send(&app, request("DELETE", Some(&session_id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    // The profile envelope survives without the payload.
    let envelope = state
        .store
        .get("user-1")
        .unwrap()
        .expect("envelope should survive delete");
    assert_eq!(envelope.email, "user-1@example.com");
    assert!(envelope.encrypted_payload.is_none());
    assert!(envelope.encryption_metadata.is_none());

    let (_, response) = send(&app, request("GET", Some(&session_id), None)).await;
    assert_eq!(response["data"], json!({}));
}

#[tokio::test]
async fn delete_with_nothing_stored_succeeds() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());
    let session_id = signed_in(&state);

    let (status, response) = send(&app, request("DELETE", Some(&session_id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
}

#[tokio::test]
async fn users_only_see_their_own_records() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = privault::app(state.clone());

    let alice = state.sessions.issue("alice", "alice@example.com", 7);
    let bob = state.sessions.issue("bob", "bob@example.com", 7);

    send(
        &app,
        request("POST", Some(&alice), Some(json!({ "fullName": "Alice" }))),
    )
    .await;

    let (_, response) = send(&app, request("GET", Some(&bob), None)).await;
    assert_eq!(response["data"], json!({}));

    let (_, response) = send(&app, request("GET", Some(&alice), None)).await;
    assert_eq!(response["data"]["fullName"], "Alice");
}
