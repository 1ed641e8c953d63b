//! End-to-end runs against a stub relying party served by axum.
//!
//! The stub speaks the live routes, checks the shape of what it is sent, and
//! issues a session cookie on a successful login.

mod common;

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use common::*;
use passkey_ceremony::webauthn::types::{AssertionCredentialJson, RegistrationCredentialJson};
use passkey_ceremony::{
    CeremonyError, ClientConfig, FlashMessage, HttpTransport, PasskeyClient, Tone, Transport,
    Variant,
};
use reqwest::Url;

async fn start_register(Path(username): Path<String>) -> Response {
    if username == "taken" {
        return (StatusCode::CONFLICT, "Username already registered").into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/json")],
        creation_options_body(),
    )
        .into_response()
}

async fn finish_register(Json(credential): Json<RegistrationCredentialJson>) -> StatusCode {
    if credential.raw_id == "AQID" && credential.credential_type == "public-key" {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn start_login(Path(username): Path<String>) -> Response {
    if username.starts_with("ghost") {
        return (StatusCode::NOT_FOUND, username).into_response();
    }
    if username == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/json")],
        request_options_body(),
    )
        .into_response()
}

async fn finish_login(Json(assertion): Json<AssertionCredentialJson>) -> Response {
    if assertion.response.signature.is_empty() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        [(header::SET_COOKIE, "id=session-for-alice; Path=/")],
        "ok",
    )
        .into_response()
}

async fn whoami(headers: HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn spawn_relying_party() -> Url {
    let app = Router::new()
        .route("/start_register_passkey/:username", post(start_register))
        .route("/finish_register_passkey", post(finish_register))
        .route("/start_login_passkey/:username", post(start_login))
        .route("/finish_login_passkey", post(finish_login))
        .route("/whoami", post(whoami));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}", addr)).unwrap()
}

async fn http_client() -> PasskeyClient<HttpTransport, ScriptedProvider, FlashMessage> {
    let config = ClientConfig::new(spawn_relying_party().await, Variant::Live);
    let transport = HttpTransport::from_config(&config).unwrap();
    PasskeyClient::new(&config, transport, ScriptedProvider::new(), FlashMessage::new())
}

#[tokio::test]
async fn registration_over_http() {
    passkey_ceremony::telemetry::init_tracing();
    let client = http_client().await;

    let done = client.register("alice").await;

    assert!(done.is_success(), "{:?}", done);
    assert_eq!(client.feedback().state().tone, Tone::Success);
    assert_eq!(client.provider().created.lock().unwrap()[0].challenge, vec![0, 0, 0]);
}

#[tokio::test]
async fn conflict_over_http() {
    let client = http_client().await;

    let done = client.register("taken").await;

    assert_eq!(
        done.failure(),
        Some(&CeremonyError::UsernameConflict { status: 409 })
    );
}

#[tokio::test]
async fn unknown_user_body_reaches_the_message() {
    let client = http_client().await;

    let done = client.login("ghost of alice").await;

    assert_eq!(
        done.failure(),
        Some(&CeremonyError::UserNotFound("ghost of alice".to_string()))
    );
    assert!(client.feedback().state().message.contains("ghost of alice"));
}

#[tokio::test]
async fn server_error_over_http() {
    let client = http_client().await;

    let done = client.login("broken").await;

    assert_eq!(
        done.failure(),
        Some(&CeremonyError::ServerError { status: 500 })
    );
    assert_eq!(client.provider().invocations(), 0);
}

#[tokio::test]
async fn login_keeps_the_session_cookie() {
    let client = http_client().await;

    assert!(client.login("alice").await.is_success());

    let echoed = client.transport().post("/whoami", None).await.unwrap();
    assert_eq!(echoed.status, 200);
    assert!(echoed.body.contains("id=session-for-alice"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Port 9 (discard) on localhost is closed on any sane test host
    let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap(), Variant::Live);
    let transport = HttpTransport::from_config(&config).unwrap();
    let client = PasskeyClient::new(&config, transport, ScriptedProvider::new(), FlashMessage::new());

    let done = client.login("alice").await;

    assert!(matches!(done.failure(), Some(CeremonyError::Transport(_))));
    assert_eq!(client.feedback().state().message, "Error logging in!");
}
