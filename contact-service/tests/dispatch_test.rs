//! VK dispatch against a local stand-in for `messages.send`.

mod common;

use axum::{extract::State, routing::post, Form, Json, Router};
use common::{test_config, TestApp, TEST_VK_TOKEN};
use contact_service::config::ContactConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

type Calls = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Starts a fake VK API that records form params and answers with `reply`.
async fn spawn_fake_vk(reply: Value) -> (String, Calls) {
    let calls: Calls = Arc::default();

    let app = Router::new()
        .route(
            "/method/messages.send",
            post(
                |State((calls, reply)): State<(Calls, Value)>,
                 Form(params): Form<HashMap<String, String>>| async move {
                    calls.lock().unwrap().push(params);
                    Json(reply)
                },
            ),
        )
        .with_state((calls.clone(), reply));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!(
        "http://127.0.0.1:{}/method/messages.send",
        listener.local_addr().unwrap().port()
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (url, calls)
}

fn dispatching_config(api_url: String) -> ContactConfig {
    let mut config = test_config(None, Some(TEST_VK_TOKEN));
    config.vk.api_url = api_url;
    config.vk.dispatch_enabled = true;
    config
}

#[tokio::test]
async fn sends_messages_send_parameters() {
    let (api_url, calls) = spawn_fake_vk(json!({ "response": 123 })).await;
    let app = TestApp::spawn_with(dispatching_config(api_url)).await;

    let response = app
        .post_form(r#"{"name": "Ivan", "message": "hello"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let params = &calls[0];
    assert_eq!(params["peer_id"], "244887267");
    assert_eq!(params["access_token"], TEST_VK_TOKEN);
    assert_eq!(params["v"], "5.199");
    assert!(params["message"].contains("👤 Имя: Ivan"));
    assert!(params["message"].ends_with("💬 Сообщение:\nhello"));

    let random_id: i64 = params["random_id"].parse().unwrap();
    assert!((1..=2_147_483_647).contains(&random_id));
}

#[tokio::test]
async fn consecutive_sends_use_fresh_random_ids() {
    let (api_url, calls) = spawn_fake_vk(json!({ "response": 1 })).await;
    let app = TestApp::spawn_with(dispatching_config(api_url)).await;

    app.post_form(r#"{"message": "first"}"#).await;
    app.post_form(r#"{"message": "second"}"#).await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_ne!(calls[0]["random_id"], calls[1]["random_id"]);
}

#[tokio::test]
async fn vk_error_is_a_bad_gateway() {
    let (api_url, _calls) = spawn_fake_vk(json!({
        "error": { "error_code": 5, "error_msg": "User authorization failed" }
    }))
    .await;
    let app = TestApp::spawn_with(dispatching_config(api_url)).await;

    let response = app.post_form(r#"{"message": "hello"}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "Failed to deliver message");
}

#[tokio::test]
async fn disabled_dispatch_never_calls_vk() {
    let (api_url, calls) = spawn_fake_vk(json!({ "response": 1 })).await;
    let mut config = dispatching_config(api_url);
    config.vk.dispatch_enabled = false;
    let app = TestApp::spawn_with(config).await;

    let response = app.post_form(r#"{"message": "hello"}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(calls.lock().unwrap().is_empty());
}
