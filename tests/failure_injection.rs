//! Provider failure handling, end to end over real sockets.

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

mod common;

const INTERVAL_MS: u64 = 100;

async fn lookup(gateway: SocketAddr, platform: &str, username: &str) -> (StatusCode, Value) {
    let res = common::http_client()
        .get(format!("http://{}/obs/fortnite/{}/{}", gateway, platform, username))
        .send()
        .await
        .expect("Gateway unreachable");
    let status = StatusCode::from_u16(res.status().as_u16()).unwrap();
    (status, res.json().await.unwrap())
}

fn sentinel() -> Value {
    json!({"kills": -1, "wins": -1, "kdr": -1.0})
}

#[tokio::test]
async fn test_successful_lookup() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let provider = common::start_mock_provider(move |req| {
        recorder.lock().unwrap().push(req);
        async { (200, common::profile_body("100", "10", "2.5")) }
    })
    .await;

    std::env::set_var("OBS_FORTNITE_TOKEN_SUCCESS", "trn-secret");
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_SUCCESS");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "ninja").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"kills": 100, "wins": 10, "kdr": 2.5}));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/v1/profile/pc/ninja");
    assert_eq!(seen[0].api_key.as_deref(), Some("trn-secret"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unusual_usernames_are_forwarded() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let provider = common::start_mock_provider(move |req| {
        recorder.lock().unwrap().push(req.path);
        async { (200, common::profile_body("5", "1", "0.5")) }
    })
    .await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_UNUSUAL");
    let (gateway, shutdown) = common::start_gateway(config).await;

    // A space, then a byte that is not UTF-8 on its own.
    for username in ["a%20b", "%FF"] {
        let (status, body) = lookup(gateway, "pc", username).await;
        assert_eq!(status, StatusCode::OK, "{username}");
        assert_eq!(body, json!({"kills": 5, "wins": 1, "kdr": 0.5}));
    }

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "/v1/profile/pc/a%20b".to_string(),
            "/v1/profile/pc/%EF%BF%BD".to_string(),
        ]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_thousands_separators_are_accepted() {
    let provider = common::start_mock_provider(|_| async {
        (200, common::profile_body("12,345", "1,002", "3.75"))
    })
    .await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_SEPARATORS");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "psn", "someone").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"kills": 12345, "wins": 1002, "kdr": 3.75}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_player_not_found() {
    let provider = common::start_mock_provider(|_| async {
        (200, r#"{"error":"Player Not Found"}"#.to_string())
    })
    .await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_NOT_FOUND");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "doesnotexist").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}

#[tokio::test]
async fn test_rejected_credential() {
    let provider = common::start_mock_provider(|req| async move {
        match req.api_key.as_deref() {
            Some(key) if !key.is_empty() => (200, common::profile_body("1", "1", "1.0")),
            _ => (401, r#"{"message":"Invalid authentication credentials"}"#.to_string()),
        }
    })
    .await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_NEVER_SET");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "ninja").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_provider_body() {
    let provider = common::start_mock_provider(|_| async { (200, "<html>oops</html>".to_string()) }).await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_MALFORMED");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "ninja").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_stat_is_never_partial() {
    let provider = common::start_mock_provider(|_| async {
        let body = json!({
            "lifeTimeStats": [
                {"key": "Kills", "value": "100"},
                {"key": "K/d", "value": "2.5"}
            ]
        });
        (200, body.to_string())
    })
    .await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_MISSING");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "ninja").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_provider() {
    // Bind then drop to get a port nobody listens on.
    let closed: SocketAddr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config = common::gateway_config(closed, INTERVAL_MS, "OBS_FORTNITE_TOKEN_UNREACHABLE");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "pc", "ninja").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}

#[tokio::test]
async fn test_provider_server_error() {
    let provider = common::start_mock_provider(|_| async { (503, "{}".to_string()) }).await;
    let config = common::gateway_config(provider, INTERVAL_MS, "OBS_FORTNITE_TOKEN_503");
    let (gateway, shutdown) = common::start_gateway(config).await;

    let (status, body) = lookup(gateway, "xbl", "ninja").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, sentinel());

    shutdown.trigger();
}
