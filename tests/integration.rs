use std::sync::Arc;

use beacon::{
    GatewayClient, GatewayConfig, GatewayError, LocalizedText, NotificationExtras,
    TracingObserver,
};
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_KEYS: [&str; 6] = [
    "BEACON_APP_ID",
    "BEACON_APP_KEY",
    "BEACON_USER_AUTH_KEY",
    "BEACON_BASE_URL",
    "BEACON_HTTP_CONNECT_TIMEOUT",
    "BEACON_HTTP_TIMEOUT",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

fn write_config(dir: &tempfile::TempDir, base_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("beacon.toml");
    std::fs::write(
        &path,
        format!(
            r#"
app_id = "app-1"
app_key = "rest-key"
user_auth_key = "user-key"
base_url = "{base_url}/api/v1/"

[http]
timeout_secs = 5
"#
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
#[serial]
async fn config_file_to_notification_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/notifications"))
        .and(header("Authorization", "Basic user-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n-42"})))
        .expect(1)
        .mount(&server)
        .await;

    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::load(&write_config(&dir, &server.uri())).unwrap();
    let client = GatewayClient::from_config(config)
        .unwrap()
        .with_observer(Arc::new(TracingObserver));

    let resp = client
        .send_to_players(
            &LocalizedText::from("Order shipped"),
            &LocalizedText::from("Arrives Tuesday"),
            &["player-1".to_owned()],
            &NotificationExtras::new().with_data(json!({"order_id": 42})),
        )
        .await
        .unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.body, json!({"id": "n-42"}));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["include_player_ids"], json!(["player-1"]));
    assert_eq!(body["data"], json!({"order_id": 42}));
    assert!(body.get("url").is_none());
}

#[tokio::test]
#[serial]
async fn env_override_switches_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/players"))
        .and(query_param("app_id", "env-app"))
        .and(header("Authorization", "Basic env-rest-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"players": []})))
        .expect(1)
        .mount(&server)
        .await;

    clear_env();
    unsafe { std::env::set_var("BEACON_APP_ID", "env-app") };
    unsafe { std::env::set_var("BEACON_APP_KEY", "env-rest-key") };
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::load(&write_config(&dir, &server.uri())).unwrap();
    clear_env();

    let client = GatewayClient::from_config(config).unwrap();
    let body = client.list_devices(None, None).await.unwrap();
    assert_eq!(body, json!({"players": []}));
}

#[tokio::test]
#[serial]
async fn missing_app_id_fails_at_construction() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::load(&dir.path().join("absent.toml")).unwrap();

    let err = GatewayClient::from_config(config).unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
}

#[tokio::test]
async fn shared_client_across_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/apps/app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "app-1"})))
        .expect(16)
        .mount(&server)
        .await;

    let config = GatewayConfig::new("app-1", "rest-key", "user-key")
        .with_base_url(format!("{}/api/v1", server.uri()));
    let client = Arc::new(GatewayClient::from_config(config).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get_app(None).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap()["id"], "app-1");
    }
}

#[tokio::test]
async fn failure_error_chain_is_inspectable() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/apps/app-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"errors": ["bad name"]})))
        .mount(&server)
        .await;

    let config = GatewayConfig::new("app-1", "rest-key", "user-key")
        .with_base_url(format!("{}/api/v1", server.uri()));
    let client = GatewayClient::from_config(config).unwrap();

    let mut params = serde_json::Map::new();
    params.insert("name".into(), json!(""));
    let err = client.update_app("app-1", params).await.unwrap_err();

    let report = anyhow::Error::new(err);
    let chain: Vec<String> = report.chain().map(ToString::to_string).collect();
    assert_eq!(chain.len(), 3, "{chain:?}");
    assert_eq!(chain[0], "update failed");
    assert_eq!(chain[1], "update_app: vendor rejected the request");
    assert_eq!(chain[2], "vendor responded with HTTP 400");
}
