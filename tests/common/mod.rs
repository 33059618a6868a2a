#![allow(dead_code)]
//! Shared helpers for tests talking to a mock UIS server

use serde_json::{json, Value};
use uis_probe::config::{Config, UisConfig};
use uis_probe::uis::Session;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn test_uis_config() -> UisConfig {
    UisConfig {
        host: "uis.test".to_string(),
        timeout_seconds: 5,
        ..UisConfig::default()
    }
}

/// Session pointed at the mock server instead of `https://{host}`
pub fn session_for(server: &MockServer) -> Session {
    Session::with_base_url(server.uri(), &test_uis_config()).expect("Failed to build session")
}

pub fn test_config(metrics: &[&str]) -> Config {
    let mut config = Config {
        uis: test_uis_config(),
        ..Config::default()
    };
    config.query.start_time = "2026-01-01".to_string();
    config.query.end_time = "2026-01-02".to_string();
    config.query.metrics = metrics.iter().map(|m| m.to_string()).collect();
    config
}

pub async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/uis/spring_check"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=probe-session; Path=/")
                .set_body_json(json!({"loginFailErrorCode": 0})),
        )
        .mount(server)
        .await;
}

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Removes timing fields so two reports of the same run can be compared
pub fn strip_volatile(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["elapsed_ms", "generated_at", "finished_at", "output_file"] {
                map.remove(key);
            }
            for child in map.values_mut() {
                strip_volatile(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_volatile),
        _ => {}
    }
}
