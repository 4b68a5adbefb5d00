//! Telemetry API integration tests.
//!
//! Run with: cargo test --test telemetry_test -- --ignored
//!
//! Note: requires a running utm-server at http://localhost:3000, or set
//! UTM_TEST_URL to override the default.

use chrono::Utc;
use reqwest::Client;

fn base_url() -> String {
    std::env::var("UTM_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn telemetry_body(aircraft_id: &str, lat: f64, lon: f64, altitude_m: f64, battery_percent: f64) -> serde_json::Value {
    serde_json::json!({
        "aircraft_id": aircraft_id,
        "lat": lat,
        "lon": lon,
        "altitude_m": altitude_m,
        "velocity_x": 0.0,
        "velocity_y": 0.0,
        "velocity_z": 0.0,
        "battery_percent": battery_percent,
        "status": "idle",
        "timestamp": Utc::now(),
    })
}

#[tokio::test]
#[ignore]
async fn test_register_and_send_telemetry() {
    let client = Client::new();
    let base = base_url();

    let resp = client
        .post(format!("{base}/v1/aircraft/register"))
        .json(&serde_json::json!({"aircraft_id": "TEST-TEL-001", "lat": 37.70, "lon": -122.40, "altitude_m": 50.0}))
        .send()
        .await
        .expect("register failed");
    assert!(resp.status().is_success());

    let telemetry = telemetry_body("TEST-TEL-001", 37.7001, -122.4001, 55.0, 95.0);
    let resp = client.post(format!("{base}/v1/telemetry")).json(&telemetry).send().await.unwrap();
    assert!(resp.status().is_success());

    let resp = client.get(format!("{base}/v1/aircraft")).send().await.unwrap();
    let aircraft: Vec<serde_json::Value> = resp.json().await.unwrap();
    let found = aircraft.iter().any(|a| a["aircraft_id"] == "TEST-TEL-001");
    assert!(found, "aircraft should appear in list after registration");
}

#[tokio::test]
#[ignore]
async fn test_telemetry_updates_position_idempotently() {
    let client = Client::new();
    let base = base_url();

    client
        .post(format!("{base}/v1/aircraft/register"))
        .json(&serde_json::json!({"aircraft_id": "TEST-TEL-002", "lat": 37.70, "lon": -122.40, "altitude_m": 50.0}))
        .send()
        .await
        .unwrap();

    let telemetry1 = telemetry_body("TEST-TEL-002", 37.70, -122.40, 50.0, 90.0);
    client.post(format!("{base}/v1/telemetry")).json(&telemetry1).send().await.unwrap();

    let telemetry2 = telemetry_body("TEST-TEL-002", 37.71, -122.39, 60.0, 85.0);
    client.post(format!("{base}/v1/telemetry")).json(&telemetry2).send().await.unwrap();

    let resp = client.get(format!("{base}/v1/aircraft/TEST-TEL-002")).send().await.unwrap();
    assert!(resp.status().is_success());
    let aircraft: serde_json::Value = resp.json().await.unwrap();
    assert!((aircraft["lat"].as_f64().unwrap() - 37.71).abs() < 1e-6);
    assert!((aircraft["altitude_m"].as_f64().unwrap() - 60.0).abs() < 1e-6);
}
