//! Conflict detection integration test.
//!
//! Exercises registration, mission submission, and conflict detection
//! end to end against a live server.
//!
//! Run with: cargo test --test conflict_test -- --ignored
//! Requires a running utm-server (set UTM_TEST_URL to override the default).

use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

fn base_url() -> String {
    std::env::var("UTM_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

async fn register(client: &Client, base: &str, aircraft_id: &str, lat: f64, lon: f64, altitude_m: f64) {
    let resp = client
        .post(format!("{base}/v1/aircraft/register"))
        .json(&serde_json::json!({
            "aircraft_id": aircraft_id,
            "lat": lat,
            "lon": lon,
            "altitude_m": altitude_m,
        }))
        .send()
        .await
        .expect("register request failed");
    assert!(resp.status().is_success(), "registration should succeed, got {}", resp.status());
}

/// Two aircraft on a head-on crossing course through the same point should
/// produce a conflict once both missions are committed.
#[tokio::test]
#[ignore]
async fn test_crossing_course_generates_conflict() {
    let client = Client::new();
    let base = base_url();

    register(&client, &base, "CONFLICT-001", 37.70, -122.403, 50.0).await;
    register(&client, &base, "CONFLICT-002", 37.703, -122.40, 50.0).await;

    let resp = client
        .post(format!("{base}/v1/missions"))
        .json(&serde_json::json!({
            "pickup": { "lat": 37.70, "lon": -122.403, "altitude_m": 50.0 },
            "delivery": { "lat": 37.70, "lon": -122.397, "altitude_m": 50.0 },
        }))
        .send()
        .await
        .expect("first mission submission failed");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base}/v1/missions"))
        .json(&serde_json::json!({
            "pickup": { "lat": 37.703, "lon": -122.40, "altitude_m": 50.0 },
            "delivery": { "lat": 37.697, "lon": -122.40, "altitude_m": 50.0 },
        }))
        .send()
        .await
        .expect("second mission submission failed");
    assert!(resp.status().is_success());

    sleep(Duration::from_secs(2)).await;

    let resp = client.get(format!("{base}/v1/conflicts")).send().await.unwrap();
    let conflicts: Vec<serde_json::Value> = resp.json().await.unwrap();
    assert!(!conflicts.is_empty(), "crossing routes should register at least one conflict");
}
