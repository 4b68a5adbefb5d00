//! Geofence query integration test.
//!
//! Run with: cargo test --test geofence_test -- --ignored
//! Requires a running utm-server (set UTM_TEST_URL to override the default).

use reqwest::Client;

fn base_url() -> String {
    std::env::var("UTM_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[tokio::test]
#[ignore]
async fn test_geofence_snapshot_shape() {
    let client = Client::new();
    let base = base_url();

    let resp = client.get(format!("{base}/v1/geofences")).send().await.unwrap();
    assert!(resp.status().is_success());
    let snapshot: serde_json::Value = resp.json().await.unwrap();
    assert!(snapshot["no_fly_zones"].is_array());
    assert!(snapshot["sensitive_areas"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_point_check_outside_any_zone() {
    let client = Client::new();
    let base = base_url();

    let resp = client
        .get(format!("{base}/v1/geofences/check?lat=0.0&lon=0.0"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["in_no_fly_zone"], false);
}
