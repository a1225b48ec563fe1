//! Incident API integration tests against a running server.
//!
//! Run with: cargo test --test incident_api_test -- --ignored

use reqwest::Client;

fn base_url() -> String {
    std::env::var("HAVEN_TEST_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Report an incident, then find it in the listing and in the routing
/// exclusions for a corridor that covers it.
#[tokio::test]
#[ignore]
async fn report_list_and_exclude() {
    let client = Client::new();
    let base = base_url();

    let report_body = serde_json::json!({
        "type": "debris_road",
        "description": "tree down across both lanes",
        "location": { "lat": 26.1224, "lng": -80.1373 }
    });

    let resp = client
        .post(format!("{}/api/incidents", base))
        .json(&report_body)
        .send()
        .await
        .expect("Failed to create incident");

    assert_eq!(resp.status().as_u16(), 201, "Should create incident");
    let created: serde_json::Value = resp.json().await.unwrap();
    let incident_id = created["id"].as_str().unwrap();
    assert_eq!(created["type"].as_str(), Some("debris_road"));

    let resp = client
        .get(format!("{}/api/incidents", base))
        .send()
        .await
        .unwrap();
    let incidents: Vec<serde_json::Value> = resp.json().await.unwrap();
    let found = incidents
        .iter()
        .any(|incident| incident["id"].as_str() == Some(incident_id));
    assert!(found, "Created incident should appear in list");

    let resp = client
        .get(format!(
            "{}/api/incidents/exclusions?startLat=26.0&startLng=-80.2&endLat=26.2&endLng=-80.1&buffer=5",
            base
        ))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let exclusions: serde_json::Value = resp.json().await.unwrap();
    let found = exclusions["exclude_locations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|loc| loc["lat"].as_f64() == Some(26.1224) && loc["lon"].as_f64() == Some(-80.1373));
    assert!(found, "Hazard should appear in exclusions");
}

#[tokio::test]
#[ignore]
async fn invalid_report_is_rejected() {
    let client = Client::new();
    let base = base_url();

    let resp = client
        .post(format!("{}/api/incidents", base))
        .json(&serde_json::json!({ "description": "no type" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}
