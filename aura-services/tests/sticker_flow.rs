//! Integration tests for the sticker panel (aura-services).
//!
//! Drives a real Giphy client through the debounced driver against a mock
//! server, then applies the selection to a store through the action channel.

use std::sync::Arc;
use std::time::Duration;

use aura_core::Store;
use aura_services::{action_channel, GiphyClient, MediaKind, SearchDriver, ServiceConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sticker(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "images": { "fixed_width": {
            "url": format!("https://media.giphy.com/{id}.gif"),
            "webp": format!("https://media.giphy.com/{id}.webp")
        }}
    })
}

// ==========================================================================
// Search → select → store
// ==========================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_sticker_search_selection_adds_overlay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/stickers/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [sticker("wave")] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/stickers/search"))
        .and(query_param("q", "cat"))
        .and(query_param("limit", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [sticker("cat")] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ServiceConfig {
        giphy_api_key: Some("test-key".into()),
        giphy_base_url: server.uri(),
        ..ServiceConfig::default()
    };
    let client = Arc::new(GiphyClient::from_config(&config).expect("client"));
    let driver = SearchDriver::spawn(client, MediaKind::Sticker);
    let mut state = driver.state();

    state
        .wait_for(|s| !s.loading && s.results.len() == 1 && s.results[0].id == "wave")
        .await
        .expect("trending");

    driver.set_query("c");
    driver.set_query("cat");
    let results = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| !s.loading && s.query == "cat" && !s.results.is_empty()),
    )
    .await
    .expect("settled in time")
    .expect("state")
    .results
    .clone();
    assert_eq!(results[0].preview_url, "https://media.giphy.com/cat.webp");

    let (tx, mut rx) = action_channel();
    tx.send(results[0].selection_action(MediaKind::Sticker));
    let mut store = Store::new();
    assert_eq!(rx.drain_into(&mut store), 1);

    let overlays = &store.document().gif_overlays;
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].url, "https://media.giphy.com/cat.gif");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_missing_key_surfaces_in_panel() {
    let client = Arc::new(GiphyClient::from_config(&ServiceConfig::default()).expect("client"));
    let driver = SearchDriver::spawn(client, MediaKind::Sticker);
    let mut state = driver.state();

    let settled = state
        .wait_for(|s| !s.loading && s.error.is_some())
        .await
        .expect("state")
        .clone();
    assert_eq!(settled.error.as_deref(), Some("Giphy API key is missing."));
    assert!(settled.results.is_empty());
}
