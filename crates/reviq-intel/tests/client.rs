//! Integration tests for `IntelClient` using wiremock HTTP mocks.

use std::time::Duration;

use reviq_core::{Impact, MarketQuery, MarketSnapshot, Positioning, PricingStatus};
use reviq_intel::{FailureKind, IntelClient, IntelError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/test-model:generateContent";

fn test_client(base_url: &str) -> IntelClient {
    IntelClient::with_base_url("test-key", "test-model", 5, base_url)
        .expect("client construction should not fail")
}

fn query() -> MarketQuery {
    MarketQuery::new("Taj Lands End", "Mumbai")
}

fn market_payload() -> serde_json::Value {
    json!({
        "competitors": [
            {
                "id": "c1",
                "name": "Vivanta President",
                "category": "Five Star",
                "starLevel": 5,
                "distance": "1.4 km",
                "currentRate": 11200,
                "rating": 4.4,
                "reviewCount": 3120,
                "positioning": "Upscale",
                "otaData": [
                    { "platform": "Booking.com", "rate": 11800, "roomType": "Deluxe Room",
                      "cancellationPolicy": "Free", "breakfast": true,
                      "visibilityScore": 78, "parityGap": 5 }
                ]
            },
            { "name": "Trident", "distance": "1.9 km", "currentRate": 9800 }
        ],
        "historicalParity": [
            { "date": "Mon", "bookingGap": 1.2, "mmtGap": -0.8, "agodaGap": 2.5 }
        ],
        "events": [
            { "name": "Mumbai Marathon", "date": "Jan 18", "distance": "4 km",
              "impact": "High", "description": "Road closures", "suggestedUplift": 18,
              "category": "Sports", "recommendedStrategy": "Implement 2-night MLOS" }
        ],
        "insights": {
            "recommendedBar": 14500, "cpi": 104, "visibilityScore": 71,
            "revenueOpportunity": 320000, "status": "Warning", "summary": "Trailing on weekends"
        }
    })
}

fn envelope(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://example.com/marathon", "title": "Marathon 2026" } },
                    { "retrievedContext": { "uri": "ignored" } }
                ]
            }
        }]
    })
}

#[tokio::test]
async fn fetch_market_intelligence_parses_snapshot_and_sources() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" },
            "tools": [{ "googleSearch": {} }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(&market_payload().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client
        .fetch_market_intelligence(&query())
        .await
        .expect("should parse snapshot");

    assert_eq!(snapshot.competitors.len(), 2);
    assert_eq!(snapshot.competitors[0].positioning, Positioning::Upscale);
    assert!(snapshot.competitors[0].is_parity_violator());
    assert!(snapshot.competitors[1].ota_data.is_empty());
    assert_eq!(snapshot.events[0].impact, Impact::High);
    assert_eq!(
        snapshot.events[0].recommended_strategy.as_deref(),
        Some("Implement 2-night MLOS")
    );
    assert_eq!(snapshot.insights.status, PricingStatus::Warning);
    assert_eq!(snapshot.sources.len(), 2);
    assert_eq!(
        snapshot.sources[0].web.as_ref().and_then(|w| w.title.as_deref()),
        Some("Marathon 2026")
    );
    assert!(snapshot.sources[1].web.is_none());
}

#[tokio::test]
async fn prompt_carries_query_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(&market_payload().to_string())),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .fetch_market_intelligence(&MarketQuery::new("The Leela  ", "Goa"))
        .await
        .expect("should parse snapshot");

    let requests: Vec<Request> = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("prompt text");
    assert!(prompt.contains("hotel market in Goa for a hotel named \"The Leela  \""));
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        json!(["competitors", "historicalParity", "events", "insights"])
    );
}

#[tokio::test]
async fn fenced_response_is_accepted() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", market_payload());

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&fenced)))
        .mount(&server)
        .await;

    let snapshot = test_client(&server.uri())
        .fetch_market_intelligence(&query())
        .await
        .expect("fenced JSON should parse");
    assert_eq!(snapshot.competitors.len(), 2);
}

#[tokio::test]
async fn grounding_tool_is_omitted_when_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(&market_payload().to_string())),
        )
        .mount(&server)
        .await;

    test_client(&server.uri())
        .with_grounding(false)
        .fetch_market_intelligence(&query())
        .await
        .expect("should parse snapshot");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn unparseable_text_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope("I could not find any hotels.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_market_intelligence(&query())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
}

#[tokio::test]
async fn missing_candidate_text_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_market_intelligence(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, IntelError::MalformedResponse { .. }));
}

#[tokio::test]
async fn server_error_is_provider_unavailable_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_market_intelligence(&query())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::ProviderUnavailable);
    let msg = err.to_string();
    assert!(msg.contains("503"), "got: {msg}");
    assert!(msg.contains("The model is overloaded."), "got: {msg}");
}

#[tokio::test]
async fn slow_provider_times_out_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(&market_payload().to_string()))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = IntelClient::with_base_url("test-key", "test-model", 1, &server.uri())
        .expect("client construction should not fail");
    let err = client.fetch_market_intelligence(&query()).await.unwrap_err();
    assert!(matches!(err, IntelError::ProviderUnavailable { .. }));
}

#[tokio::test]
async fn blank_query_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_market_intelligence(&MarketQuery::new("Taj Lands End", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, IntelError::EmptyInput { field: "city" }));
}

#[tokio::test]
async fn pricing_report_returns_raw_text() {
    let server = MockServer::start().await;
    let report = "1. ACTION: Fix Booking.com +5% gap.\n2. TACTIC: +18% for Marathon.\n3. YIELD: 2-night MLOS.";

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": report }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot: MarketSnapshot = serde_json::from_value(market_payload()).unwrap();
    let client = test_client(&server.uri());
    let text = client
        .generate_pricing_report(&snapshot)
        .await
        .expect("report should succeed");
    assert_eq!(text, report);

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    assert!(body.get("generationConfig").is_none());
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Vivanta President"));
    assert!(prompt.contains("ACTION:"));
}

#[tokio::test]
async fn pricing_report_may_be_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let snapshot: MarketSnapshot = serde_json::from_value(market_payload()).unwrap();
    let text = test_client(&server.uri())
        .generate_pricing_report(&snapshot)
        .await
        .expect("empty report is not an error");
    assert!(text.is_empty());
}

#[tokio::test]
async fn pricing_report_transport_failure_is_unavailable() {
    // Nothing listens on port 1.
    let client = test_client("http://127.0.0.1:1");
    let snapshot: MarketSnapshot = serde_json::from_value(market_payload()).unwrap();
    let err = client.generate_pricing_report(&snapshot).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ProviderUnavailable);
}
