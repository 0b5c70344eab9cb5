use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use daytour_api::{build_offline_app, DEFAULT_API_KEY};
use serde_json::{json, Value};
use tower::ServiceExt;

fn plan_body() -> Value {
    json!({
        "destination": "Jaipur",
        "start_time": "09:00",
        "end_time": "18:00",
        "budget": 5000.0,
        "interests": "history, food",
        "date": "2025-03-14",
        "starting_point": "Hotel Roma"
    })
}

fn post_json(uri: &str, api_key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["live_backends"]["generation"], false);
}

#[tokio::test]
async fn plan_rejects_missing_api_key() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let response = app.oneshot(post_json("/v1/plan", None, &plan_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = response_json(response).await;
    assert_eq!(payload["error"], "unauthorized");
}

#[tokio::test]
async fn plan_rejects_wrong_api_key() {
    let app = build_offline_app("secret-key");
    let response = app
        .oneshot(post_json("/v1/plan", Some("not-the-key"), &plan_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plan_returns_a_full_tour_plan() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let response = app
        .oneshot(post_json("/v1/plan", Some(DEFAULT_API_KEY), &plan_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;

    assert_eq!(payload["destination"], "Jaipur");
    assert_eq!(payload["date"], "2025-03-14");
    assert_eq!(payload["itinerary"]["status"], "optimized");
    assert_eq!(payload["used_draft_fallback"], false);
    // The canned itinerary names Jaipur, so the offline geocoder yields a route.
    assert!(payload["map_url"].as_str().is_some());
    assert_eq!(
        payload["advisories"],
        "No relevant news found that might affect your plans."
    );
    assert_eq!(payload["preferences"]["destination"], "Jaipur");
    assert!(payload["plan_id"].as_str().is_some());
}

#[tokio::test]
async fn plan_rejects_inverted_time_window() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let mut body = plan_body();
    body["start_time"] = json!("18:00");
    body["end_time"] = json!("09:00");

    let response = app
        .oneshot(post_json("/v1/plan", Some(DEFAULT_API_KEY), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = response_json(response).await;
    assert_eq!(payload["error"], "invalid_request");
}

#[tokio::test]
async fn plan_rejects_unparseable_clock() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let mut body = plan_body();
    body["start_time"] = json!("nine in the morning");

    let response = app
        .oneshot(post_json("/v1/plan", Some(DEFAULT_API_KEY), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggestions_require_a_city() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let response = app
        .oneshot(post_json(
            "/v1/suggestions",
            Some(DEFAULT_API_KEY),
            &json!({ "city": "  " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggestions_return_activity_lines() {
    let app = build_offline_app(DEFAULT_API_KEY);
    let response = app
        .oneshot(post_json(
            "/v1/suggestions",
            Some(DEFAULT_API_KEY),
            &json!({ "city": "Jaipur" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    assert_eq!(payload["city"], "Jaipur");
    assert!(!payload["suggestions"].as_array().unwrap().is_empty());
}
