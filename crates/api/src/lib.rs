mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Json, State};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Local, NaiveDate, NaiveTime};
use daytour_agents::TourPlanner;
use daytour_core::{parse_interests, PlanError, PreferenceStore, TripRequest};
use daytour_observability::AppMetrics;
use daytour_providers::env as provider_env;
use daytour_providers::{
    FixedGeocoder, GazetteerExtractor, GenerationBackend, GeocodeBackend, IpLocator, NewsBackend,
    ScriptedGeneration, StaticNews, StaticWeather, WeatherBackend,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::rate_limit::RequestRateLimiter;

pub const DEFAULT_API_KEY: &str = "dev-daytour-key";

/// The planner wired to the backend enums every entry point uses.
pub type Planner = TourPlanner<
    GenerationBackend,
    GazetteerExtractor,
    GeocodeBackend,
    WeatherBackend,
    NewsBackend,
>;

#[derive(Clone)]
pub struct ApiState {
    pub planner: Arc<Planner>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: RequestRateLimiter,
    pub locator: Option<IpLocator>,
    pub live_backends: LiveBackends,
}

/// Which provider concerns run against their live HTTP client, surfaced in
/// `/health` so operators can tell a degraded deployment apart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LiveBackends {
    pub generation: bool,
    pub geocoding: bool,
    pub weather: bool,
    pub news: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: daytour_observability::MetricsSnapshot,
    live_backends: LiveBackends,
}

#[derive(Debug, Clone, Deserialize)]
struct PlanRequestBody {
    destination: String,
    /// `HH:MM` local clock times.
    start_time: String,
    end_time: String,
    budget: f64,
    /// Comma-separated; empty or absent means no stated interests.
    interests: Option<String>,
    /// Defaults to today when unset.
    date: Option<NaiveDate>,
    /// Blank means "resolve a best-effort default".
    starting_point: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SuggestionsRequestBody {
    city: String,
}

/// Builds the live application: backends picked per env key, offline
/// stand-ins otherwise.
pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(6))
        .timeout(Duration::from_secs(20))
        .build()
        .context("failed to build HTTP client")?;

    let generation = provider_env::generation_from_env(&http);
    let geocoder = provider_env::geocoder_from_env(&http);
    let weather = provider_env::weather_from_env(&http);
    let news = provider_env::news_from_env(&http);

    let live_backends = LiveBackends {
        generation: matches!(generation, GenerationBackend::Gemini(_)),
        geocoding: matches!(geocoder, GeocodeBackend::Google(_)),
        weather: matches!(weather, WeatherBackend::OpenWeather(_)),
        news: matches!(news, NewsBackend::NewsApi(_)),
    };

    let planner = Arc::new(TourPlanner::new(
        Arc::new(generation),
        Arc::new(GazetteerExtractor::new()),
        Arc::new(geocoder),
        Arc::new(weather),
        Arc::new(news),
        metrics.clone(),
    ));

    let api_key = env::var("DAYTOUR_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("DAYTOUR_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("DAYTOUR_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(60);

    let state = ApiState {
        planner,
        metrics,
        api_key,
        limiter: RequestRateLimiter::new(rate_limit_window, rate_limit_max),
        locator: Some(IpLocator::new(http)),
        live_backends,
    };

    Ok(build_router(state))
}

/// Fully offline application, used by integration tests and local demos.
pub fn build_offline_app(api_key: &str) -> Router {
    let metrics = AppMetrics::shared();

    let planner = Arc::new(TourPlanner::new(
        Arc::new(GenerationBackend::Scripted(ScriptedGeneration::canned(
            "Morning walk through Jaipur, lunch near the bazaar, sunset at the lake.",
        ))),
        Arc::new(GazetteerExtractor::new()),
        Arc::new(GeocodeBackend::Fixed(FixedGeocoder::with_known_cities())),
        Arc::new(WeatherBackend::Static(StaticWeather::clear_skies())),
        Arc::new(NewsBackend::Static(StaticNews::empty())),
        metrics.clone(),
    ));

    build_router(ApiState {
        planner,
        metrics,
        api_key: api_key.to_string(),
        limiter: RequestRateLimiter::new(Duration::from_secs(60), 60),
        locator: None,
        live_backends: LiveBackends {
            generation: false,
            geocoding: false,
            weather: false,
            news: false,
        },
    })
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/plan", post(plan))
        .route("/v1/suggestions", post(suggestions))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(32 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        live_backends: state.live_backends,
    };
    (StatusCode::OK, Json(payload))
}

async fn plan(
    State(state): State<ApiState>,
    Json(body): Json<PlanRequestBody>,
) -> impl IntoResponse {
    let Some(start_time) = parse_clock(&body.start_time) else {
        return bad_request("start_time must be a valid HH:MM clock time");
    };
    let Some(end_time) = parse_clock(&body.end_time) else {
        return bad_request("end_time must be a valid HH:MM clock time");
    };

    let starting_point = resolve_starting_point(&state, &body).await;
    let request = TripRequest {
        destination: body.destination.trim().to_string(),
        interests: parse_interests(body.interests.as_deref().unwrap_or_default()),
        budget: body.budget,
        start_time,
        end_time,
        date: body.date.unwrap_or_else(|| Local::now().date_naive()),
        starting_point,
    };

    let mut prefs = PreferenceStore::new();
    match state.planner.plan_tour(request, &mut prefs).await {
        Ok(tour_plan) => (StatusCode::OK, Json(serde_json::json!(tour_plan))).into_response(),
        Err(PlanError::InvalidRequest(error)) => bad_request(&error.to_string()),
        Err(PlanError::GenerationUnavailable) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "generation_unavailable",
                "message": PlanError::GenerationUnavailable.to_string()
            })),
        )
            .into_response(),
    }
}

async fn suggestions(
    State(state): State<ApiState>,
    Json(body): Json<SuggestionsRequestBody>,
) -> impl IntoResponse {
    let city = body.city.trim().to_string();
    if city.is_empty() {
        return bad_request("city must not be empty");
    }

    let suggestions = state.planner.suggest_activities(&city).await;
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "city": city,
            "suggestions": suggestions
        })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "invalid_request",
            "message": message
        })),
    )
        .into_response()
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .ok()
}

async fn resolve_starting_point(state: &ApiState, body: &PlanRequestBody) -> String {
    if let Some(point) = body
        .starting_point
        .as_deref()
        .map(str::trim)
        .filter(|point| !point.is_empty())
    {
        return point.to_string();
    }

    if let Some(locator) = state.locator.as_ref() {
        if let Ok(Some(city)) = locator.current_city().await {
            return city;
        }
    }

    body.destination.trim().to_string()
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key != state.api_key {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "unauthorized",
                "message": "missing or invalid x-api-key"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "local".to_string())
}
