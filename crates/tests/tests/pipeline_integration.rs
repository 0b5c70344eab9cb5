use std::sync::Arc;

use chrono::NaiveDate;
use daytour_agents::TourPlanner;
use daytour_core::{
    ItineraryOutcome, NewsItem, PlanError, PrefValue, PreferenceStore, RequestError, TripRequest,
    NO_RELEVANT_NEWS,
};
use daytour_observability::AppMetrics;
use daytour_providers::{
    FixedGeocoder, GazetteerExtractor, ScriptedGeneration, StaticNews, StaticWeather,
};

type TestPlanner =
    TourPlanner<ScriptedGeneration, GazetteerExtractor, FixedGeocoder, StaticWeather, StaticNews>;

fn planner(
    generation: ScriptedGeneration,
    geocoder: FixedGeocoder,
    weather: StaticWeather,
    news: StaticNews,
) -> TestPlanner {
    TourPlanner::new(
        Arc::new(generation),
        Arc::new(GazetteerExtractor::new()),
        Arc::new(geocoder),
        Arc::new(weather),
        Arc::new(news),
        AppMetrics::shared(),
    )
}

fn request() -> TripRequest {
    TripRequest {
        destination: "Jaipur".to_string(),
        interests: vec!["history".to_string(), "food".to_string()],
        budget: 5000.0,
        start_time: "09:00:00".parse().unwrap(),
        end_time: "18:00:00".parse().unwrap(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        starting_point: "Hotel Roma".to_string(),
    }
}

#[tokio::test]
async fn rejects_invalid_window_before_any_collaborator() {
    let generation = ScriptedGeneration::new();
    let planner = planner(
        generation.clone(),
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut invalid = request();
    invalid.end_time = invalid.start_time;

    let mut prefs = PreferenceStore::new();
    let result = planner.plan_tour(invalid, &mut prefs).await;

    assert!(matches!(
        result,
        Err(PlanError::InvalidRequest(RequestError::InvalidTimeWindow))
    ));
    // No generation call was ever issued, and nothing was recorded.
    assert!(generation.prompts().is_empty());
    assert!(prefs.is_empty());
}

#[tokio::test]
async fn optimizer_prompt_embeds_budget_window_and_hours() {
    let generation = ScriptedGeneration::new();
    generation.push_text("Morning at Hawa Mahal, afternoon in the old city of Jaipur.");
    generation.push_text("Optimized: Jaipur old city walk within budget.");

    let planner = planner(
        generation.clone(),
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert!(plan.itinerary.is_optimized());
    let prompts = generation.prompts();
    assert_eq!(prompts.len(), 2);
    for needle in ["9 hours", "5000", "09:00", "18:00"] {
        assert!(
            prompts[1].contains(needle),
            "optimizer prompt missing {needle:?}"
        );
    }
}

#[tokio::test]
async fn facilities_are_not_waypoints() {
    let generation = ScriptedGeneration::new();
    generation.push_text("draft");
    generation.push_text("Visit Jaipur, then the Amber Fort");

    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    let route = plan.route.expect("Jaipur should geocode");
    assert_eq!(route.origin.name, "Jaipur");
    assert_eq!(route.destination.name, "Jaipur");
    assert!(route.waypoints.is_empty());

    let url = plan.map_url.unwrap();
    assert!(!url.contains("waypoints"));
}

#[tokio::test]
async fn all_geocode_misses_mean_no_route() {
    let generation = ScriptedGeneration::new();
    generation.push_text("draft");
    generation.push_text("A day across Jaipur and Delhi");

    let planner = planner(
        generation,
        FixedGeocoder::empty(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert!(plan.route.is_none());
    assert!(plan.map_url.is_none());
}

#[tokio::test]
async fn duplicate_places_yield_a_deterministic_route() {
    let generation = ScriptedGeneration::new();
    generation.push_text("draft");
    generation.push_text("Start in Delhi, ride to Agra, and return to Delhi for dinner");

    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    // Each distinct name is geocoded once, first occurrence wins.
    let route = plan.route.unwrap();
    assert_eq!(route.origin.name, "Delhi");
    assert_eq!(route.destination.name, "Agra");
    assert!(route.waypoints.is_empty());
}

#[tokio::test]
async fn disruptive_news_becomes_bullets_and_is_idempotent() {
    let articles = vec![
        NewsItem {
            title: "Road closed due to protest".to_string(),
            summary: "expect detours downtown".to_string(),
        },
        NewsItem {
            title: "Top 10 restaurants".to_string(),
            summary: "places to eat this weekend".to_string(),
        },
    ];

    let make = || {
        let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
        planner(
            generation,
            FixedGeocoder::with_known_cities(),
            StaticWeather::clear_skies(),
            StaticNews::with_items(articles.clone()),
        )
    };

    let mut prefs = PreferenceStore::new();
    let first = make().plan_tour(request(), &mut prefs).await.unwrap();
    let second = make().plan_tour(request(), &mut prefs).await.unwrap();

    assert!(first
        .advisories
        .contains("- **Road closed due to protest**: expect detours downtown"));
    assert!(!first.advisories.contains("Top 10 restaurants"));
    assert_eq!(first.advisories, second.advisories);
}

#[tokio::test]
async fn quiet_news_degrades_to_fixed_sentence() {
    let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();
    assert_eq!(plan.advisories, NO_RELEVANT_NEWS);
}

#[tokio::test]
async fn both_generation_failures_short_circuit() {
    let generation = ScriptedGeneration::new();
    generation.push_failure();
    generation.push_failure();

    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let result = planner.plan_tour(request(), &mut prefs).await;
    assert!(matches!(result, Err(PlanError::GenerationUnavailable)));
    // Preference writes made before the failure are kept.
    assert!(!prefs.is_empty());
}

#[tokio::test]
async fn optimization_failure_is_an_explicit_outcome() {
    let generation = ScriptedGeneration::new();
    generation.push_text("Draft day across Jaipur");
    generation.push_failure();

    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert!(!plan.used_draft_fallback);
    match plan.itinerary {
        ItineraryOutcome::OptimizationFailed { ref draft } => {
            assert_eq!(draft, "Draft day across Jaipur");
        }
        ItineraryOutcome::Optimized { .. } => panic!("optimizer failure must stay visible"),
    }
}

#[tokio::test]
async fn draft_fallback_keeps_the_pipeline_running() {
    let generation = ScriptedGeneration::new();
    generation.push_failure();
    generation.push_text("Optimized fallback day in Jaipur");

    let planner = planner(
        generation.clone(),
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert!(plan.used_draft_fallback);
    assert!(plan.itinerary.is_optimized());
    // The optimizer was fed the fixed substitute text, not an empty draft.
    assert!(generation.prompts()[1].contains("Sorry, I couldn't generate an itinerary"));
}

#[tokio::test]
async fn preferences_are_recorded_and_snapshotted() {
    let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert_eq!(prefs.get("destination"), Some(&PrefValue::from("Jaipur")));
    assert_eq!(prefs.get("budget"), Some(&PrefValue::Number(5000.0)));
    assert_eq!(prefs.get("start_time"), Some(&PrefValue::from("09:00")));
    assert_eq!(plan.preferences, prefs.snapshot());
}

#[tokio::test]
async fn weather_no_data_renders_fixed_sentence() {
    let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::no_data(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();
    assert_eq!(
        plan.weather_summary,
        "No weather data available for the requested date."
    );
}

#[tokio::test]
async fn weather_provider_error_degrades_to_placeholder() {
    let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::unavailable(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert_eq!(
        plan.weather_summary,
        "Weather information is currently unavailable."
    );
    // The rest of the plan is unaffected.
    assert!(plan.itinerary.is_optimized());
    assert!(plan.route.is_some());
}

#[tokio::test]
async fn news_provider_error_degrades_to_fixed_sentence() {
    let generation = ScriptedGeneration::canned("A quiet day in Jaipur");
    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::unavailable(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    assert_eq!(plan.advisories, NO_RELEVANT_NEWS);
    assert!(plan.route.is_some());
}

#[tokio::test]
async fn geocode_failure_for_one_name_keeps_the_rest() {
    let generation = ScriptedGeneration::new();
    generation.push_text("draft");
    generation.push_text("A day across Jaipur and Delhi");

    let planner = planner(
        generation,
        FixedGeocoder::with_known_cities().fail_on("Delhi"),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );

    let mut prefs = PreferenceStore::new();
    let plan = planner.plan_tour(request(), &mut prefs).await.unwrap();

    // Delhi's failing lookup is skipped; Jaipur alone still forms a route.
    let route = plan.route.expect("surviving name should form a route");
    assert_eq!(route.origin.name, "Jaipur");
    assert_eq!(route.destination.name, "Jaipur");
    assert!(route.waypoints.is_empty());
}

#[tokio::test]
async fn suggestions_are_capped_and_fall_back() {
    let generation = ScriptedGeneration::new();
    generation.push_text("Palace walk\nStreet food crawl\nBlock printing\nStepwell visit\nBazaar\nKite flying");
    let ok_planner = planner(
        generation,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );
    let suggestions = ok_planner.suggest_activities("Jaipur").await;
    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0], "Palace walk");

    let failing = ScriptedGeneration::new();
    failing.push_failure();
    let failing_planner = planner(
        failing,
        FixedGeocoder::with_known_cities(),
        StaticWeather::clear_skies(),
        StaticNews::empty(),
    );
    let fallback = failing_planner.suggest_activities("Jaipur").await;
    assert_eq!(
        fallback,
        vec!["Sorry, I couldn't generate suggestions at this time.".to_string()]
    );
}
