use std::sync::Arc;
use std::time::Instant;

use daytour_core::lexicon::filter_disruptive;
use daytour_core::prompts::{
    draft_prompt, optimize_prompt, suggestions_prompt, DRAFT_FALLBACK, SUGGESTIONS_FALLBACK,
};
use daytour_core::{
    build_route, render_advisories, route_map_url, GeocodedLocation, ItineraryOutcome, PlanError,
    PreferenceStore, TourPlan, TripRequest,
};
use daytour_observability::AppMetrics;
use daytour_providers::{
    ForecastOutcome, GenerationProvider, GeocodeProvider, NewsProvider, PlaceExtractor,
    WeatherProvider,
};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Bounded fan-out for per-place geocoding lookups.
const GEOCODE_CONCURRENCY: usize = 4;
const NEWS_RESULT_CAP: usize = 5;
const NEWS_LANGUAGE: &str = "en";
const SUGGESTION_CAP: usize = 5;

const WEATHER_UNAVAILABLE: &str = "Weather information is currently unavailable.";
const WEATHER_NO_DATA: &str = "No weather data available for the requested date.";

/// One-shot single-day tour orchestrator. Generic over its collaborators so
/// the same pipeline runs against live HTTP providers or offline backends.
#[derive(Clone)]
pub struct TourPlanner<G, X, C, W, N> {
    generation: Arc<G>,
    extractor: Arc<X>,
    geocoder: Arc<C>,
    weather: Arc<W>,
    news: Arc<N>,
    metrics: Arc<AppMetrics>,
}

impl<G, X, C, W, N> TourPlanner<G, X, C, W, N>
where
    G: GenerationProvider,
    X: PlaceExtractor,
    C: GeocodeProvider,
    W: WeatherProvider,
    N: NewsProvider,
{
    pub fn new(
        generation: Arc<G>,
        extractor: Arc<X>,
        geocoder: Arc<C>,
        weather: Arc<W>,
        news: Arc<N>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            generation,
            extractor,
            geocoder,
            weather,
            news,
            metrics,
        }
    }

    /// Runs the full pipeline for one request. Validation happens before any
    /// collaborator is contacted; preference writes made along the way are not
    /// rolled back when a later stage fails.
    #[instrument(skip(self, request, prefs), fields(destination = %request.destination))]
    pub async fn plan_tour(
        &self,
        request: TripRequest,
        prefs: &mut PreferenceStore,
    ) -> Result<TourPlan, PlanError> {
        request.validate()?;

        let started = Instant::now();
        self.metrics.inc_plan();
        let plan_id = Uuid::new_v4().to_string();

        prefs.record_request(&request);

        let weather_summary = self.weather_summary(&request).await;

        let (draft, used_draft_fallback) = self.draft_itinerary(&request).await;
        let itinerary = match self.optimize_itinerary(&draft, &request).await {
            Some(text) => ItineraryOutcome::Optimized { text },
            None if used_draft_fallback => {
                warn!(plan_id = %plan_id, "both generation stages failed");
                return Err(PlanError::GenerationUnavailable);
            }
            None => {
                self.metrics.inc_optimization_failure();
                ItineraryOutcome::OptimizationFailed { draft }
            }
        };

        let places = self.extractor.extract_places(itinerary.text());

        // Geocoding and the news risk filter have no data dependency on each
        // other; run them side by side.
        let (locations, advisories) = tokio::join!(
            self.resolve_waypoints(&places),
            self.destination_advisories(&request.destination),
        );

        let route = build_route(&locations);
        let map_url = route.as_ref().map(route_map_url);

        self.metrics.observe_latency(started.elapsed());
        info!(
            plan_id = %plan_id,
            optimized = itinerary.is_optimized(),
            places = places.len(),
            resolved = locations.len(),
            has_route = route.is_some(),
            "tour planned"
        );

        Ok(TourPlan {
            plan_id,
            destination: request.destination.clone(),
            date: request.date,
            weather_summary,
            itinerary,
            used_draft_fallback,
            route,
            map_url,
            advisories,
            preferences: prefs.snapshot(),
        })
    }

    /// Up to five short activity names for a city; a fixed fallback line when
    /// the generation call fails.
    pub async fn suggest_activities(&self, city: &str) -> Vec<String> {
        match self.generation.generate(&suggestions_prompt(city)).await {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .take(SUGGESTION_CAP)
                .collect(),
            Err(error) => {
                warn!(%city, error = %error, "suggestion generation failed");
                vec![SUGGESTIONS_FALLBACK.to_string()]
            }
        }
    }

    async fn weather_summary(&self, request: &TripRequest) -> String {
        match self
            .weather
            .forecast(&request.destination, request.date)
            .await
        {
            Ok(ForecastOutcome::Report(report)) => format!(
                "Weather: {} has {} with {}° C.",
                request.destination, report.description, report.temperature_celsius
            ),
            Ok(ForecastOutcome::NoDataForDate) => WEATHER_NO_DATA.to_string(),
            Err(error) => {
                warn!(error = %error, "weather lookup failed");
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }

    async fn draft_itinerary(&self, request: &TripRequest) -> (String, bool) {
        let prompt = draft_prompt(
            &request.destination,
            &request.interests,
            &request.starting_point,
            request.date,
        );

        match self.generation.generate(&prompt).await {
            Ok(text) => (text, false),
            Err(error) => {
                warn!(error = %error, "itinerary draft failed, using fallback");
                self.metrics.inc_generation_fallback();
                (DRAFT_FALLBACK.to_string(), true)
            }
        }
    }

    async fn optimize_itinerary(&self, draft: &str, request: &TripRequest) -> Option<String> {
        let prompt = optimize_prompt(draft, request);
        match self.generation.generate(&prompt).await {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(error = %error, "itinerary optimization failed");
                None
            }
        }
    }

    /// Geocodes each distinct place name once, with bounded concurrency and
    /// results reassembled in first-occurrence order. Misses and per-name
    /// provider errors are skipped, never escalated.
    async fn resolve_waypoints(&self, places: &[String]) -> Vec<GeocodedLocation> {
        let mut seen = Vec::new();
        let mut distinct = Vec::new();
        for place in places {
            let folded = place.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                distinct.push(place.clone());
            }
        }

        let lookups: Vec<_> = stream::iter(distinct)
            .map(|name| async move {
                let resolved = self.geocoder.geocode(&name).await;
                (name, resolved)
            })
            .buffered(GEOCODE_CONCURRENCY)
            .collect()
            .await;

        let mut locations = Vec::new();
        let mut misses = 0_usize;
        for (name, resolved) in lookups {
            match resolved {
                Ok(Some(point)) => locations.push(GeocodedLocation {
                    name,
                    latitude: point.lat,
                    longitude: point.lng,
                }),
                Ok(None) => {
                    warn!(place = %name, "could not geocode place");
                    misses += 1;
                }
                Err(error) => {
                    warn!(place = %name, error = %error, "geocoding call failed");
                    misses += 1;
                }
            }
        }

        self.metrics.add_geocode_misses(misses);
        locations
    }

    /// Fetches destination news and renders the risk block. Provider errors
    /// degrade to an empty article list and therefore to the fixed
    /// no-relevant-news sentence.
    async fn destination_advisories(&self, destination: &str) -> String {
        let query = format!("{destination} news OR events OR disruptions OR activities");

        let items = match self
            .news
            .search(&query, NEWS_RESULT_CAP, NEWS_LANGUAGE)
            .await
        {
            Ok(items) => items,
            Err(error) => {
                warn!(error = %error, "news lookup failed");
                Vec::new()
            }
        };

        self.metrics.add_advisory_hits(filter_disruptive(&items).len());
        render_advisories(&items)
    }
}
