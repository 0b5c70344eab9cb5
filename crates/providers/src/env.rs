//! Env-driven backend selection: a live client when the provider's API key is
//! present, the offline backend otherwise.

use std::env;

use crate::generation::{GeminiClient, GenerationBackend, ScriptedGeneration};
use crate::geocode::{FixedGeocoder, GeocodeBackend, GoogleGeocoder};
use crate::news::{NewsApiClient, NewsBackend, StaticNews};
use crate::weather::{OpenWeatherClient, StaticWeather, WeatherBackend};

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";

const OFFLINE_ITINERARY: &str = "Begin at the old town square, wander the craft \
market, stop for a regional lunch, and close the day at a sunset viewpoint near \
your starting point.";

fn key(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

pub fn generation_from_env(http: &reqwest::Client) -> GenerationBackend {
    match key(GEMINI_API_KEY) {
        Some(api_key) => GenerationBackend::Gemini(GeminiClient::new(http.clone(), api_key)),
        None => GenerationBackend::Scripted(ScriptedGeneration::canned(OFFLINE_ITINERARY)),
    }
}

pub fn geocoder_from_env(http: &reqwest::Client) -> GeocodeBackend {
    match key(MAPS_API_KEY) {
        Some(api_key) => GeocodeBackend::Google(GoogleGeocoder::new(http.clone(), api_key)),
        None => GeocodeBackend::Fixed(FixedGeocoder::with_known_cities()),
    }
}

pub fn weather_from_env(http: &reqwest::Client) -> WeatherBackend {
    match key(OPENWEATHER_API_KEY) {
        Some(api_key) => WeatherBackend::OpenWeather(OpenWeatherClient::new(http.clone(), api_key)),
        None => WeatherBackend::Static(StaticWeather::clear_skies()),
    }
}

pub fn news_from_env(http: &reqwest::Client) -> NewsBackend {
    match key(NEWS_API_KEY) {
        Some(api_key) => NewsBackend::NewsApi(NewsApiClient::new(http.clone(), api_key)),
        None => NewsBackend::Static(StaticNews::empty()),
    }
}
