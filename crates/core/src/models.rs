use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::prefs::PrefValue;

/// Immutable parameters of one planning invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub interests: Vec<String>,
    pub budget: f64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub date: NaiveDate,
    pub starting_point: String,
}

impl TripRequest {
    /// Checked before any external call is made.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.destination.trim().is_empty() {
            return Err(RequestError::EmptyDestination);
        }
        if self.end_time <= self.start_time {
            return Err(RequestError::InvalidTimeWindow);
        }
        if !(self.budget > 0.0) {
            return Err(RequestError::NonPositiveBudget);
        }
        Ok(())
    }

    /// Whole hours available in the tour window (floor of the delta).
    pub fn available_hours(&self) -> i64 {
        (self.end_time - self.start_time).num_hours()
    }
}

/// Splits a comma-separated interests field into trimmed, non-empty entries.
pub fn parse_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: GeocodedLocation,
    pub waypoints: Vec<GeocodedLocation>,
    pub destination: GeocodedLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub description: String,
    pub temperature_celsius: f64,
}

/// Result of the constraint-refinement stage. An optimizer failure is carried
/// as its own variant so callers can never mistake the unrefined draft for a
/// plan that fits the stated budget and time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItineraryOutcome {
    Optimized { text: String },
    OptimizationFailed { draft: String },
}

impl ItineraryOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Optimized { text } => text,
            Self::OptimizationFailed { draft } => draft,
        }
    }

    pub fn is_optimized(&self) -> bool {
        matches!(self, Self::Optimized { .. })
    }
}

/// Fully assembled output of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourPlan {
    pub plan_id: String,
    pub destination: String,
    pub date: NaiveDate,
    pub weather_summary: String,
    pub itinerary: ItineraryOutcome,
    /// True when the draft stage fell back to the fixed substitute text.
    pub used_draft_fallback: bool,
    pub route: Option<Route>,
    pub map_url: Option<String>,
    pub advisories: String,
    pub preferences: BTreeMap<String, PrefValue>,
}
