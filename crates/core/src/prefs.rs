use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::TripRequest;

/// Preference values are untyped by design: any stage may record a string, a
/// number, or a list under any key without predeclaring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for PrefValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for PrefValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Volatile key/value memory of the traveler's stated preferences. Created at
/// request start and threaded through the orchestration call; last write wins
/// per key and nothing survives the request unless the caller keeps the store.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    values: BTreeMap<String, PrefValue>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PrefValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, PrefValue> {
        self.values.clone()
    }

    /// Records every field of the trip request at orchestration start.
    pub fn record_request(&mut self, request: &TripRequest) {
        self.set("destination", request.destination.as_str());
        self.set("interests", request.interests.clone());
        self.set("budget", request.budget);
        self.set("start_time", request.start_time.format("%H:%M").to_string());
        self.set("end_time", request.end_time.format("%H:%M").to_string());
        self.set("date", request.date.format("%Y-%m-%d").to_string());
        self.set("starting_point", request.starting_point.as_str());
    }
}
