use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProviderError;

const SERVICE: &str = "geocoding";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Resolves one place name to zero or one coordinate pair. The first provider
/// match is authoritative; a miss is `Ok(None)`, never an error the caller has
/// to abort on.
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(&self, name: &str) -> Result<Option<LatLng>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl GoogleGeocoder {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("static base url"),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

impl GeocodeProvider for GoogleGeocoder {
    async fn geocode(&self, name: &str) -> Result<Option<LatLng>, ProviderError> {
        let endpoint = format!(
            "{}/maps/api/geocode/json",
            self.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .http
            .get(&endpoint)
            .query(&[("address", name), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if payload.status == "ZERO_RESULTS" {
            return Ok(None);
        }
        if payload.status != "OK" {
            return Err(ProviderError::payload(
                SERVICE,
                format!("status {}", payload.status),
            ));
        }

        Ok(payload
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location))
    }
}

/// Offline geocoder backed by a fixed lookup table; anything not listed is a
/// miss, which is exactly what the pipeline has to tolerate. Names registered
/// via [`FixedGeocoder::fail_on`] error instead, modeling a per-call provider
/// failure.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    table: HashMap<String, LatLng>,
    failures: HashSet<String>,
}

impl FixedGeocoder {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A small set of well-known cities, enough for offline demos.
    pub fn with_known_cities() -> Self {
        let mut geocoder = Self::default();
        for (name, lat, lng) in [
            ("Jaipur", 26.9124, 75.7873),
            ("Delhi", 28.7041, 77.1025),
            ("New Delhi", 28.6139, 77.2090),
            ("Agra", 27.1767, 78.0081),
            ("Mumbai", 19.0760, 72.8777),
            ("Udaipur", 24.5854, 73.7125),
            ("London", 51.5074, -0.1278),
            ("Paris", 48.8566, 2.3522),
            ("Rome", 41.9028, 12.4964),
            ("Tokyo", 35.6762, 139.6503),
            ("New York", 40.7128, -74.0060),
        ] {
            geocoder.insert(name, LatLng { lat, lng });
        }
        geocoder
    }

    pub fn insert(&mut self, name: impl AsRef<str>, location: LatLng) {
        self.table.insert(name.as_ref().to_lowercase(), location);
    }

    /// Makes lookups for `name` fail with a provider error.
    pub fn fail_on(mut self, name: impl AsRef<str>) -> Self {
        self.failures.insert(name.as_ref().to_lowercase());
        self
    }
}

impl GeocodeProvider for FixedGeocoder {
    async fn geocode(&self, name: &str) -> Result<Option<LatLng>, ProviderError> {
        let folded = name.to_lowercase();
        if self.failures.contains(&folded) {
            return Err(ProviderError::Unavailable {
                service: SERVICE,
                detail: format!("lookup for {name} configured to fail"),
            });
        }
        Ok(self.table.get(&folded).copied())
    }
}

#[derive(Debug, Clone)]
pub enum GeocodeBackend {
    Google(GoogleGeocoder),
    Fixed(FixedGeocoder),
}

impl GeocodeProvider for GeocodeBackend {
    async fn geocode(&self, name: &str) -> Result<Option<LatLng>, ProviderError> {
        match self {
            Self::Google(client) => client.geocode(name).await,
            Self::Fixed(fixed) => fixed.geocode(name).await,
        }
    }
}
