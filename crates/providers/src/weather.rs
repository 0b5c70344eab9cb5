use chrono::{NaiveDate, NaiveDateTime};
use daytour_core::WeatherReport;
use serde::Deserialize;
use url::Url;

use crate::error::ProviderError;

const SERVICE: &str = "weather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Forecast result for one city and calendar date. "No data for that date" is
/// a distinct outcome from a transport failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Report(WeatherReport),
    NoDataForDate,
}

pub trait WeatherProvider: Send + Sync {
    async fn forecast(&self, city: &str, date: NaiveDate) -> Result<ForecastOutcome, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl OpenWeatherClient {
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
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<ForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastWeather {
    description: String,
}

impl WeatherProvider for OpenWeatherClient {
    async fn forecast(&self, city: &str, date: NaiveDate) -> Result<ForecastOutcome, ProviderError> {
        let endpoint = format!(
            "{}/data/2.5/forecast",
            self.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .http
            .get(&endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        let payload: ForecastResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        // First forecast slot falling on the requested calendar date wins.
        for entry in payload.list {
            let Ok(slot) = NaiveDateTime::parse_from_str(&entry.dt_txt, "%Y-%m-%d %H:%M:%S") else {
                continue;
            };
            if slot.date() != date {
                continue;
            }
            let Some(weather) = entry.weather.first() else {
                continue;
            };
            return Ok(ForecastOutcome::Report(WeatherReport {
                description: weather.description.clone(),
                temperature_celsius: entry.main.temp,
            }));
        }

        Ok(ForecastOutcome::NoDataForDate)
    }
}

/// Offline weather backend with a fixed answer; `None` models the
/// no-data-for-date outcome, `unavailable()` a provider that fails outright.
#[derive(Debug, Clone, Default)]
pub struct StaticWeather {
    report: Option<WeatherReport>,
    fail: bool,
}

impl StaticWeather {
    pub fn clear_skies() -> Self {
        Self {
            report: Some(WeatherReport {
                description: "clear sky".to_string(),
                temperature_celsius: 24.0,
            }),
            fail: false,
        }
    }

    pub fn no_data() -> Self {
        Self::default()
    }

    /// Backend whose every call errors.
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn report(report: WeatherReport) -> Self {
        Self {
            report: Some(report),
            fail: false,
        }
    }
}

impl WeatherProvider for StaticWeather {
    async fn forecast(
        &self,
        _city: &str,
        _date: NaiveDate,
    ) -> Result<ForecastOutcome, ProviderError> {
        if self.fail {
            return Err(ProviderError::Unavailable {
                service: SERVICE,
                detail: "static backend configured to fail".to_string(),
            });
        }
        Ok(match &self.report {
            Some(report) => ForecastOutcome::Report(report.clone()),
            None => ForecastOutcome::NoDataForDate,
        })
    }
}

#[derive(Debug, Clone)]
pub enum WeatherBackend {
    OpenWeather(OpenWeatherClient),
    Static(StaticWeather),
}

impl WeatherProvider for WeatherBackend {
    async fn forecast(&self, city: &str, date: NaiveDate) -> Result<ForecastOutcome, ProviderError> {
        match self {
            Self::OpenWeather(client) => client.forecast(city, date).await,
            Self::Static(fixed) => fixed.forecast(city, date).await,
        }
    }
}
