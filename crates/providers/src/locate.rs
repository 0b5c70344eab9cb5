use serde::Deserialize;
use url::Url;

use crate::error::ProviderError;

const SERVICE: &str = "ip-locate";
const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// Best-effort starting-point lookup from the caller's public IP. Used only
/// when the request leaves the starting point blank; every failure is a plain
/// `None` for the caller to substitute its own default.
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    city: Option<String>,
    country: Option<String>,
}

impl IpLocator {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("static base url"),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub async fn current_city(&self) -> Result<Option<String>, ProviderError> {
        let endpoint = format!("{}/json", self.base_url.as_str().trim_end_matches('/'));

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        let payload: IpLookupResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if payload.status != "success" {
            return Ok(None);
        }

        Ok(match (payload.city, payload.country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(city), None) => Some(city),
            _ => None,
        })
    }
}
