use daytour_core::NewsItem;
use serde::Deserialize;
use url::Url;

use crate::error::ProviderError;

const SERVICE: &str = "news";
const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Recent-article search. Articles missing a title or a summary are dropped at
/// this boundary so the risk filter only ever sees complete items.
pub trait NewsProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        language: &str,
    ) -> Result<Vec<NewsItem>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
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
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
}

impl NewsProvider for NewsApiClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        language: &str,
    ) -> Result<Vec<NewsItem>, ProviderError> {
        let endpoint = format!(
            "{}/v2/everything",
            self.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .http
            .get(&endpoint)
            .query(&[
                ("q", query),
                ("pageSize", max_results.to_string().as_str()),
                ("language", language),
                ("apiKey", self.api_key.as_str()),
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

        let payload: EverythingResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        Ok(payload
            .articles
            .into_iter()
            .filter_map(|article| match (article.title, article.description) {
                (Some(title), Some(summary)) => Some(NewsItem { title, summary }),
                _ => None,
            })
            .take(max_results)
            .collect())
    }
}

/// Offline news backend serving a fixed article list; `unavailable()` models a
/// provider that fails outright.
#[derive(Debug, Clone, Default)]
pub struct StaticNews {
    items: Vec<NewsItem>,
    fail: bool,
}

impl StaticNews {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<NewsItem>) -> Self {
        Self { items, fail: false }
    }

    /// Backend whose every call errors.
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl NewsProvider for StaticNews {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
        _language: &str,
    ) -> Result<Vec<NewsItem>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Unavailable {
                service: SERVICE,
                detail: "static backend configured to fail".to_string(),
            });
        }
        Ok(self.items.iter().take(max_results).cloned().collect())
    }
}

#[derive(Debug, Clone)]
pub enum NewsBackend {
    NewsApi(NewsApiClient),
    Static(StaticNews),
}

impl NewsProvider for NewsBackend {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        language: &str,
    ) -> Result<Vec<NewsItem>, ProviderError> {
        match self {
            Self::NewsApi(client) => client.search(query, max_results, language).await,
            Self::Static(fixed) => fixed.search(query, max_results, language).await,
        }
    }
}
