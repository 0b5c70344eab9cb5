use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::ProviderError;

const SERVICE: &str = "generation";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Generative text collaborator. One call, one prompt, free-form text back;
/// no retry policy at this seam.
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("static base url"),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        );

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::transport(SERVICE, error))?;

        let text = payload
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::payload(SERVICE, "empty candidate text"));
        }

        Ok(text)
    }
}

#[derive(Debug)]
enum ScriptedReply {
    Text(String),
    Failure,
}

/// Offline generation backend: replays queued replies in order, then falls
/// back to a fixed canned reply when one is configured. Records every prompt
/// it receives so tests can assert on prompt contents.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGeneration {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    canned_reply: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that always answers with the same text once the queue is empty.
    pub fn canned(reply: impl Into<String>) -> Self {
        Self {
            canned_reply: Some(reply.into()),
            ..Self::default()
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply::Text(text.into()));
    }

    pub fn push_failure(&self) {
        self.replies.lock().push_back(ScriptedReply::Failure);
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl GenerationProvider for ScriptedGeneration {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());

        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure) => Err(ProviderError::Unavailable {
                service: SERVICE,
                detail: "scripted failure".to_string(),
            }),
            None => match &self.canned_reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(ProviderError::Unavailable {
                    service: SERVICE,
                    detail: "scripted reply queue exhausted".to_string(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum GenerationBackend {
    Gemini(GeminiClient),
    Scripted(ScriptedGeneration),
}

impl GenerationProvider for GenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::Scripted(scripted) => scripted.generate(prompt).await,
        }
    }
}
