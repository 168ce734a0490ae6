/// Gemini client recommending mask levels
use std::time::Duration;

use async_trait::async_trait;
use complimask_core::{Suggestion, SuggestionProvider};
use complimask_domain::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use complimask_domain::{GeminiSettings, MaskError, MaskLevel, Result};
use reqwest::Method;
use tracing::{debug, warn};

use crate::http::HttpClient;

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GeminiError, GenerationConfig, Part,
};

pub const GEMINI_PROVIDER: &str = "gemini";

const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8;

/// Longest value shape sent upstream.
const MAX_SHAPE_CHARS: usize = 64;

/// Generative suggestion provider over the Gemini `generateContent` API
///
/// Only the value's shape (character classes and length) leaves the
/// process; the raw value is never sent.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Build a client from service settings.
    ///
    /// Requests are single-attempt: the suggestion chain owns the call
    /// budget, so retries would only eat into it.
    ///
    /// # Errors
    /// Returns `GeminiError::Authentication` for an empty key and
    /// `GeminiError::Network` if the HTTP client cannot be built.
    pub fn from_settings(
        settings: &GeminiSettings,
        timeout: Duration,
    ) -> std::result::Result<Self, GeminiError> {
        if settings.api_key.trim().is_empty() {
            return Err(GeminiError::Authentication("API key is empty".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("complimask/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| GeminiError::Network(err.to_string()))?;

        Ok(Self::new(settings.api_key.clone(), http_client)
            .with_model(settings.model.clone())
            .with_base_url(settings.base_url.clone()))
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another endpoint; a trailing `/` is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model the client queries.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a level.
    ///
    /// Returns `Ok(None)` when the reply is not exactly one suggestible
    /// level token.
    ///
    /// # Errors
    /// Returns `GeminiError` for network failures, API errors, or invalid
    /// responses.
    pub async fn suggest_level(
        &self,
        value: &str,
        data_type: &str,
        role: &str,
    ) -> std::result::Result<Option<MaskLevel>, GeminiError> {
        let prompt = build_prompt(value, data_type, role);
        let text = self.call_api(prompt).await?;
        let level = parse_level(&text);

        if level.is_none() {
            debug!(data_type, role, reply_len = text.len(), "Gemini reply is not a level token");
        }

        Ok(level)
    }

    async fn call_api(&self, prompt: String) -> std::result::Result<String, GeminiError> {
        let payload = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let request_builder = self
            .http_client
            .request(Method::POST, url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload);

        let response = self
            .http_client
            .send(request_builder)
            .await
            .map_err(|err| GeminiError::Network(err.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), model = %self.model, "Received Gemini API response");

        if !status.is_success() {
            return Err(handle_error_status(status.as_u16(), response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidSchema(format!("Failed to parse response: {e}")))?;

        body.first_text().map(str::to_string).ok_or_else(|| {
            GeminiError::InvalidSchema("Response contained no candidates".to_string())
        })
    }
}

async fn handle_error_status(status: u16, response: reqwest::Response) -> GeminiError {
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        401 | 403 => GeminiError::Authentication(format!("Invalid API key ({status})")),
        429 => GeminiError::RateLimit,
        _ => {
            warn!(status, "Gemini API error");
            GeminiError::Api { status, message }
        }
    }
}

fn build_prompt(value: &str, data_type: &str, role: &str) -> String {
    let levels: Vec<&str> = MaskLevel::ALL
        .into_iter()
        .filter(|level| level.is_suggestible())
        .map(MaskLevel::as_str)
        .collect();

    format!(
        "Return only one token level from: {levels} for:\n\
         valueShape={shape}\n\
         valueLength={length}\n\
         dataType={data_type}\n\
         role={role}\n\
         Respond with exactly the level text.",
        levels = levels.join(", "),
        shape = value_shape(value),
        length = value.chars().count(),
    )
}

/// Character-class outline of a value: digits become `9`, letters `a`,
/// everything else is kept. Truncated to a fixed length.
pub fn value_shape(value: &str) -> String {
    value
        .chars()
        .take(MAX_SHAPE_CHARS)
        .map(|c| {
            if c.is_ascii_digit() {
                '9'
            } else if c.is_alphabetic() {
                'a'
            } else if c.is_whitespace() {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Accept a reply only if, once trimmed, it is exactly one suggestible
/// level name.
fn parse_level(text: &str) -> Option<MaskLevel> {
    let token = text.trim();
    MaskLevel::ALL
        .into_iter()
        .filter(|level| level.is_suggestible())
        .find(|level| level.as_str() == token)
}

impl From<GeminiError> for MaskError {
    fn from(err: GeminiError) -> Self {
        Self::provider(GEMINI_PROVIDER, err.to_string())
    }
}

#[async_trait]
impl SuggestionProvider for GeminiClient {
    fn name(&self) -> &str {
        GEMINI_PROVIDER
    }

    async fn suggest(
        &self,
        value: &str,
        data_type: &str,
        role: &str,
    ) -> Result<Option<Suggestion>> {
        let level = self.suggest_level(value, data_type, role).await?;
        Ok(level.map(Suggestion::Single))
    }
}
