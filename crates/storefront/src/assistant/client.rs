//! Gemini `generateContent` client.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use techsphere_core::Product;

use super::{
    AssistantError, EMPTY_REPLY, SYSTEM_INSTRUCTION, UNAVAILABLE_REPLY, product_context,
};
use crate::config::AssistantConfig;

const TEMPERATURE: f32 = 0.6;
const TOP_P: f32 = 0.9;
const MAX_OUTPUT_TOKENS: u32 = 150;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Client for the chat assistant.
#[derive(Clone)]
pub struct AssistantClient {
    inner: Arc<AssistantClientInner>,
}

struct AssistantClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

impl AssistantClient {
    /// Create a new assistant client.
    #[must_use]
    pub fn new(config: &AssistantConfig) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_base.as_str().trim_end_matches('/'),
            config.model
        );

        Self {
            inner: Arc::new(AssistantClientInner {
                client: reqwest::Client::new(),
                endpoint,
                model: config.model.clone(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.api_key.is_some()
    }

    /// Answer `message` with `products` as context.
    ///
    /// Never fails: an empty answer becomes [`EMPTY_REPLY`] and any error
    /// becomes [`UNAVAILABLE_REPLY`].
    pub async fn ask(&self, message: &str, products: &[Product]) -> String {
        match self.generate(message, products).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(model = %self.inner.model, "Assistant returned no text");
                EMPTY_REPLY.to_string()
            }
            Ok(text) => text.trim().to_string(),
            Err(AssistantError::NotConfigured) => {
                warn!("Assistant called without an API key");
                UNAVAILABLE_REPLY.to_string()
            }
            Err(e) => {
                error!(error = %e, model = %self.inner.model, "Assistant request failed");
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }

    /// Send one `generateContent` request and return the raw generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured, the request fails, the
    /// API answers with an error status, or the body is malformed.
    #[instrument(skip(self, message, products), fields(model = %self.inner.model, products = products.len()))]
    pub async fn generate(
        &self,
        message: &str,
        products: &[Product],
    ) -> Result<String, AssistantError> {
        let api_key = self
            .inner
            .api_key
            .as_ref()
            .ok_or(AssistantError::NotConfigured)?;

        let prompt = format!(
            "Contexto TechSphere: {}\nUser: {message}",
            product_context(products)
        );
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(AssistantError::RateLimited(retry_after));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AssistantError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body).map_or_else(
                |_| body.chars().take(200).collect(),
                |e| e.error.message,
            );
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        let text = parsed.text();
        debug!(chars = text.len(), "Assistant replied");
        Ok(text)
    }
}
