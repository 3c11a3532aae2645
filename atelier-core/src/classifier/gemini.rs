//! Gemini-backed classifier implementation.
//!
//! Calls the Gemini `generateContent` REST endpoint with a JSON response
//! schema so verdicts come back as structured JSON rather than free prose.
//! A single attempt per check with an explicit timeout; retry policy is
//! deliberately absent; an outage is handled by the fail-open policy at
//! the orchestration boundary, not here.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{ImageClassifier, ImageVerdict, TextClassifier, TextVerdict};
use crate::error::{CoreError, Result};

/// Default Gemini API base URL.
const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for both checks.
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default timeout for classifier requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Gemini classifier client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API base URL.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_API_URL`, `GEMINI_MODEL`, `CLASSIFIER_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            CoreError::ClassifierUnavailable("GEMINI_API_KEY environment variable not set".into())
        })?;

        let api_url =
            std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            api_url,
            api_key,
            model,
            timeout,
        })
    }
}

/// Gemini HTTP classifier implementing both check ports.
pub struct GeminiClassifier {
    client: Client,
    config: GeminiConfig,
}

/// Wire format of the text verdict JSON emitted by the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextVerdictWire {
    is_likely_mass_produced: bool,
    confidence_score: f64,
    reason: String,
}

/// Wire format of the image verdict JSON emitted by the model.
#[derive(Debug, Deserialize)]
struct ImageVerdictWire {
    safe: bool,
    flagged: bool,
    reason: String,
}

/// Subset of the `generateContent` response we care about.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClassifier {
    /// Create a classifier from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Create a classifier with explicit configuration.
    #[instrument(level = "debug", skip_all, fields(
        api_url = %config.api_url,
        model = %config.model,
        timeout_ms = config.timeout.as_millis() as u64
    ))]
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(config.api_url.starts_with("https://"))
            .build()
            .map_err(|e| {
                warn!(error = %e, "failed to create classifier HTTP client");
                CoreError::ClassifierUnavailable(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_url, self.config.model, self.config.api_key
        )
    }

    /// POST a `generateContent` request and pull the JSON text out of the
    /// first candidate part.
    async fn generate(&self, body: serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::ClassifierUnavailable(format!(
                "classifier API returned HTTP {status}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                CoreError::InvalidClassifierResponse("response contained no text part".into())
            })
    }
}

#[async_trait]
impl TextClassifier for GeminiClassifier {
    #[instrument(level = "debug", skip_all, fields(title_len = title.len()))]
    async fn classify_listing_text(&self, title: &str, description: &str) -> Result<TextVerdict> {
        let prompt = format!(
            "You are a marketplace integrity reviewer for a handmade-goods platform. \
             Assess whether the following listing text describes a mass-produced item \
             rather than a genuinely handmade one. Look for wholesale quantities, \
             factory or dropshipping language, and generic catalog phrasing.\n\n\
             Title: {title}\nDescription: {description}"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "isLikelyMassProduced": { "type": "BOOLEAN" },
                        "confidenceScore": { "type": "NUMBER", "description": "0 to 1" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["isLikelyMassProduced", "confidenceScore", "reason"]
                }
            }
        });

        let text = self.generate(body).await?;
        let wire: TextVerdictWire = serde_json::from_str(&text).map_err(|e| {
            CoreError::InvalidClassifierResponse(format!("bad text verdict JSON: {e}"))
        })?;

        debug!(
            likely_mass_produced = wire.is_likely_mass_produced,
            confidence = wire.confidence_score,
            "text integrity check completed"
        );

        Ok(TextVerdict {
            likely_mass_produced: wire.is_likely_mass_produced,
            confidence: wire.confidence_score,
            reason: wire.reason,
        }
        .clamped())
    }
}

#[async_trait]
impl ImageClassifier for GeminiClassifier {
    #[instrument(level = "debug", skip_all, fields(bytes = image.len(), mime = %mime_type))]
    async fn classify_image(&self, image: &[u8], mime_type: &str) -> Result<ImageVerdict> {
        let prompt = "You are a marketplace integrity reviewer for a handmade-goods platform. \
                      Assess this product photo. Set safe=false only for prohibited content. \
                      Set flagged=true when the photo looks like stock photography, a catalog \
                      render, or otherwise not a genuine artisan's product shot. Always give \
                      a short reason when safe is false or flagged is true.";

        let body = json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(image) } },
                    { "text": prompt }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "safe": { "type": "BOOLEAN" },
                        "flagged": { "type": "BOOLEAN" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["safe", "flagged", "reason"]
                }
            }
        });

        let text = self.generate(body).await?;
        let wire: ImageVerdictWire = serde_json::from_str(&text).map_err(|e| {
            CoreError::InvalidClassifierResponse(format!("bad image verdict JSON: {e}"))
        })?;

        debug!(
            safe = wire.safe,
            flagged = wire.flagged,
            "image integrity check completed"
        );

        Ok(ImageVerdict {
            safe: wire.safe,
            flagged: wire.flagged,
            reason: wire.reason,
        })
    }
}
