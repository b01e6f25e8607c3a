//! Gemini `generateContent` REST client.
//!
//! Thin HTTP wrapper around `/v1beta/models/{model}:generateContent`. Layout
//! and text requests go to the text model, preview and ambience images to the
//! image model. Response handling lives in pure `parse_*` functions so it can
//! be tested without a network.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parse::parse_layout_response;
use super::prompt::{ambience_prompt, correction_prompt, layout_prompt, realistic_view_prompt};
use super::types::{BridgeError, ImageData, LayoutRequest, RenderRequest};
use super::LayoutBridge;
use crate::layout::Layout;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Finish reasons that mean the output was withheld for content safety
const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
];

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub image_model: String,
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: Timeouts::default(),
        }
    }

    /// Build the config from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`
    ///
    /// Optional:
    /// - `GEMINI_MODEL`: default `gemini-2.5-flash`
    /// - `GEMINI_IMAGE_MODEL`: default `gemini-2.5-flash-image`
    /// - `GEMINI_BASE_URL`: default public v1beta endpoint
    /// - `GEMINI_REQUEST_TIMEOUT_SECS`: default 120
    /// - `GEMINI_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BridgeError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BridgeError::MissingApiKey {
                var: "GEMINI_API_KEY".into(),
            })?;
        let parse_secs = |key: &str, default: u64| -> Result<u64, BridgeError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| {
                        BridgeError::ConfigParse(format!(
                            "{key} must be a whole number of seconds, got '{raw}'"
                        ))
                    }),
            }
        };
        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            image_model: lookup("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeouts: Timeouts {
                request_secs: parse_secs(
                    "GEMINI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
                connect_secs: parse_secs(
                    "GEMINI_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )?,
            },
        })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BridgeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, BridgeError> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate(&self, model: &str, body: &ApiRequest) -> Result<String, BridgeError> {
        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);
        debug!(%model, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        if status != 200 {
            return Err(BridgeError::Status { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait(?Send)]
impl LayoutBridge for GeminiClient {
    async fn request_layout(&self, request: &LayoutRequest) -> Result<Layout, BridgeError> {
        let mut parts = vec![Part::text(layout_prompt(request))];
        if let Some(photo) = &request.reference_photo {
            parts.push(Part::image(photo));
        }
        let body = ApiRequest::new(parts).with_config(GenerationConfig::json());
        let json = self.generate(&self.config.model, &body).await?;
        let layout = parse_layout_response(&parse_text_response(&json)?)?;
        info!(items = layout.len(), "received generated layout");
        Ok(layout)
    }

    async fn request_photorealistic_render(
        &self,
        request: &RenderRequest,
    ) -> Result<String, BridgeError> {
        let parts = vec![
            Part::image(&request.reference_photo),
            Part::text(realistic_view_prompt(&request.layout, &request.ambience)),
        ];
        let body = ApiRequest::new(parts).with_config(GenerationConfig::image());
        let json = self.generate(&self.config.image_model, &body).await?;
        parse_image_response(&json)
    }

    async fn request_ambience(&self, description: &str) -> Result<String, BridgeError> {
        let body = ApiRequest::new(vec![Part::text(ambience_prompt(description))])
            .with_config(GenerationConfig::image());
        let json = self.generate(&self.config.image_model, &body).await?;
        parse_image_response(&json)
    }

    async fn correct_text(&self, text: &str) -> Result<String, BridgeError> {
        let body = ApiRequest::new(vec![Part::text(correction_prompt(text))]);
        let json = self.generate(&self.config.model, &body).await?;
        Ok(parse_text_response(&json)?.trim().to_string())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl ApiRequest {
    fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: None,
        }
    }

    fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    fn image(image: &ImageData) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.base64(),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

impl GenerationConfig {
    fn json() -> Self {
        Self {
            response_mime_type: Some("application/json"),
            ..Self::default()
        }
    }

    fn image() -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE"]),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_api_response(json: &str) -> Result<ApiResponse, BridgeError> {
    let api: ApiResponse = serde_json::from_str(json)
        .map_err(|e| BridgeError::malformed(format!("unexpected response body: {}", e)))?;
    if let Some(reason) = api
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(BridgeError::SafetyRejected { reason });
    }
    Ok(api)
}

fn parts(api: &ApiResponse) -> impl Iterator<Item = &Part> {
    api.candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
}

/// A safety finish reason explains an otherwise empty answer
fn safety_or_empty(api: &ApiResponse, what: &str) -> BridgeError {
    let reason = api
        .candidates
        .iter()
        .filter_map(|c| c.finish_reason.as_deref())
        .find(|r| SAFETY_FINISH_REASONS.contains(r));
    match reason {
        Some(reason) => BridgeError::SafetyRejected {
            reason: reason.to_string(),
        },
        None => BridgeError::empty(format!("no {} in the response", what)),
    }
}

/// Text parts of every candidate, concatenated in order
pub fn parse_text_response(json: &str) -> Result<String, BridgeError> {
    let api = parse_api_response(json)?;
    let text: String = parts(&api).filter_map(|p| p.text.as_deref()).collect();
    if text.trim().is_empty() {
        return Err(safety_or_empty(&api, "text"));
    }
    Ok(text)
}

/// The first inline image of the response, as a data URL
pub fn parse_image_response(json: &str) -> Result<String, BridgeError> {
    let api = parse_api_response(json)?;
    let url = parts(&api)
        .find_map(|p| p.inline_data.as_ref())
        .map(|image| format!("data:{};base64,{}", image.mime_type, image.data));
    url.ok_or_else(|| safety_or_empty(&api, "image"))
}
