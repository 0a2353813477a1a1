use crate::{
    config::GeminiConfig,
    error::{AdGenError, Result},
    gemini::ImageGenerator,
    logger,
    models::{GeminiErrorEnvelope, GeminiResponse, GenerationRequest, GenerationResult},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_MIME_TYPE: &str = "image/png";
const PROMPT_LOG_CHARS: usize = 100;

#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let base_url = config.base_url().to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdGenError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("Gemini client initialized successfully");
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    pub fn build_payload(request: &GenerationRequest) -> Value {
        json!({
            "contents": [
                {
                    "parts": [{ "text": request.prompt() }]
                }
            ],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": {
                    "aspectRatio": request.aspect_ratio().as_str()
                }
            }
        })
    }

    /// Returns the first inline image, logging any text parts seen before it.
    pub fn decode_response(response: &GeminiResponse) -> Result<GenerationResult> {
        for part in response.parts() {
            if let Some(inline) = &part.inline_data {
                if inline.data.is_empty() {
                    continue;
                }
                let image_bytes = STANDARD.decode(inline.data.trim()).map_err(|e| {
                    AdGenError::GenerationError(format!("Invalid base64 image payload: {}", e))
                })?;
                let mime_type = inline
                    .mime_type
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

                log::info!(
                    "Image generated successfully: {}, {} bytes",
                    mime_type,
                    image_bytes.len()
                );
                return Ok(GenerationResult {
                    image_bytes,
                    mime_type,
                });
            }
            if let Some(text) = &part.text {
                log::info!("Generated text: {}", text);
            }
        }

        let mut message = "No image data found in Gemini response".to_string();
        if let Some(reason) = response.stop_reason() {
            message.push_str(&format!(" ({})", reason));
        }
        Err(AdGenError::GenerationError(message))
    }

    fn error_message(body: &str) -> String {
        match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) => {
                let message = envelope.error.message.unwrap_or_default();
                match envelope.error.status {
                    Some(status) => format!("{} - {}", status, message),
                    None => message,
                }
            }
            Err(_) => body.to_string(),
        }
    }
}

fn truncate(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        log::info!(
            "Generating image with prompt: {}...",
            truncate(request.prompt(), PROMPT_LOG_CHARS)
        );
        log::debug!(
            "Model: {}, aspect ratio: {}",
            request.model(),
            request.aspect_ratio()
        );
        let _timer = logger::timer("gemini generateContent");

        let payload = Self::build_payload(request);
        let response = self
            .client
            .post(self.endpoint(request.model()))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {:?}", e);
                AdGenError::GenerationError(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdGenError::GenerationError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(AdGenError::GenerationError(format!(
                "Gemini API error {}: {}",
                status,
                Self::error_message(&body)
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            AdGenError::GenerationError(format!("Malformed Gemini response: {}", e))
        })?;

        Self::decode_response(&parsed)
    }
}
