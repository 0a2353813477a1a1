use crate::error::{AdGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    #[value(name = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    #[value(name = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    #[value(name = "4:3")]
    Landscape4x3,
    #[serde(rename = "9:16")]
    #[value(name = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    #[value(name = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one image to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    model: String,
    aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(AdGenError::InvalidArgument("prompt must not be empty".into()));
        }
        Ok(Self {
            prompt,
            model: DEFAULT_MODEL.to_string(),
            aspect_ratio: AspectRatio::default(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
}

impl GenerationResult {
    /// "png" iff the media type contains "png", "jpg" for everything else.
    pub fn extension(&self) -> &'static str {
        extension_for(&self.mime_type)
    }
}

pub fn extension_for(mime_type: &str) -> &'static str {
    if mime_type.contains("png") {
        "png"
    } else {
        "jpg"
    }
}

// Gemini generateContent wire types

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(alias = "prompt_feedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    #[serde(alias = "finish_reason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    pub text: Option<String>,
    #[serde(alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(alias = "block_reason")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GeminiErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl GeminiResponse {
    pub fn parts(&self) -> impl Iterator<Item = &GeminiPart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// Block reason or abnormal finish reason, for error reporting.
    pub fn stop_reason(&self) -> Option<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Some(format!("prompt blocked: {}", reason));
        }
        self.candidates
            .iter()
            .filter_map(|c| c.finish_reason.as_deref())
            .find(|r| *r != "STOP")
            .map(|r| format!("finish reason: {}", r))
    }
}
