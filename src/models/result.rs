use crate::error::{AdGenError, Result};
use crate::models::UploadResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the parallel ad creatives of a campaign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Variation {
    #[default]
    #[value(name = "A")]
    A,
    #[value(name = "B")]
    B,
}

impl Variation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variation::A => "A",
            Variation::B => "B",
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutput {
    Inline {
        image_data: String,
        mime_type: String,
    },
    Hosted {
        upload: UploadResult,
        mime_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Inline {
        image_data: String,
        mime_type: String,
        prompt_used: String,
    },
    Hosted {
        image_url: String,
        thumbnail_url: Option<String>,
        file_id: String,
        mime_type: String,
        prompt_used: String,
    },
    Failed {
        error: String,
    },
}

/// The single JSON object printed per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<Variation>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ScriptResult {
    pub fn from_outcome(
        variation: Variation,
        prompt: &str,
        outcome: Result<PipelineOutput>,
    ) -> Self {
        match outcome {
            Ok(output) => Self::success(variation, prompt, output),
            Err(err) => Self::failure(Some(variation), &err),
        }
    }

    pub fn success(variation: Variation, prompt: &str, output: PipelineOutput) -> Self {
        let outcome = match output {
            PipelineOutput::Inline {
                image_data,
                mime_type,
            } => Outcome::Inline {
                image_data,
                mime_type,
                prompt_used: prompt.to_string(),
            },
            PipelineOutput::Hosted { upload, mime_type } => Outcome::Hosted {
                image_url: upload.url,
                thumbnail_url: upload.thumbnail_url,
                file_id: upload.file_id,
                mime_type,
                prompt_used: prompt.to_string(),
            },
        };
        ScriptResult {
            success: true,
            variation_id: Some(variation),
            outcome,
        }
    }

    pub fn failure(variation: Option<Variation>, err: &AdGenError) -> Self {
        Self::failure_message(variation, err.to_string())
    }

    pub fn failure_message(variation: Option<Variation>, message: impl Into<String>) -> Self {
        ScriptResult {
            success: false,
            variation_id: variation,
            outcome: Outcome::Failed {
                error: message.into(),
            },
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.success {
            0
        } else {
            1
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AdGenError::SerializationError(e.to_string()))
    }
}
