use crate::{
    config::{Config, GeminiConfig, ImageKitConfig},
    error::Result,
    logger::{LogLevel, LoggerConfig},
    models::{AspectRatio, GenerationRequest, Variation, DEFAULT_MODEL},
    pipeline::PipelineRequest,
    storage::{DEFAULT_CAMPAIGN, DEFAULT_FOLDER},
};

/// Generate an ad creative with Google Gemini and print the result as JSON.
///
/// Without `--upload` the image is returned inline as base64. With `--upload`
/// it is pushed to ImageKit and the public URL is returned instead.
#[derive(Debug, clap::Parser)]
#[command(name = "adgen", version)]
pub struct Cli {
    /// Text prompt for image generation
    #[arg(long)]
    pub prompt: String,

    /// Variation identifier
    #[arg(long, value_enum, default_value_t = Variation::A)]
    pub variation: Variation,

    /// Gemini model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Image aspect ratio
    #[arg(long, value_enum, default_value_t = AspectRatio::Square)]
    pub aspect_ratio: AspectRatio,

    /// Google API key (overrides GOOGLE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Upload the image to ImageKit instead of returning it inline
    #[arg(long)]
    pub upload: bool,

    /// Campaign identifier used in upload file names and tags
    #[arg(long, default_value = DEFAULT_CAMPAIGN)]
    pub campaign_id: String,

    /// ImageKit folder to upload into
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,

    /// Log verbosity on stderr; debug and trace add file locations
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Emit log lines on stderr as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Reads credentials from the process environment; `--api-key` wins.
    pub fn to_config(&self) -> Config {
        let imagekit = self.upload.then(ImageKitConfig::from_env);
        self.apply_overrides(Config::from_env(), imagekit)
    }

    pub fn to_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Config {
        let config = Config::new().with_gemini(GeminiConfig::from_lookup(&lookup));
        let imagekit = self.upload.then(|| ImageKitConfig::from_lookup(&lookup));
        self.apply_overrides(config, imagekit)
    }

    fn apply_overrides(&self, mut config: Config, imagekit: Option<ImageKitConfig>) -> Config {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            config.gemini = config.gemini.with_api_key(key);
        }
        match imagekit {
            Some(imagekit) => config.with_imagekit(imagekit),
            None => config,
        }
    }

    pub fn pipeline_request(&self) -> Result<PipelineRequest> {
        let generation = GenerationRequest::new(self.prompt.clone())?
            .with_model(self.model.clone())
            .with_aspect_ratio(self.aspect_ratio);

        Ok(PipelineRequest::new(generation, self.variation)
            .with_campaign(self.campaign_id.clone())
            .with_folder(self.folder.clone()))
    }

    pub fn logger_config(&self) -> LoggerConfig {
        let config = if self.json_logs {
            LoggerConfig::production()
        } else if self.log_level <= LogLevel::Debug {
            LoggerConfig::development()
        } else {
            LoggerConfig::default()
        };
        config.with_level(self.log_level)
    }
}
