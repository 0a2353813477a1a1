use crate::error::{AdGenError, Result};
use std::env;
use std::time::Duration;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GEMINI_API_BASE: &str = "GEMINI_API_BASE";
pub const IMAGEKIT_PRIVATE_KEY: &str = "IMAGEKIT_PRIVATE_KEY";
pub const IMAGEKIT_PUBLIC_KEY: &str = "IMAGEKIT_PUBLIC_KEY";
pub const IMAGEKIT_URL_ENDPOINT: &str = "IMAGEKIT_URL_ENDPOINT";
pub const IMAGEKIT_UPLOAD_URL: &str = "IMAGEKIT_UPLOAD_URL";
pub const HTTP_TIMEOUT_SECS: &str = "ADGEN_HTTP_TIMEOUT_SECS";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGEKIT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ImageKitConfig {
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub url_endpoint: Option<String>,
    pub upload_url: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub imagekit: Option<ImageKitConfig>,
}

/// Treats unset and blank variables the same way.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn timeout_from(lookup: &impl Fn(&str) -> Option<String>) -> Option<Duration> {
    lookup(HTTP_TIMEOUT_SECS)
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: None,
            timeout: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        GeminiConfig {
            api_key: non_empty(lookup(GOOGLE_API_KEY)),
            base_url: non_empty(lookup(GEMINI_API_BASE)),
            timeout: timeout_from(&lookup),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AdGenError::MissingCredential(format!(
                    "Google API key not found. Set {} environment variable or pass --api-key",
                    GOOGLE_API_KEY
                ))
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
            .trim_end_matches('/')
    }
}

impl Default for ImageKitConfig {
    fn default() -> Self {
        ImageKitConfig {
            private_key: None,
            public_key: None,
            url_endpoint: None,
            upload_url: None,
            timeout: None,
        }
    }
}

impl ImageKitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ImageKitConfig {
            private_key: non_empty(lookup(IMAGEKIT_PRIVATE_KEY)),
            public_key: non_empty(lookup(IMAGEKIT_PUBLIC_KEY)),
            url_endpoint: non_empty(lookup(IMAGEKIT_URL_ENDPOINT)),
            upload_url: non_empty(lookup(IMAGEKIT_UPLOAD_URL)),
            timeout: timeout_from(&lookup),
        }
    }

    pub fn with_credentials(
        mut self,
        private_key: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        self.private_key = Some(private_key.into());
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_url_endpoint(mut self, url_endpoint: impl Into<String>) -> Self {
        self.url_endpoint = Some(url_endpoint.into());
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = Some(upload_url.into());
        self
    }

    /// Fails on the first missing variable, in declaration order.
    pub fn validate(&self) -> Result<()> {
        let required = [
            (IMAGEKIT_PRIVATE_KEY, &self.private_key),
            (IMAGEKIT_PUBLIC_KEY, &self.public_key),
            (IMAGEKIT_URL_ENDPOINT, &self.url_endpoint),
        ];
        for (name, value) in required {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Err(AdGenError::MissingCredential(format!(
                    "ImageKit credentials not found. Set {} environment variable",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn upload_url(&self) -> &str {
        self.upload_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGEKIT_UPLOAD_URL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            imagekit: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gemini settings only; the upload stage is opted into with `with_imagekit`.
    pub fn from_env() -> Self {
        Config {
            gemini: GeminiConfig::from_env(),
            imagekit: None,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_imagekit(mut self, config: ImageKitConfig) -> Self {
        self.imagekit = Some(config);
        self
    }

    pub fn upload_enabled(&self) -> bool {
        self.imagekit.is_some()
    }

    /// Checks every credential the configured stages need, Gemini first.
    pub fn validate(&self) -> Result<()> {
        self.gemini.api_key()?;
        if let Some(imagekit) = &self.imagekit {
            imagekit.validate()?;
        }
        Ok(())
    }
}
