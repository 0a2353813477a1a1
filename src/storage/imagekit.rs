use crate::{
    config::ImageKitConfig,
    error::{AdGenError, Result},
    logger,
    models::{UploadRequest, UploadResult},
    storage::traits::MediaStorage,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{multipart::Form, Client};
use serde_json::Value;

pub struct ImageKitStorage {
    client: Client,
    private_key: String,
    upload_url: String,
    url_endpoint: String,
}

impl ImageKitStorage {
    pub fn new(config: ImageKitConfig) -> Result<Self> {
        config.validate()?;

        let upload_url = config.upload_url().to_string();
        let private_key = config
            .private_key
            .ok_or_else(|| AdGenError::MissingCredential("ImageKit private key is required".into()))?;
        let url_endpoint = config
            .url_endpoint
            .ok_or_else(|| AdGenError::MissingCredential("ImageKit URL endpoint is required".into()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdGenError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("ImageKit client initialized for {}", url_endpoint);
        Ok(Self {
            client,
            private_key,
            upload_url,
            url_endpoint,
        })
    }

    pub fn url_endpoint(&self) -> &str {
        &self.url_endpoint
    }

    pub fn build_form(request: &UploadRequest) -> Form {
        let mut form = Form::new()
            .text("file", STANDARD.encode(&request.bytes))
            .text("fileName", request.file_name.clone())
            .text("folder", request.folder.clone())
            .text("useUniqueFileName", "true");
        if !request.tags.is_empty() {
            form = form.text("tags", request.tags.join(","));
        }
        form
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl MediaStorage for ImageKitStorage {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResult> {
        log::info!(
            "Uploading {} ({} bytes) to folder {}",
            request.file_name,
            request.bytes.len(),
            request.folder
        );
        let _timer = logger::timer("imagekit upload");

        let response = self
            .client
            .post(&self.upload_url)
            .basic_auth(&self.private_key, None::<&str>)
            .multipart(Self::build_form(&request))
            .send()
            .await
            .map_err(|e| AdGenError::UploadError(format!("ImageKit request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdGenError::UploadError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::error!("ImageKit returned {}: {}", status, body);
            return Err(AdGenError::UploadError(format!(
                "ImageKit API error {}: {}",
                status,
                Self::error_message(&body)
            )));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            AdGenError::UploadError(format!("Malformed ImageKit response: {}", e))
        })?;
        let result = UploadResult::from_response(&json, &request.file_name)?;

        log::info!("Upload complete: {}", result.url);
        Ok(result)
    }
}
