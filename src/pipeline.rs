use crate::{
    config::Config,
    error::Result,
    gemini::{GeminiImageClient, ImageGenerator},
    models::{GenerationRequest, PipelineOutput, ScriptResult, UploadRequest, Variation},
    storage::{self, ImageKitStorage, MediaStorage},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub generation: GenerationRequest,
    pub variation: Variation,
    pub campaign_id: String,
    pub folder: String,
}

impl PipelineRequest {
    pub fn new(generation: GenerationRequest, variation: Variation) -> Self {
        Self {
            generation,
            variation,
            campaign_id: storage::DEFAULT_CAMPAIGN.to_string(),
            folder: storage::DEFAULT_FOLDER.to_string(),
        }
    }

    pub fn with_campaign(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = campaign_id.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

/// Generate, then optionally upload. The first failure aborts the run.
pub struct Pipeline {
    generator: Box<dyn ImageGenerator>,
    storage: Option<Box<dyn MediaStorage>>,
}

impl Pipeline {
    pub fn new(generator: Box<dyn ImageGenerator>) -> Self {
        Self {
            generator,
            storage: None,
        }
    }

    pub fn with_storage(mut self, storage: Box<dyn MediaStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Validates every credential before constructing any client.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let mut pipeline = Self::new(Box::new(GeminiImageClient::new(config.gemini)?));
        if let Some(imagekit) = config.imagekit {
            pipeline = pipeline.with_storage(Box::new(ImageKitStorage::new(imagekit)?));
        }
        Ok(pipeline)
    }

    pub fn uploads(&self) -> bool {
        self.storage.is_some()
    }

    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutput> {
        let generated = self.generator.generate(&request.generation).await?;

        let Some(storage) = &self.storage else {
            return Ok(PipelineOutput::Inline {
                image_data: STANDARD.encode(&generated.image_bytes),
                mime_type: generated.mime_type,
            });
        };

        let upload = UploadRequest {
            file_name: storage::upload_file_name(
                &request.campaign_id,
                request.variation,
                &generated.mime_type,
            ),
            folder: request.folder.clone(),
            tags: storage::upload_tags(&request.campaign_id, request.variation),
            bytes: generated.image_bytes,
        };
        let uploaded = storage.upload(upload).await?;

        Ok(PipelineOutput::Hosted {
            upload: uploaded,
            mime_type: generated.mime_type,
        })
    }

    pub async fn execute(&self, request: &PipelineRequest) -> ScriptResult {
        let outcome = self.run(request).await;
        if let Err(e) = &outcome {
            log::error!("Pipeline failed for variation {}: {}", request.variation, e);
        }
        ScriptResult::from_outcome(request.variation, request.generation.prompt(), outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GeminiConfig, ImageKitConfig},
        error::AdGenError,
        models::{GenerationResult, Outcome, UploadResult},
    };
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    struct FakeGenerator {
        calls: Arc<AtomicUsize>,
        result: Option<GenerationResult>,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or_else(|| {
                AdGenError::GenerationError("No image data found in Gemini response".into())
            })
        }
    }

    struct FakeStorage {
        seen: Arc<Mutex<Vec<UploadRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl MediaStorage for FakeStorage {
        async fn upload(&self, request: UploadRequest) -> Result<UploadResult> {
            let name = request.file_name.clone();
            self.seen.lock().unwrap().push(request);
            if self.fail {
                return Err(AdGenError::UploadError("No URL found in upload response".into()));
            }
            Ok(UploadResult {
                url: format!("https://ik.imagekit.io/demo/ad-creatives/{}", name),
                file_id: "file-123".into(),
                name,
                thumbnail_url: Some("https://ik.imagekit.io/demo/thumb.png".into()),
            })
        }
    }

    fn png() -> GenerationResult {
        GenerationResult {
            image_bytes: b"\x89PNG fake".to_vec(),
            mime_type: "image/png".into(),
        }
    }

    fn generator(result: Option<GenerationResult>) -> (Box<FakeGenerator>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(FakeGenerator {
                calls: calls.clone(),
                result,
            }),
            calls,
        )
    }

    fn request(variation: Variation) -> PipelineRequest {
        PipelineRequest::new(
            GenerationRequest::new("cozy cabin, warm light, ad headline space").unwrap(),
            variation,
        )
    }

    #[tokio::test]
    async fn test_inline_run_encodes_bytes() {
        let (generator, calls) = generator(Some(png()));
        let pipeline = Pipeline::new(generator);
        assert!(!pipeline.uploads());

        let output = pipeline.run(&request(Variation::A)).await.unwrap();
        assert_eq!(
            output,
            PipelineOutput::Inline {
                image_data: STANDARD.encode(b"\x89PNG fake"),
                mime_type: "image/png".into(),
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hosted_run_uploads_generated_bytes() {
        let (generator, _) = generator(Some(png()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(generator).with_storage(Box::new(FakeStorage {
            seen: seen.clone(),
            fail: false,
        }));

        let req = request(Variation::B)
            .with_campaign("winter")
            .with_folder("/campaigns/winter");
        let result = pipeline.execute(&req).await;
        assert!(result.success);
        assert_eq!(result.variation_id, Some(Variation::B));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].bytes, b"\x89PNG fake");
        assert_eq!(seen[0].folder, "/campaigns/winter");
        assert!(seen[0].file_name.starts_with("ad_winter_B_"));
        assert!(seen[0].file_name.ends_with(".png"));
        assert_eq!(seen[0].tags, vec!["campaign:winter", "variation:B"]);

        match result.outcome {
            Outcome::Hosted {
                image_url,
                file_id,
                mime_type,
                prompt_used,
                ..
            } => {
                assert!(image_url.ends_with(&seen[0].file_name));
                assert_eq!(file_id, "file-123");
                assert_eq!(mime_type, "image/png");
                assert_eq!(prompt_used, "cozy cabin, warm light, ad headline space");
            }
            other => panic!("expected hosted outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generation_failure_skips_upload() {
        let (generator, calls) = generator(None);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(generator).with_storage(Box::new(FakeStorage {
            seen: seen.clone(),
            fail: false,
        }));

        let result = pipeline.execute(&request(Variation::A)).await;
        assert!(!result.success);
        assert_eq!(result.exit_code(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seen.lock().unwrap().is_empty());
        match result.outcome {
            Outcome::Failed { error } => assert!(error.contains("No image data found")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_failure_propagates() {
        let (generator, _) = generator(Some(png()));
        let pipeline = Pipeline::new(generator).with_storage(Box::new(FakeStorage {
            seen: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }));

        let err = pipeline.run(&request(Variation::A)).await.unwrap_err();
        assert!(matches!(err, AdGenError::UploadError(_)));
    }

    #[test]
    fn test_from_config_rejects_missing_imagekit_before_clients() {
        let config = Config::new()
            .with_gemini(GeminiConfig::new().with_api_key("g-key"))
            .with_imagekit(ImageKitConfig::new().with_credentials("private", "public"));
        let err = Pipeline::from_config(config).err().unwrap();
        assert!(matches!(err, AdGenError::MissingCredential(_)));
    }

    #[test]
    fn test_from_config_builds_upload_stage() {
        let config = Config::new()
            .with_gemini(GeminiConfig::new().with_api_key("g-key"))
            .with_imagekit(
                ImageKitConfig::new()
                    .with_credentials("private", "public")
                    .with_url_endpoint("https://ik.imagekit.io/demo"),
            );
        assert!(Pipeline::from_config(config).unwrap().uploads());
    }
}
