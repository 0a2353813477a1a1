use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdGenError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Image generation failed: {0}")]
    GenerationError(String),
    #[error("Upload failed: {0}")]
    UploadError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, AdGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AdGenError::MissingCredential("GOOGLE_API_KEY".into());
        assert_eq!(err.to_string(), "Missing credential: GOOGLE_API_KEY");

        let err = AdGenError::GenerationError("No image data found in Gemini response".into());
        assert_eq!(
            err.to_string(),
            "Image generation failed: No image data found in Gemini response"
        );
    }
}
