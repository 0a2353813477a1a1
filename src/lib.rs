pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use config::{Config, GeminiConfig, ImageKitConfig};
pub use error::{AdGenError, Result};
pub use gemini::{GeminiImageClient, ImageGenerator};
pub use models::*;
pub use pipeline::{Pipeline, PipelineRequest};
pub use storage::{ImageKitStorage, MediaStorage};
