use crate::{
    error::Result,
    models::{UploadRequest, UploadResult},
};
use async_trait::async_trait;

/// A remote media host that stores bytes and hands back a public URL.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResult>;
}
