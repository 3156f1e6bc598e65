use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::MediaUpload;

pub(crate) const IMAGE_RESOURCE_TYPE: &str = "image";

#[derive(Debug, Error)]
pub(crate) enum MediaError {
    #[error("media store request failed: {0}")]
    Transport(String),

    #[error("media store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected media store response: {0}")]
    InvalidResponse(String),
}

/// Object created in the external media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredMedia {
    pub(crate) storage_id: String,
    pub(crate) url: String,
    pub(crate) resource_type: String,
}

/// Third-party object storage, addressed only by opaque object id.
#[async_trait]
pub(crate) trait MediaStore: Send + Sync {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError>;
    async fn destroy(&self, storage_id: &str, resource_type: &str) -> Result<(), MediaError>;
}
