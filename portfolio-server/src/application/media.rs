use tracing::warn;

use crate::data::media_store::{MediaError, MediaStore};
use crate::domain::error::DomainError;

/// Removes an object that is no longer referenced. Failures are logged and
/// swallowed so the caller's primary operation still succeeds.
pub(crate) async fn discard_best_effort(media: &dyn MediaStore, storage_id: &str, resource_type: &str) {
    if let Err(err) = media.destroy(storage_id, resource_type).await {
        warn!(
            error = %err,
            %storage_id,
            %resource_type,
            "failed to remove media object; leaving it orphaned"
        );
    }
}

pub(crate) fn upload_failed(err: MediaError) -> DomainError {
    DomainError::Internal(format!("media upload failed: {err}"))
}
